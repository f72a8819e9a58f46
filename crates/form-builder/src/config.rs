use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use form_store::FORMS_KEY;

/// Overrides `data_dir` when set.
pub const DATA_DIR_ENV: &str = "FORM_BUILDER_DATA_DIR";
pub const CONFIG_FILE: &str = "config.toml";
pub const DRAFT_KEY: &str = "form_builder_draft_v1";

/// Settings read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormBuilderConfig {
    /// Directory holding the saved-forms blob and the working draft.
    pub data_dir: PathBuf,
    /// Blob key of the saved-forms collection.
    pub storage_key: String,
    /// Blob key of the working form.
    pub draft_key: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for FormBuilderConfig {
    fn default() -> Self {
        Self {
            data_dir: project_dirs()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".form-builder")),
            storage_key: FORMS_KEY.to_string(),
            draft_key: DRAFT_KEY.to_string(),
            log_filter: "warn".to_string(),
        }
    }
}

impl FormBuilderConfig {
    /// Reads `explicit`, or the platform config file when it exists, then
    /// applies the environment override.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|dir| !dir.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "form-builder")
}
