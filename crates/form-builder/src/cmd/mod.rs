pub mod draft;
pub mod field;
pub mod fill;
pub mod forms;
pub mod schema;

use anyhow::{Context as _, Result, bail};
use form_spec::{FormField, FormSchema, WorkingForm};
use form_store::{BlobFormRepository, BlobStore, FormCatalog, FsBlobStore};
use tracing::debug;

use crate::config::FormBuilderConfig;

/// Shared state for one CLI invocation.
#[derive(Debug, Clone)]
pub struct Context {
    config: FormBuilderConfig,
}

impl Context {
    pub fn new(config: FormBuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormBuilderConfig {
        &self.config
    }

    pub fn blob_store(&self) -> FsBlobStore {
        FsBlobStore::new(&self.config.data_dir)
    }

    pub fn catalog(&self) -> FormCatalog<BlobFormRepository<FsBlobStore>> {
        FormCatalog::open(BlobFormRepository::with_key(
            self.blob_store(),
            self.config.storage_key.clone(),
        ))
    }

    pub fn draft_exists(&self) -> Result<bool> {
        Ok(self.blob_store().get(&self.config.draft_key)?.is_some())
    }

    pub fn load_draft(&self) -> Result<WorkingForm> {
        let Some(raw) = self.blob_store().get(&self.config.draft_key)? else {
            bail!("no working form; run `form-builder new` or `form-builder edit <FORM_ID>`");
        };
        let schema: FormSchema =
            serde_json::from_str(&raw).context("working form is not valid JSON")?;
        Ok(WorkingForm::from_schema(schema))
    }

    pub fn store_draft(&self, form: &WorkingForm) -> Result<()> {
        let raw = serde_json::to_string_pretty(form.schema())?;
        self.blob_store().put(&self.config.draft_key, &raw)?;
        debug!(form_id = %form.schema().id, "stored working form");
        Ok(())
    }

    /// Loads the draft, applies `edit` and stores it only if `edit` succeeded.
    pub fn edit_draft<T>(&self, edit: impl FnOnce(&mut WorkingForm) -> Result<T>) -> Result<T> {
        let mut form = self.load_draft()?;
        let out = edit(&mut form)?;
        self.store_draft(&form)?;
        Ok(out)
    }
}

/// Finds a field by id, falling back to an unambiguous label match.
pub fn resolve_field<'a>(schema: &'a FormSchema, key: &str) -> Result<&'a FormField> {
    if let Some(field) = schema.field(key) {
        return Ok(field);
    }
    let mut by_label = schema.fields.iter().filter(|field| field.label == key);
    match (by_label.next(), by_label.next()) {
        (Some(field), None) => Ok(field),
        (Some(_), Some(_)) => bail!("label '{key}' matches several fields; use the field id"),
        (None, _) => bail!("no field with id or label '{key}' in form '{}'", schema.id),
    }
}

/// Converts a 1-based position from the command line into an index.
pub fn position_index(position: usize) -> Result<usize> {
    match position.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("positions start at 1"),
    }
}
