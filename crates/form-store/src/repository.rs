use form_spec::FormSchema;
use tracing::{error, warn};

use crate::blob::BlobStore;
use crate::error::StoreError;

/// Storage key for the saved-forms collection. Bump the suffix on format changes.
pub const FORMS_KEY: &str = "form_builder_forms_v1";

/// Durable storage for the whole saved-forms collection.
///
/// `load_all` and `save_all` never fail: problems are logged and degrade to an
/// empty collection or a skipped write. Use the `try_` variants to see them.
pub trait FormRepository {
    fn try_load_all(&self) -> Result<Vec<FormSchema>, StoreError>;
    fn try_save_all(&self, forms: &[FormSchema]) -> Result<(), StoreError>;

    fn load_all(&self) -> Vec<FormSchema> {
        self.try_load_all().unwrap_or_else(|err| {
            warn!(error = %err, "could not load saved forms; starting empty");
            Vec::new()
        })
    }

    fn save_all(&self, forms: &[FormSchema]) {
        if let Err(err) = self.try_save_all(forms) {
            error!(error = %err, count = forms.len(), "could not save forms");
        }
    }
}

/// Keeps the collection as one pretty-printed JSON array under a single key.
#[derive(Debug)]
pub struct BlobFormRepository<S> {
    store: S,
    key: String,
}

impl<S: BlobStore> BlobFormRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, FORMS_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: BlobStore> FormRepository for BlobFormRepository<S> {
    fn try_load_all(&self) -> Result<Vec<FormSchema>, StoreError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            key: self.key.clone(),
            source,
        })
    }

    fn try_save_all(&self, forms: &[FormSchema]) -> Result<(), StoreError> {
        let encoded = serde_json::to_string_pretty(forms).map_err(StoreError::Encode)?;
        self.store.put(&self.key, &encoded)
    }
}
