use form_spec::FormSchema;
use tracing::{debug, info};

use crate::repository::FormRepository;

/// The saved-forms list, backed by a repository.
///
/// Every mutation rewrites the whole collection.
#[derive(Debug)]
pub struct FormCatalog<R> {
    repository: R,
    forms: Vec<FormSchema>,
}

impl<R: FormRepository> FormCatalog<R> {
    pub fn open(repository: R) -> Self {
        let forms = repository.load_all();
        debug!(count = forms.len(), "loaded saved forms");
        Self { repository, forms }
    }

    pub fn forms(&self) -> &[FormSchema] {
        &self.forms
    }

    pub fn get(&self, id: &str) -> Option<&FormSchema> {
        self.forms.iter().find(|form| form.id == id)
    }

    /// Replaces the form with the same id, or appends it.
    pub fn save(&mut self, form: FormSchema) {
        match self.forms.iter_mut().find(|existing| existing.id == form.id) {
            Some(existing) => {
                info!(form_id = %form.id, "replacing saved form");
                *existing = form;
            }
            None => {
                info!(form_id = %form.id, "saving new form");
                self.forms.push(form);
            }
        }
        self.repository.save_all(&self.forms);
    }

    /// Removes the form with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.forms.len();
        self.forms.retain(|form| form.id != id);
        let removed = self.forms.len() != before;
        if removed {
            info!(form_id = %id, "deleted saved form");
        }
        self.repository.save_all(&self.forms);
        removed
    }

    pub fn reload(&mut self) {
        self.forms = self.repository.load_all();
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}
