use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::graph::{CycleError, DependencyGraph};
use crate::spec::field::{FieldType, FormField};
use crate::spec::form::FormSchema;

pub const DEFAULT_FORM_NAME: &str = "Untitled form";

/// Errors raised while editing a working form. A failed edit leaves the form unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("no field with id '{0}'")]
    UnknownField(String),
    #[error("field '{0}' already exists")]
    DuplicateField(String),
    #[error("derived field '{0}' cannot depend on itself")]
    SelfReference(String),
    #[error("derived field '{field}' references unknown parent '{parent}'")]
    UnknownParent { field: String, parent: String },
    #[error(transparent)]
    Cycle(#[from] CycleError),
    #[error("position {index} is out of range for {len} field(s)")]
    OutOfRange { index: usize, len: usize },
    #[error("field '{0}' does not take options")]
    OptionsNotSupported(String),
}

/// The transient, unsaved form the builder edits.
///
/// Saving copies the schema out (see [`WorkingForm::to_saved`]); later edits
/// never reach a saved copy until it is saved again.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingForm {
    schema: FormSchema,
}

impl WorkingForm {
    pub fn new(name: Option<&str>) -> Self {
        Self {
            schema: FormSchema {
                id: Uuid::new_v4().to_string(),
                name: name.unwrap_or(DEFAULT_FORM_NAME).to_string(),
                created_at: timestamp_now(),
                fields: Vec::new(),
            },
        }
    }

    /// Starts editing an independent copy of an existing schema.
    pub fn from_schema(schema: FormSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn into_schema(self) -> FormSchema {
        self.schema
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.schema.name = name.into();
    }

    /// Appends a fresh field of `kind` with builder defaults.
    pub fn add_field(&mut self, kind: FieldType) -> &FormField {
        let mut field = FormField::new(new_field_id(), kind, format!("{kind} field"));
        field.default_value = Some(kind.empty_value());
        if kind.has_options() {
            field.options.push(option_label(1));
        }
        self.schema.fields.push(field);
        &self.schema.fields[self.schema.fields.len() - 1]
    }

    /// Inserts a fully specified field, e.g. one read from a template.
    pub fn insert_field(&mut self, field: FormField) -> Result<(), BuilderError> {
        if self.schema.field(&field.id).is_some() {
            return Err(BuilderError::DuplicateField(field.id));
        }
        let mut candidate = self.schema.clone();
        candidate.fields.push(field);
        check_derived(&candidate, candidate.fields.len() - 1)?;
        self.schema = candidate;
        Ok(())
    }

    /// Replaces the field that has the same id.
    pub fn update_field(&mut self, field: FormField) -> Result<(), BuilderError> {
        let position = self
            .schema
            .position(&field.id)
            .ok_or_else(|| BuilderError::UnknownField(field.id.clone()))?;
        let mut candidate = self.schema.clone();
        candidate.fields[position] = field;
        check_derived(&candidate, position)?;
        self.schema = candidate;
        Ok(())
    }

    /// Removes a field. Derived fields that listed it keep the stale parent id.
    pub fn remove_field(&mut self, field_id: &str) -> Result<FormField, BuilderError> {
        let position = self
            .schema
            .position(field_id)
            .ok_or_else(|| BuilderError::UnknownField(field_id.to_string()))?;
        Ok(self.schema.fields.remove(position))
    }

    /// Moves the field at `from` so it ends up at index `to`.
    pub fn move_field(&mut self, from: usize, to: usize) -> Result<(), BuilderError> {
        let len = self.schema.fields.len();
        for index in [from, to] {
            if index >= len {
                return Err(BuilderError::OutOfRange { index, len });
            }
        }
        let field = self.schema.fields.remove(from);
        self.schema.fields.insert(to, field);
        Ok(())
    }

    /// Appends "Option N" to a choice field and returns its index.
    pub fn add_option(&mut self, field_id: &str) -> Result<usize, BuilderError> {
        let options = self.options_mut(field_id)?;
        options.push(option_label(options.len() + 1));
        Ok(options.len() - 1)
    }

    pub fn set_option(
        &mut self,
        field_id: &str,
        index: usize,
        label: impl Into<String>,
    ) -> Result<(), BuilderError> {
        let options = self.options_mut(field_id)?;
        let len = options.len();
        let slot = options
            .get_mut(index)
            .ok_or(BuilderError::OutOfRange { index, len })?;
        *slot = label.into();
        Ok(())
    }

    pub fn remove_option(&mut self, field_id: &str, index: usize) -> Result<String, BuilderError> {
        let options = self.options_mut(field_id)?;
        if index >= options.len() {
            return Err(BuilderError::OutOfRange {
                index,
                len: options.len(),
            });
        }
        Ok(options.remove(index))
    }

    /// Snapshot to persist: optionally renamed, stamped with the save time.
    pub fn to_saved(&self, name: Option<&str>) -> FormSchema {
        let mut saved = self.schema.clone();
        if let Some(name) = name {
            saved.name = name.to_string();
        }
        saved.created_at = timestamp_now();
        saved
    }

    fn options_mut(&mut self, field_id: &str) -> Result<&mut Vec<String>, BuilderError> {
        let field = self
            .schema
            .field_mut(field_id)
            .ok_or_else(|| BuilderError::UnknownField(field_id.to_string()))?;
        if !field.kind.has_options() {
            return Err(BuilderError::OptionsNotSupported(field_id.to_string()));
        }
        Ok(&mut field.options)
    }
}

/// Rejects self references, unknown parents and cycles introduced by the
/// field at `position`.
fn check_derived(candidate: &FormSchema, position: usize) -> Result<(), BuilderError> {
    let field = &candidate.fields[position];
    if !field.is_derived() {
        return Ok(());
    }
    for parent in &field.derived.parent_field_ids {
        if parent == &field.id {
            return Err(BuilderError::SelfReference(field.id.clone()));
        }
        if candidate.field(parent).is_none() {
            return Err(BuilderError::UnknownParent {
                field: field.id.clone(),
                parent: parent.clone(),
            });
        }
    }
    DependencyGraph::new(candidate).evaluation_order()?;
    Ok(())
}

fn new_field_id() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

fn option_label(number: usize) -> String {
    format!("Option {number}")
}

pub(crate) fn timestamp_now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::UNIX_EPOCH.to_string())
}
