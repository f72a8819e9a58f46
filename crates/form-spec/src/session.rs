use time::Date;
use thiserror::Error;
use tracing::debug;

use crate::computed::derived_changes;
use crate::expr::today;
use crate::spec::form::FormSchema;
use crate::validate::{ValidationResult, validate_field, validate_form};
use crate::value::{ErrorMap, FieldValue, ValueMap};

/// Errors raised by [`FormSession`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("form '{form_id}' has no field '{field_id}'")]
    UnknownField { form_id: String, field_id: String },
}

/// Live state of one form being filled in.
///
/// Owns the schema, the current values and the per-field error messages.
/// Every edit validates the touched field and then sweeps derived fields.
#[derive(Debug, Clone)]
pub struct FormSession {
    schema: FormSchema,
    values: ValueMap,
    errors: ErrorMap,
    reference_date: Option<Date>,
}

impl FormSession {
    pub fn new(schema: FormSchema) -> Self {
        let mut session = Self {
            schema,
            values: ValueMap::new(),
            errors: ErrorMap::new(),
            reference_date: None,
        };
        session.reset();
        session
    }

    /// Pins the date `ageFromDOB` measures against and re-sweeps derived fields.
    pub fn with_reference_date(mut self, date: Date) -> Self {
        self.reference_date = Some(date);
        self.sweep();
        self
    }

    /// Starts over with `schema`: defaults seeded, errors cleared.
    pub fn initialize(&mut self, schema: FormSchema) {
        self.schema = schema;
        self.reset();
    }

    fn reset(&mut self) {
        self.values = self
            .schema
            .fields
            .iter()
            .map(|field| (field.id.clone(), field.initial_value()))
            .collect();
        self.errors.clear();
        self.sweep();
    }

    /// Swaps in an edited schema while keeping values of fields that survived.
    pub fn reconfigure(&mut self, schema: FormSchema) {
        let mut values = ValueMap::new();
        for field in &schema.fields {
            let value = match self.values.get(&field.id) {
                Some(current) if self.schema.field(&field.id).is_some() => current.clone(),
                _ => field.initial_value(),
            };
            values.insert(field.id.clone(), value);
        }
        self.errors.retain(|field_id, _| schema.field(field_id).is_some());
        self.values = values;
        self.schema = schema;
        self.sweep();
    }

    /// Writes a raw value, validates that field, then refreshes derived fields.
    ///
    /// `None` clears the value.
    pub fn set_value(
        &mut self,
        field_id: &str,
        value: Option<FieldValue>,
    ) -> Result<(), SessionError> {
        let field = self
            .schema
            .field(field_id)
            .ok_or_else(|| SessionError::UnknownField {
                form_id: self.schema.id.clone(),
                field_id: field_id.to_string(),
            })?;

        let message = validate_field(field, value.as_ref())
            .map(|error| error.message)
            .unwrap_or_default();
        self.errors.insert(field_id.to_string(), message);

        match value {
            Some(value) => {
                self.values.insert(field_id.to_string(), value);
            }
            None => {
                self.values.remove(field_id);
            }
        }

        self.sweep();
        Ok(())
    }

    /// Validates every field, replacing all stored messages. Nothing is persisted.
    pub fn submit(&mut self) -> ValidationResult {
        let result = validate_form(&self.schema, &self.values);
        self.errors = self
            .schema
            .fields
            .iter()
            .map(|field| {
                let message = result
                    .error_for(&field.id)
                    .map(|error| error.message.clone())
                    .unwrap_or_default();
                (field.id.clone(), message)
            })
            .collect();
        result
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn value(&self, field_id: &str) -> Option<&FieldValue> {
        self.values.get(field_id)
    }

    /// Stored message for a field; `None` when the field was never validated.
    pub fn error(&self, field_id: &str) -> Option<&str> {
        self.errors.get(field_id).map(String::as_str)
    }

    /// Merges only the derived outputs that changed.
    fn sweep(&mut self) {
        let date = self.reference_date.unwrap_or_else(today);
        let changes = derived_changes(&self.schema, &self.values, date);
        if changes.is_empty() {
            return;
        }
        debug!(form_id = %self.schema.id, changed = changes.len(), "derived fields updated");
        for (field_id, value) in changes {
            match value {
                Some(value) => {
                    self.values.insert(field_id, value);
                }
                None => {
                    self.values.remove(&field_id);
                }
            }
        }
    }
}
