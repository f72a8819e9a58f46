use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::{FieldType, FormField};
use crate::spec::form::FormSchema;
use crate::value::{FieldValue, ValueMap, number_of, text_of};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// First rule a field value failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationError {
    pub field_id: String,
    pub message: String,
    pub code: String,
}

/// Outcome of validating every field of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn error_for(&self, field_id: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|error| error.field_id == field_id)
    }
}

/// Checks one value against a field's rules and reports the first failure.
///
/// Precedence: required, notEmpty, min/max length, email, password, min/max value.
pub fn validate_field(field: &FormField, value: Option<&FieldValue>) -> Option<ValidationError> {
    if field.required && is_blank(field.kind, value) {
        return Some(failure(field, "Required", "required"));
    }

    let rules = &field.validation;
    let text = text_of(value);

    if rules.not_empty && text.trim().is_empty() {
        return Some(failure(field, "Cannot be empty", "not_empty"));
    }

    let length = text.chars().count();
    if let Some(min) = rules.min_length
        && length < min
    {
        return Some(failure(field, format!("Minimum length {min}"), "min_length"));
    }
    if let Some(max) = rules.max_length
        && length > max
    {
        return Some(failure(field, format!("Maximum length {max}"), "max_length"));
    }

    if rules.email && !EMAIL.is_match(&text) {
        return Some(failure(field, "Invalid email", "email"));
    }

    if let Some(password) = &rules.password_rule {
        if length < password.min_length {
            return Some(failure(
                field,
                format!("Password must be at least {}", password.min_length),
                "password_length",
            ));
        }
        if password.must_contain_number && !text.chars().any(|ch| ch.is_ascii_digit()) {
            return Some(failure(
                field,
                "Password must contain a number",
                "password_number",
            ));
        }
    }

    let number = number_of(value);
    if let Some(min) = rules.min_value
        && let Some(number) = number
        && number < min
    {
        return Some(failure(
            field,
            format!("Minimum value {}", FieldValue::Number(min)),
            "min_value",
        ));
    }
    if let Some(max) = rules.max_value
        && let Some(number) = number
        && number > max
    {
        return Some(failure(
            field,
            format!("Maximum value {}", FieldValue::Number(max)),
            "max_value",
        ));
    }

    None
}

/// Validates every field of `form` in display order.
pub fn validate_form(form: &FormSchema, values: &ValueMap) -> ValidationResult {
    let errors: Vec<ValidationError> = form
        .fields
        .iter()
        .filter_map(|field| validate_field(field, values.get(&field.id)))
        .collect();

    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

fn is_blank(kind: FieldType, value: Option<&FieldValue>) -> bool {
    match value {
        None => true,
        Some(FieldValue::Text(text)) => text.is_empty(),
        Some(FieldValue::Bool(false)) => kind == FieldType::Checkbox,
        Some(_) => false,
    }
}

fn failure(field: &FormField, message: impl Into<String>, code: &str) -> ValidationError {
    ValidationError {
        field_id: field.id.clone(),
        message: message.into(),
        code: code.into(),
    }
}
