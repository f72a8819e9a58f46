use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::derived::DerivedConfig;
use crate::spec::validation::ValidationRules;
use crate::value::FieldValue;

/// Supported field widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Date,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
        }
    }

    /// Whether `options` carries meaning for this type.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Radio | FieldType::Checkbox
        )
    }

    /// Value a fresh session uses when the field declares no default.
    pub fn empty_value(&self) -> FieldValue {
        match self {
            FieldType::Checkbox => FieldValue::Bool(false),
            _ => FieldValue::Text(String::new()),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .ok_or_else(|| format!("unknown field type '{raw}'"))
    }
}

/// Definition of a single field inside a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub validation: ValidationRules,
    #[serde(default)]
    pub derived: DerivedConfig,
}

impl FormField {
    pub fn new(id: impl Into<String>, kind: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            required: false,
            default_value: None,
            options: Vec::new(),
            validation: ValidationRules::default(),
            derived: DerivedConfig::default(),
        }
    }

    pub fn is_derived(&self) -> bool {
        self.derived.is_derived
    }

    /// Seed value for a session: the declared default or the type's empty value.
    pub fn initial_value(&self) -> FieldValue {
        self.default_value
            .clone()
            .unwrap_or_else(|| self.kind.empty_value())
    }
}
