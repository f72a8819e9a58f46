use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Password strength requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRule {
    pub min_length: usize,
    #[serde(default)]
    pub must_contain_number: bool,
}

/// Per-field rules. A `None` or `false` rule is not enforced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default)]
    pub not_empty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub email: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_rule: Option<PasswordRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}

impl ValidationRules {
    pub fn is_empty(&self) -> bool {
        self == &ValidationRules::default()
    }
}
