use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::expr::ExpressionName;

/// Marks a field as computed from other fields.
///
/// `parent_field_ids` is positional: the expression receives parent values in
/// exactly this order. Repeated ids are passed repeatedly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DerivedConfig {
    #[serde(default)]
    pub is_derived: bool,
    #[serde(default)]
    pub parent_field_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub expression_name: Option<ExpressionName>,
    /// Reserved free-form expression text. Stored, never executed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl DerivedConfig {
    pub fn new<I, S>(expression_name: ExpressionName, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is_derived: true,
            parent_field_ids: parents.into_iter().map(Into::into).collect(),
            expression_name: Some(expression_name),
            expression: None,
        }
    }

    pub fn depends_on(&self, field_id: &str) -> bool {
        self.parent_field_ids.iter().any(|parent| parent == field_id)
    }
}
