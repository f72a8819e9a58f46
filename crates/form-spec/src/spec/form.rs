use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::FormField;

/// Top-level form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub id: String,
    pub name: String,
    /// RFC 3339 timestamp of the last save.
    pub created_at: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl FormSchema {
    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn field_mut(&mut self, id: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|field| field.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.id == id)
    }

    pub fn derived_fields(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter().filter(|field| field.is_derived())
    }

    /// Ids that occur more than once, in first-seen order.
    pub fn duplicate_field_ids(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut duplicates = Vec::new();
        for field in &self.fields {
            if !seen.insert(field.id.as_str()) && !duplicates.contains(&field.id) {
                duplicates.push(field.id.clone());
            }
        }
        duplicates
    }
}
