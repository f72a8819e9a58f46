use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};

use crate::spec::field::FieldType;

/// Current values keyed by field id. A missing key is an absent value.
pub type ValueMap = BTreeMap<String, FieldValue>;

/// Validation messages keyed by field id. An empty message means valid.
pub type ErrorMap = BTreeMap<String, String>;

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A field value. Which variant is used depends on the field type; coercion
/// between variants only happens through the explicit helpers below.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric reading of the value; `None` stands for NaN.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(number) => Some(*number).filter(|n| !n.is_nan()),
            FieldValue::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            FieldValue::Text(text) => parse_number(text),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Converts raw operator input into the representation a field type expects.
    ///
    /// Number fields keep unparsable input as text so validation can report it.
    pub fn from_input(kind: FieldType, raw: &str) -> FieldValue {
        match kind {
            FieldType::Number => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return FieldValue::Text(String::new());
                }
                match parse_number(trimmed) {
                    Some(number) => FieldValue::Number(number),
                    None => FieldValue::Text(raw.to_string()),
                }
            }
            FieldType::Checkbox => match raw.trim().to_lowercase().as_str() {
                "true" | "yes" | "y" | "on" | "1" => FieldValue::Bool(true),
                "false" | "no" | "n" | "off" | "0" | "" => FieldValue::Bool(false),
                _ => FieldValue::Text(raw.to_string()),
            },
            _ => FieldValue::Text(raw.to_string()),
        }
    }
}

/// Numeric coercion of a possibly absent value.
pub fn number_of(value: Option<&FieldValue>) -> Option<f64> {
    value.and_then(FieldValue::as_number)
}

/// String coercion of a possibly absent value; absent becomes empty.
pub fn text_of(value: Option<&FieldValue>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn format_number(number: f64) -> String {
    if number == 0.0 {
        // covers -0.0
        return "0".into();
    }
    if number.is_nan() {
        return "NaN".into();
    }
    if number.is_infinite() {
        return if number > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    let magnitude = number.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return number.to_string();
    }
    // Outside that range numbers print in exponent form, with an explicit `+`
    // on positive exponents: `1e+21`, `1.5e-7`.
    let exponent_form = format!("{number:e}");
    match exponent_form.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exponent_form,
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(number) => f.write_str(&format_number(*number)),
            FieldValue::Bool(flag) => write!(f, "{flag}"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Bool(flag) => serializer.serialize_bool(*flag),
            FieldValue::Text(text) => serializer.serialize_str(text),
            FieldValue::Number(number) => {
                if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
                    serializer.serialize_i64(*number as i64)
                } else {
                    serializer.serialize_f64(*number)
                }
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}
