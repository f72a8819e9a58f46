use schemars::schema_for;
use serde_json::json;

use form_spec::{ExpressionName, FieldType, FieldValue, FormSchema};

fn fixture() -> &'static str {
    include_str!("../tests/fixtures/profile_form.json")
}

#[test]
fn form_schema_roundtrip() {
    let parsed: FormSchema = serde_json::from_str(fixture()).expect("deserialize");
    let serialized = serde_json::to_string_pretty(&parsed).expect("serialize");
    let re_parsed: FormSchema = serde_json::from_str(&serialized).expect("roundtrip");
    assert_eq!(parsed, re_parsed);
    // Serializing the re-parsed value is byte-stable.
    assert_eq!(
        serialized,
        serde_json::to_string_pretty(&re_parsed).expect("serialize again")
    );
}

#[test]
fn fixture_fields_parse_with_their_types() {
    let parsed: FormSchema = serde_json::from_str(fixture()).expect("deserialize");
    let age = parsed.field("age").expect("age field");
    assert_eq!(age.kind, FieldType::Number);
    assert_eq!(age.derived.expression_name, Some(ExpressionName::AgeFromDob));
    assert_eq!(age.validation.min_value, Some(18.0));
    let plan = parsed.field("plan").expect("plan field");
    assert_eq!(plan.default_value, Some(FieldValue::from("basic")));
    assert_eq!(plan.options, vec!["basic", "pro"]);
}

#[test]
fn json_layout_uses_camel_case_and_plain_values() {
    let parsed: FormSchema = serde_json::from_str(fixture()).expect("deserialize");
    let value = serde_json::to_value(&parsed).expect("serialize");
    assert_eq!(value["createdAt"], "2026-01-05T09:30:00Z");
    let full = &value["fields"][2];
    assert_eq!(full["type"], "text");
    assert_eq!(full["derived"]["isDerived"], true);
    assert_eq!(full["derived"]["parentFieldIds"], json!(["first", "last"]));
    assert_eq!(full["derived"]["expressionName"], "concat");
    assert_eq!(value["fields"][0]["validation"]["minLength"], 2);
}

#[test]
fn field_values_serialize_untagged() {
    assert_eq!(serde_json::to_value(FieldValue::Number(3.0)).unwrap(), json!(3));
    assert_eq!(serde_json::to_value(FieldValue::Number(2.5)).unwrap(), json!(2.5));
    assert_eq!(serde_json::to_value(FieldValue::from("x")).unwrap(), json!("x"));
    assert_eq!(serde_json::to_value(FieldValue::Bool(true)).unwrap(), json!(true));
    let parsed: Vec<FieldValue> = serde_json::from_value(json!([1, "1", false])).unwrap();
    assert_eq!(
        parsed,
        vec![
            FieldValue::Number(1.0),
            FieldValue::from("1"),
            FieldValue::Bool(false)
        ]
    );
}

#[test]
fn missing_optional_sections_use_defaults() {
    let parsed: FormSchema = serde_json::from_value(json!({
        "id": "bare",
        "name": "Bare",
        "createdAt": "2026-01-01T00:00:00Z",
        "fields": [{ "id": "a", "type": "radio", "label": "A" }]
    }))
    .expect("deserialize");
    let field = &parsed.fields[0];
    assert!(!field.required);
    assert!(field.validation.is_empty());
    assert!(!field.derived.is_derived);
    assert!(field.default_value.is_none());
}

#[test]
fn schemas_compile() {
    let schema = schema_for!(FormSchema);
    let json = serde_json::to_string(&schema).expect("schema serializes");
    assert!(json.starts_with('{'));
    assert!(json.contains("parentFieldIds"));
}
