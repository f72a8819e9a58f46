use form_spec::{
    FieldType, FieldValue, FormField, FormSchema, PasswordRule, ValueMap, validate_field,
    validate_form,
};

fn text_field(id: &str) -> FormField {
    FormField::new(id, FieldType::Text, id)
}

fn message(field: &FormField, value: Option<FieldValue>) -> Option<String> {
    validate_field(field, value.as_ref()).map(|error| error.message)
}

#[test]
fn required_rejects_every_empty_equivalent() {
    let mut field = text_field("name");
    field.required = true;
    assert_eq!(message(&field, None).as_deref(), Some("Required"));
    assert_eq!(message(&field, Some("".into())).as_deref(), Some("Required"));
    assert_eq!(message(&field, Some("Ada".into())), None);
    assert_eq!(message(&field, Some(0.into())), None);

    let mut checkbox = FormField::new("terms", FieldType::Checkbox, "Terms");
    checkbox.required = true;
    assert_eq!(message(&checkbox, Some(false.into())).as_deref(), Some("Required"));
    assert_eq!(message(&checkbox, Some(true.into())), None);
}

#[test]
fn false_only_counts_as_empty_for_checkboxes() {
    let mut field = text_field("flag");
    field.required = true;
    assert_eq!(message(&field, Some(false.into())), None);
}

#[test]
fn unrestricted_optional_field_always_passes() {
    let field = text_field("free");
    assert_eq!(message(&field, None), None);
    assert_eq!(message(&field, Some("".into())), None);
    assert_eq!(message(&field, Some(42.into())), None);
}

#[test]
fn not_empty_trims_whitespace() {
    let mut field = text_field("bio");
    field.validation.not_empty = true;
    assert_eq!(
        message(&field, Some("   ".into())).as_deref(),
        Some("Cannot be empty")
    );
    assert_eq!(message(&field, Some(" x ".into())), None);
}

#[test]
fn length_bounds_use_string_form() {
    let mut field = text_field("nick");
    field.validation.min_length = Some(5);
    assert_eq!(
        message(&field, Some("hi".into())).as_deref(),
        Some("Minimum length 5")
    );
    assert_eq!(message(&field, Some("hello".into())), None);

    field.validation.min_length = None;
    field.validation.max_length = Some(3);
    assert_eq!(
        message(&field, Some(12345.into())).as_deref(),
        Some("Maximum length 3")
    );
    assert_eq!(message(&field, Some("héé".into())), None);
}

#[test]
fn email_requires_local_domain_and_tld() {
    let mut field = text_field("email");
    field.validation.email = true;
    for bad in ["", "ada", "ada@host", "a da@host.io", "@host.io"] {
        assert_eq!(
            message(&field, Some(bad.into())).as_deref(),
            Some("Invalid email"),
            "{bad}"
        );
    }
    assert_eq!(message(&field, Some("ada@example.org".into())), None);
}

#[test]
fn password_rule_checks_length_then_digit() {
    let mut field = text_field("password");
    field.validation.password_rule = Some(PasswordRule {
        min_length: 8,
        must_contain_number: true,
    });
    assert_eq!(
        message(&field, Some("short1".into())).as_deref(),
        Some("Password must be at least 8")
    );
    assert_eq!(
        message(&field, Some("longenough".into())).as_deref(),
        Some("Password must contain a number")
    );
    assert_eq!(message(&field, Some("longenough1".into())), None);
}

#[test]
fn numeric_bounds_coerce_the_value() {
    let mut field = FormField::new("qty", FieldType::Number, "Quantity");
    field.validation.min_value = Some(1.0);
    field.validation.max_value = Some(10.5);
    assert_eq!(
        message(&field, Some(0.into())).as_deref(),
        Some("Minimum value 1")
    );
    assert_eq!(
        message(&field, Some("11".into())).as_deref(),
        Some("Maximum value 10.5")
    );
    assert_eq!(message(&field, Some(5.into())), None);
    // NaN never fails a numeric bound.
    assert_eq!(message(&field, Some("abc".into())), None);
    assert_eq!(message(&field, None), None);
}

#[test]
fn first_failing_rule_wins() {
    let mut field = text_field("contact");
    field.required = true;
    field.validation.min_length = Some(10);
    field.validation.email = true;

    let error = validate_field(&field, Some(&"a@b".into())).expect("should fail");
    assert_eq!(error.message, "Minimum length 10");
    assert_eq!(error.code, "min_length");
    assert_eq!(error.field_id, "contact");

    let error = validate_field(&field, Some(&"not-an-email".into())).expect("should fail");
    assert_eq!(error.code, "email");
}

#[test]
fn whole_form_validation_reports_each_failing_field() {
    let mut name = text_field("name");
    name.required = true;
    let mut nick = text_field("nick");
    nick.validation.min_length = Some(3);
    let form = FormSchema {
        id: "f".into(),
        name: "Form".into(),
        created_at: "2026-01-01T00:00:00Z".into(),
        fields: vec![name, nick, text_field("free")],
    };

    let mut values = ValueMap::new();
    values.insert("nick".into(), "ab".into());
    let result = validate_form(&form, &values);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.errors[0].field_id, "name");
    assert_eq!(result.errors[1].message, "Minimum length 3");

    values.insert("name".into(), "Ada".into());
    values.insert("nick".into(), "abc".into());
    assert!(validate_form(&form, &values).valid);
}
