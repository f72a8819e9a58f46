use form_spec::builder::DEFAULT_FORM_NAME;
use form_spec::{
    BuilderError, CycleError, DependencyGraph, DerivedConfig, ExpressionName, FieldType,
    FieldValue, WorkingForm,
};

fn add(form: &mut WorkingForm, kind: FieldType) -> String {
    form.add_field(kind).id.clone()
}

#[test]
fn new_working_form_starts_empty() {
    let form = WorkingForm::new(None);
    assert_eq!(form.schema().name, DEFAULT_FORM_NAME);
    assert!(form.schema().fields.is_empty());
    assert!(!form.schema().id.is_empty());
    assert_ne!(WorkingForm::new(None).schema().id, form.schema().id);
}

#[test]
fn added_fields_get_builder_defaults() {
    let mut form = WorkingForm::new(Some("Signup"));
    let checkbox = form.add_field(FieldType::Checkbox).clone();
    assert_eq!(checkbox.label, "checkbox field");
    assert_eq!(checkbox.default_value, Some(FieldValue::Bool(false)));
    assert_eq!(checkbox.options, vec!["Option 1".to_string()]);
    assert!(!checkbox.required);
    assert!(!checkbox.is_derived());

    let text = form.add_field(FieldType::Text).clone();
    assert_eq!(text.default_value, Some(FieldValue::from("")));
    assert!(text.options.is_empty());
    assert_ne!(text.id, checkbox.id);
    assert!(form.schema().duplicate_field_ids().is_empty());
}

#[test]
fn update_field_replaces_in_place() {
    let mut form = WorkingForm::new(None);
    let id = add(&mut form, FieldType::Text);
    let mut field = form.schema().field(&id).cloned().expect("field exists");
    field.label = "Name".into();
    field.required = true;
    form.update_field(field).expect("update succeeds");
    let stored = form.schema().field(&id).expect("field exists");
    assert_eq!(stored.label, "Name");
    assert!(stored.required);
}

#[test]
fn derived_edits_are_checked_eagerly() {
    let mut form = WorkingForm::new(None);
    let a = add(&mut form, FieldType::Number);
    let b = add(&mut form, FieldType::Number);
    let c = add(&mut form, FieldType::Number);

    let mut field_b = form.schema().field(&b).cloned().expect("b exists");
    field_b.derived = DerivedConfig::new(ExpressionName::Sum, [a.as_str()]);
    form.update_field(field_b).expect("b derives from a");

    let mut field_c = form.schema().field(&c).cloned().expect("c exists");
    field_c.derived = DerivedConfig::new(ExpressionName::Sum, [b.as_str()]);
    form.update_field(field_c.clone()).expect("c derives from b");

    let mut self_ref = field_c.clone();
    self_ref.derived = DerivedConfig::new(ExpressionName::Sum, [c.as_str()]);
    assert_eq!(
        form.update_field(self_ref),
        Err(BuilderError::SelfReference(c.clone()))
    );

    let mut unknown = field_c.clone();
    unknown.derived = DerivedConfig::new(ExpressionName::Sum, ["ghost"]);
    assert!(matches!(
        form.update_field(unknown),
        Err(BuilderError::UnknownParent { parent, .. }) if parent == "ghost"
    ));

    let mut field_b = form.schema().field(&b).cloned().expect("b exists");
    field_b.derived = DerivedConfig::new(ExpressionName::Sum, [c.as_str()]);
    let err = form.update_field(field_b).expect_err("b -> c -> b is a cycle");
    assert_eq!(
        err,
        BuilderError::Cycle(CycleError {
            fields: vec![b.clone(), c.clone()],
        })
    );
    // Rejected edits leave the form untouched.
    let graph_form = form.schema().clone();
    let order = DependencyGraph::new(&graph_form)
        .evaluation_order()
        .expect("still acyclic");
    let ids: Vec<&str> = order.iter().map(|field| field.id.as_str()).collect();
    assert_eq!(ids, vec![b.as_str(), c.as_str()]);
}

#[test]
fn removing_a_parent_keeps_the_stale_reference() {
    let mut form = WorkingForm::new(None);
    let a = add(&mut form, FieldType::Number);
    let b = add(&mut form, FieldType::Number);
    let mut field_b = form.schema().field(&b).cloned().expect("b exists");
    field_b.derived = DerivedConfig::new(ExpressionName::Sum, [a.as_str()]);
    form.update_field(field_b).expect("b derives from a");

    let removed = form.remove_field(&a).expect("a exists");
    assert_eq!(removed.id, a);
    let b_field = form.schema().field(&b).expect("b exists");
    assert_eq!(b_field.derived.parent_field_ids, vec![a.clone()]);
    assert_eq!(
        form.remove_field(&a),
        Err(BuilderError::UnknownField(a.clone()))
    );
}

#[test]
fn move_field_reorders_by_index() {
    let mut form = WorkingForm::new(None);
    let ids: Vec<String> = (0..3).map(|_| add(&mut form, FieldType::Text)).collect();
    form.move_field(0, 2).expect("indexes in range");
    let order: Vec<&str> = form.schema().fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(order, vec![ids[1].as_str(), ids[2].as_str(), ids[0].as_str()]);
    assert_eq!(
        form.move_field(0, 3),
        Err(BuilderError::OutOfRange { index: 3, len: 3 })
    );
}

#[test]
fn options_are_editable_on_choice_fields_only() {
    let mut form = WorkingForm::new(None);
    let select = add(&mut form, FieldType::Select);
    assert_eq!(form.add_option(&select), Ok(1));
    form.set_option(&select, 0, "Red").expect("index 0 exists");
    assert_eq!(
        form.schema().field(&select).expect("select exists").options,
        vec!["Red".to_string(), "Option 2".to_string()]
    );
    assert_eq!(form.remove_option(&select, 1), Ok("Option 2".to_string()));
    assert_eq!(
        form.set_option(&select, 5, "x"),
        Err(BuilderError::OutOfRange { index: 5, len: 1 })
    );

    let text = add(&mut form, FieldType::Text);
    assert_eq!(
        form.add_option(&text),
        Err(BuilderError::OptionsNotSupported(text.clone()))
    );
}

#[test]
fn saved_copy_is_independent_of_later_edits() {
    let mut form = WorkingForm::new(None);
    add(&mut form, FieldType::Text);
    let saved = form.to_saved(Some("Contact"));
    assert_eq!(saved.name, "Contact");
    assert_eq!(saved.id, form.schema().id);
    assert_eq!(saved.fields.len(), 1);
    assert!(time::OffsetDateTime::parse(
        &saved.created_at,
        &time::format_description::well_known::Rfc3339
    )
    .is_ok());

    add(&mut form, FieldType::Date);
    assert_eq!(saved.fields.len(), 1);
    assert_eq!(form.schema().fields.len(), 2);
}

#[test]
fn insert_field_rejects_duplicate_ids() {
    let mut form = WorkingForm::new(None);
    let id = add(&mut form, FieldType::Text);
    let copy = form.schema().field(&id).cloned().expect("field exists");
    assert_eq!(
        form.insert_field(copy),
        Err(BuilderError::DuplicateField(id))
    );
}
