use std::fs;

use form_spec::{DerivedConfig, ExpressionName, FieldType, FormField, FormSchema};
use form_store::{
    BlobFormRepository, BlobStore, FORMS_KEY, FormRepository, FsBlobStore, MemoryBlobStore,
    StoreError,
};

fn sample(id: &str) -> FormSchema {
    let mut total = FormField::new("total", FieldType::Number, "Total");
    total.derived = DerivedConfig::new(ExpressionName::Sum, ["a", "b"]);
    total.validation.max_value = Some(99.5);
    FormSchema {
        id: id.into(),
        name: format!("Form {id}"),
        created_at: "2026-03-01T12:00:00Z".into(),
        fields: vec![
            FormField::new("a", FieldType::Number, "A"),
            FormField::new("b", FieldType::Number, "B"),
            total,
        ],
    }
}

#[test]
fn missing_blob_loads_as_empty() {
    let repo = BlobFormRepository::new(MemoryBlobStore::new());
    assert!(repo.try_load_all().expect("load").is_empty());
    assert!(repo.load_all().is_empty());
}

#[test]
fn corrupt_blob_degrades_to_empty() {
    let store = MemoryBlobStore::new();
    store.put(FORMS_KEY, "{not json").expect("put");
    let repo = BlobFormRepository::new(&store);
    assert!(matches!(
        repo.try_load_all(),
        Err(StoreError::Corrupt { .. })
    ));
    assert!(repo.load_all().is_empty());
}

#[test]
fn save_then_load_preserves_order_and_content() {
    let repo = BlobFormRepository::new(MemoryBlobStore::new());
    let forms = vec![sample("one"), sample("two")];
    repo.save_all(&forms);
    assert_eq!(repo.load_all(), forms);
}

#[test]
fn resaving_loaded_forms_leaves_storage_unchanged() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let store = FsBlobStore::new(temp.path().join("data"));
    let repo = BlobFormRepository::new(store.clone());
    repo.save_all(&[sample("one"), sample("two")]);

    let path = store.path_for(FORMS_KEY).expect("valid key");
    let before = fs::read_to_string(&path).expect("blob written");
    repo.save_all(&repo.load_all());
    let after = fs::read_to_string(&path).expect("blob still there");
    assert_eq!(before, after);
}

#[test]
fn fs_store_writes_one_json_file_per_key() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let store = FsBlobStore::new(temp.path());
    store.put("alpha", "[]").expect("put");
    assert!(temp.path().join("alpha.json").exists());
    assert_eq!(store.get("alpha").expect("get").as_deref(), Some("[]"));
    store.remove("alpha").expect("remove");
    assert_eq!(store.get("alpha").expect("get"), None);
    store.remove("alpha").expect("removing twice is fine");
}

#[test]
fn keys_cannot_escape_the_store_root() {
    let store = MemoryBlobStore::new();
    for key in ["", "../etc", "a/b", ".hidden"] {
        assert!(matches!(store.put(key, "x"), Err(StoreError::InvalidKey(_))), "{key}");
    }
}

#[test]
fn unwritable_root_logs_and_skips_the_save() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "file, not a directory").expect("write blocker");
    let repo = BlobFormRepository::new(FsBlobStore::new(&blocker));
    assert!(matches!(
        repo.try_save_all(&[sample("one")]),
        Err(StoreError::Io { .. })
    ));
    repo.save_all(&[sample("one")]);
    assert!(repo.load_all().is_empty());
}

#[test]
fn custom_keys_are_isolated() {
    let store = MemoryBlobStore::new();
    let v1 = BlobFormRepository::new(&store);
    let v2 = BlobFormRepository::with_key(&store, "form_builder_forms_v2");
    v1.save_all(&[sample("one")]);
    assert!(v2.load_all().is_empty());
    assert_eq!(v2.key(), "form_builder_forms_v2");
}
