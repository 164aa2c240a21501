//! Tests for the mapping document format and its persistence.
mod common;
use common::*;
use prefill::mapping::{BuiltinSource, FormFieldSource, GlobalSource, RESERVED_KEYS};
use prefill::prelude::*;
use serde_json::{Map, Value, json};
use std::fs;
use std::rc::Rc;

fn populated_store() -> MappingStore {
    let mut store = MappingStore::new();
    store.upsert(
        "f2",
        PrefillMapping::new(
            "patient_email",
            MappingSource::form_field(FormFieldSource {
                source_form_id: "f1".to_string(),
                source_field_id: "email".to_string(),
                source_form_name: "Contact Form".to_string(),
                source_field_name: "Email".to_string(),
                source_field_type: Some("email".to_string()),
            }),
            fixed_time(),
        ),
    );
    store.upsert(
        "f2",
        PrefillMapping::new(
            "notes",
            MappingSource::global(GlobalSource {
                global_id: "org_name".to_string(),
                source_name: "Organization Name".to_string(),
                source_field_type: Some("text".to_string()),
            }),
            fixed_time(),
        ),
    );
    store.upsert(
        "f3",
        PrefillMapping::new("agreed", MappingSource::url_param("consent"), fixed_time()),
    );
    store
}

#[test]
fn test_document_shape() {
    let store = populated_store();
    let value: Value = serde_json::from_str(&store.to_json().unwrap()).unwrap();

    let mapping = &value["f2"]["patient_email"];
    assert_eq!(mapping["targetFieldId"], "patient_email");
    assert_eq!(mapping["sourceType"], "form_field");
    assert_eq!(mapping["sourceFormId"], "f1");
    assert_eq!(mapping["sourceFieldId"], "email");
    assert_eq!(mapping["createdAt"], "2024-05-01T12:00:00Z");
    assert_eq!(mapping["transform"], Value::Null);
    assert_eq!(mapping["condition"], Value::Null);
    assert_eq!(mapping["fallback"], Value::Null);

    assert_eq!(value["f2"]["notes"]["globalId"], "org_name");
    assert_eq!(value["f3"]["agreed"]["paramKey"], "consent");
    assert_eq!(value["f3"]["agreed"]["sourceFieldType"], "text");
}

#[test]
fn test_reload_then_save_reproduces_document() {
    let persistence = Rc::new(MemoryPersistence::new());
    persistence.save(&populated_store()).unwrap();
    let original = persistence.document().unwrap();

    let reloaded = persistence.load().unwrap().unwrap();
    assert_eq!(reloaded, populated_store());
    persistence.save(&reloaded).unwrap();
    assert_eq!(persistence.document().unwrap(), original);

    let manager = PrefillManager::builder(Box::new(persistence.clone()))
        .open()
        .unwrap();
    assert_eq!(manager.store(), &populated_store());
    assert_eq!(manager.display("f2", "notes").as_deref(), Some("← Organization Name"));
}

#[test]
fn test_extension_source_round_trips() {
    let mut fields = Map::new();
    fields.insert("endpoint".to_string(), json!("/patients/lookup"));
    fields.insert("path".to_string(), json!(["patient", "email"]));

    let mut store = MappingStore::new();
    store.upsert(
        "f2",
        PrefillMapping::new("patient_email", MappingSource::extension("api", fields.clone()), fixed_time()),
    );

    let json = store.to_json().unwrap();
    let reloaded = MappingStore::from_json(&json).unwrap();
    let mapping = reloaded.get("f2", "patient_email").unwrap();
    assert_eq!(mapping.source_type(), "api");
    assert_eq!(mapping.source, MappingSource::extension("api", fields));
    assert_eq!(mapping.source.display(), "← Unknown source");
    assert_eq!(reloaded.to_json().unwrap(), json);
}

#[test]
fn test_hand_written_document_is_accepted() {
    let json = r#"{
        "f2": {
            "patient_email": {
                "targetFieldId": "patient_email",
                "sourceType": "global",
                "createdAt": "2024-05-01T12:00:00.000Z",
                "transform": null,
                "condition": null,
                "fallback": null,
                "globalId": "user_email",
                "sourceName": "User Email",
                "sourceFieldType": "email"
            }
        }
    }"#;
    let store = MappingStore::from_json(json).unwrap();
    let mapping = store.get("f2", "patient_email").unwrap();
    assert_eq!(mapping.source_type(), "global");
    assert_eq!(mapping.created_at, fixed_time());
}

#[test]
fn test_malformed_document_fails_to_open() {
    let persistence = MemoryPersistence::with_document("{ not json");
    let result = PrefillManager::builder(Box::new(persistence)).open();
    assert!(matches!(result, Err(StoreError::Malformed(_))));
}

#[test]
fn test_remove_keeps_unrelated_entries() {
    let mut store = populated_store();
    assert!(store.remove("f3", "missing").is_none());
    assert_eq!(store, populated_store());

    store.remove("f3", "agreed").unwrap();
    assert!(store.form("f3").is_none());
    assert_eq!(store.len(), 2);
    let keys: Vec<_> = store.iter().map(|(form, field, _)| (form, field)).collect();
    assert_eq!(keys, vec![("f2", "patient_email"), ("f2", "notes")]);
}

#[test]
fn test_json_file_persistence() {
    let path = std::env::temp_dir().join(format!(
        "prefill-mappings-{}-{}.json",
        std::process::id(),
        "file_persistence"
    ));
    let _ = fs::remove_file(&path);
    let persistence = JsonFilePersistence::new(&path);

    assert_eq!(persistence.load().unwrap(), None);
    persistence.save(&populated_store()).unwrap();
    assert_eq!(persistence.load().unwrap(), Some(populated_store()));

    fs::write(&path, "[1, 2").unwrap();
    assert!(matches!(persistence.load(), Err(StoreError::Malformed(_))));

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_builtin_tag_with_missing_fields_is_rejected() {
    let global_without_id = r#"{
        "f2": {
            "patient_email": {
                "targetFieldId": "patient_email",
                "sourceType": "global",
                "createdAt": "2024-05-01T12:00:00Z",
                "sourceName": "User Email"
            }
        }
    }"#;
    assert!(matches!(
        MappingStore::from_json(global_without_id),
        Err(StoreError::Malformed(_))
    ));

    let form_field_without_field = r#"{
        "f2": {
            "patient_email": {
                "targetFieldId": "patient_email",
                "sourceType": "form_field",
                "createdAt": "2024-05-01T12:00:00Z",
                "sourceFormId": "f1"
            }
        }
    }"#;
    let persistence = MemoryPersistence::with_document(form_field_without_field);
    let result = PrefillManager::builder(Box::new(persistence)).open();
    assert!(matches!(result, Err(StoreError::Malformed(_))));

    let untagged = r#"{ "f2": { "notes": { "targetFieldId": "notes", "createdAt": "2024-05-01T12:00:00Z" } } }"#;
    assert!(matches!(
        MappingStore::from_json(untagged),
        Err(StoreError::Malformed(_))
    ));
}

#[test]
fn test_missing_source_names_fall_back_in_display() {
    let json = r#"{
        "f2": {
            "patient_email": {
                "targetFieldId": "patient_email",
                "sourceType": "global",
                "createdAt": "2024-05-01T12:00:00Z",
                "globalId": "user_email"
            },
            "notes": {
                "targetFieldId": "notes",
                "sourceType": "form_field",
                "createdAt": "2024-05-01T12:00:00Z",
                "sourceFormId": "f1",
                "sourceFieldId": "email",
                "sourceFieldName": "Email"
            }
        }
    }"#;
    let store = MappingStore::from_json(json).unwrap();

    let global = store.get("f2", "patient_email").unwrap();
    assert!(matches!(
        global.source,
        MappingSource::Builtin(BuiltinSource::Global(_))
    ));
    assert_eq!(global.source.display(), "← Global Data");

    let form_field = store.get("f2", "notes").unwrap();
    assert_eq!(form_field.source_type(), "form_field");
    assert_eq!(form_field.source.display(), "← Unknown Form");

    let graph = intake_graph();
    let request = RequestContext::new();
    let ctx = SourceContext::new(&graph, graph.node("f2").unwrap(), &request);
    let resolved = SourceRegistry::default().resolve(global, &ctx).unwrap();
    assert_eq!(resolved.value.as_deref(), Some("patient@example.com"));
}

#[test]
fn test_extension_fields_cannot_shadow_mapping_keys() {
    let mut fields = Map::new();
    for key in RESERVED_KEYS {
        fields.insert(key.to_string(), json!("x"));
    }
    fields.insert("endpoint".to_string(), json!("/patients/lookup"));

    let source = MappingSource::extension("api", fields);
    let MappingSource::Extension(ext) = &source else {
        panic!("expected an extension source");
    };
    assert_eq!(ext.source_type, "api");
    assert_eq!(ext.fields.keys().collect::<Vec<_>>(), vec!["endpoint"]);

    let mut store = MappingStore::new();
    store.upsert("f2", PrefillMapping::new("notes", source, fixed_time()));
    let json = store.to_json().unwrap();
    let reloaded = MappingStore::from_json(&json).unwrap();
    assert_eq!(reloaded, store);
    assert_eq!(reloaded.get("f2", "notes").unwrap().created_at, fixed_time());
}
