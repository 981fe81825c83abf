//! Integration test: schemas loaded from files drive validation.

use std::io::Write;
use std::sync::Arc;

use cascade_core::{TypeChecker, TypeRegistry, Value};
use cascade_record::{DynamicRecord, RecordSchema, SchemaLoadError, ValidationOrchestrator};

const USER_YAML: &str = r#"
name: User
fields:
  - name: id
    type: int
  - name: email
    type: str
    rules:
      - rule: pattern
        regex: "^[^@]+@[^@]+$"
  - name: status
    type: str
    rules:
      - rule: one_of
        values: [active, suspended]
    default: active
  - name: tags
    type: list[str]
    rules:
      - rule: max_length
        value: 3
    default: []
"#;

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_yaml_file_drives_validation() {
    let file = write_temp(".yaml", USER_YAML);
    let schema = Arc::new(RecordSchema::load(file.path()).unwrap());
    assert_eq!(schema.name(), "User");

    let registry = TypeRegistry::new();
    let orchestrator = ValidationOrchestrator::new(TypeChecker::new(&registry));

    let mut user = DynamicRecord::from_json(
        Arc::clone(&schema),
        serde_json::json!({"id": 1, "email": "ada@example.com"}),
    )
    .unwrap();
    assert_eq!(user.get("status"), Some(&Value::from("active")));
    orchestrator.validate(&user).unwrap();

    user.set("tags", Value::list(["a", "b", "c", "d"])).unwrap();
    let err = orchestrator.validate(&user).unwrap_err();
    assert!(err.is_rule());

    user.set("tags", Value::list([1])).unwrap();
    assert!(orchestrator.validate(&user).unwrap_err().is_type());
}

#[test]
fn test_json_file() {
    let file = write_temp(
        ".json",
        r#"{"name": "Point", "fields": [{"name": "x", "type": "float | int"}, {"name": "y", "type": "float | int"}]}"#,
    );
    let schema = Arc::new(RecordSchema::load(file.path()).unwrap());
    let point = DynamicRecord::new(schema, [("x", Value::from(1)), ("y", Value::from(2.5))]).unwrap();

    let registry = TypeRegistry::new();
    assert!(ValidationOrchestrator::new(TypeChecker::new(&registry)).is_valid(&point));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RecordSchema::load(dir.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, SchemaLoadError::Io { .. }));
}

#[test]
fn test_malformed_yaml() {
    let file = write_temp(".yml", "name: [unclosed");
    let err = RecordSchema::load(file.path()).unwrap_err();
    assert!(matches!(err, SchemaLoadError::Yaml(_)));
}
