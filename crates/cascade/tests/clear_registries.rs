//! Integration test: clearing the process-wide registries. Kept in its own
//! binary so it cannot race with tests that register entries.

use cascade::api;
use cascade::{BoxError, TypeDescriptor, Value};

#[test]
fn test_clear_empties_both_registries() {
    let names = ["ClearA", "ClearB", "ClearC"];
    for name in names {
        api::register_type(TypeDescriptor::custom(name), |_: &Value| -> Result<(), BoxError> {
            Ok(())
        });
    }
    api::register_builtin_coercers();
    assert!(api::can_coerce(&Value::from("1"), &TypeDescriptor::INT));

    api::clear_registry();
    for name in names {
        assert!(api::get_registered_validator(&TypeDescriptor::custom(name)).is_none());
    }
    // With no validator registered, the custom type falls back to name matching.
    assert!(api::validate_type(&Value::from(1), &TypeDescriptor::custom("ClearA")).is_err());

    api::clear_coercers();
    for target in [
        TypeDescriptor::INT,
        TypeDescriptor::FLOAT,
        TypeDescriptor::STR,
        TypeDescriptor::BOOL,
    ] {
        assert!(!api::can_coerce(&Value::None, &target));
    }
}
