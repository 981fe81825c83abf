//! Integration test: end-to-end behavior of the type checker and the
//! coercion engine through the public API only.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cascade_core::coercion::builtin;
use cascade_core::{
    BoxError, CascadeError, CoercionEngine, CoercionErrorKind, CoercionRegistry, TypeChecker,
    TypeDescriptor, TypeRegistry, TypeValidationError, Value,
};

fn int_or_str() -> TypeDescriptor {
    TypeDescriptor::union([TypeDescriptor::INT, TypeDescriptor::STR])
}

#[test]
fn test_union_names_the_whole_union() {
    let registry = TypeRegistry::new();
    let checker = TypeChecker::new(&registry);

    checker.validate_type(&Value::from(5), &int_or_str()).unwrap();
    let err = checker.validate_type(&Value::from(5.0), &int_or_str()).unwrap_err();
    assert_eq!(err.expected(), &int_or_str());
    assert_eq!(err.value(), &Value::Float(5.0));
}

#[test]
fn test_sequence_fails_at_first_bad_element() {
    let registry = TypeRegistry::new();
    let checker = TypeChecker::new(&registry);
    let ints = TypeDescriptor::list_of(TypeDescriptor::INT);

    checker.validate_type(&Value::list([1, 2, 3]), &ints).unwrap();
    let bad = Value::list([Value::from(1), Value::from("x"), Value::from(2.5)]);
    let err = checker.validate_type(&bad, &ints).unwrap_err();
    assert_eq!(err.value(), &Value::from("x"));
    assert_eq!(err.expected(), &TypeDescriptor::INT);
}

/// Register a validator for `name` that accepts ints and counts its calls.
fn counting_int_validator(registry: &mut TypeRegistry, name: &str) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    registry.register(
        TypeDescriptor::custom(name),
        move |value: &Value| -> Result<(), BoxError> {
            counter.fetch_add(1, Ordering::SeqCst);
            match value {
                Value::Int(_) => Ok(()),
                _ => Err("ints only".into()),
            }
        },
    );
    calls
}

#[test]
fn test_sequence_check_does_not_look_past_the_first_bad_element() {
    let mut registry = TypeRegistry::new();
    let calls = counting_int_validator(&mut registry, "CountedInt");
    let checker = TypeChecker::new(&registry);
    let counted = TypeDescriptor::list_of(TypeDescriptor::custom("CountedInt"));

    let bad = Value::list([Value::from(1), Value::from("x"), Value::from(2), Value::from(3)]);
    let err = checker.validate_type(&bad, &counted).unwrap_err();
    assert_eq!(err.value(), &Value::from("x"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_mapping_check_does_not_look_past_the_first_bad_entry() {
    let mut registry = TypeRegistry::new();
    let calls = counting_int_validator(&mut registry, "CountedValue");
    let checker = TypeChecker::new(&registry);
    let counted = TypeDescriptor::map_of(TypeDescriptor::STR, TypeDescriptor::custom("CountedValue"));

    let bad = Value::map([("a", Value::from("x")), ("b", Value::from(1)), ("c", Value::from(2))]);
    assert!(checker.validate_type(&bad, &counted).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_union_stops_at_first_matching_alternative() {
    let mut registry = TypeRegistry::new();
    let second = counting_int_validator(&mut registry, "SecondChoice");
    let checker = TypeChecker::new(&registry);
    let ty = TypeDescriptor::union([TypeDescriptor::INT, TypeDescriptor::custom("SecondChoice")]);

    checker.validate_type(&Value::from(5), &ty).unwrap();
    assert_eq!(second.load(Ordering::SeqCst), 0);

    assert!(checker.validate_type(&Value::from(5.0), &ty).is_err());
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn test_union_tries_alternatives_in_declared_order() {
    let mut registry = TypeRegistry::new();
    let first = counting_int_validator(&mut registry, "FirstInt");
    let second = counting_int_validator(&mut registry, "SecondInt");
    let checker = TypeChecker::new(&registry);
    let ty = TypeDescriptor::union([
        TypeDescriptor::custom("FirstInt"),
        TypeDescriptor::custom("SecondInt"),
    ]);

    checker.validate_type(&Value::from(7), &ty).unwrap();
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 0);

    assert!(checker.validate_type(&Value::from("7"), &ty).is_err());
    assert_eq!(first.load(Ordering::SeqCst), 2);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn test_mapping_keys_and_values() {
    let registry = TypeRegistry::new();
    let checker = TypeChecker::new(&registry);
    let str_to_int = TypeDescriptor::map_of(TypeDescriptor::STR, TypeDescriptor::INT);

    checker.validate_type(&Value::map([("a", 1)]), &str_to_int).unwrap();
    assert!(!checker.is_instance(&Value::map([("a", "x")]), &str_to_int));
    assert!(!checker.is_instance(&Value::map([(1, 1)]), &str_to_int));
}

#[test]
fn test_nested_descriptor_from_text() {
    let registry = TypeRegistry::new();
    let checker = TypeChecker::new(&registry);
    let ty: TypeDescriptor = "dict[str, list[int | None]]".parse().unwrap();

    let good = Value::map([("a", Value::list([Value::from(1), Value::None]))]);
    checker.validate_type(&good, &ty).unwrap();
    let bad = Value::map([("a", Value::list([Value::from("1")]))]);
    let err = checker.validate_type(&bad, &ty).unwrap_err();
    assert_eq!(err.value(), &Value::from("1"));
}

#[test]
fn test_registered_validator_is_used_inside_containers() {
    let mut registry = TypeRegistry::new();
    let user_id = TypeDescriptor::custom("UserId");
    registry.register(user_id.clone(), |value: &Value| -> Result<(), BoxError> {
        match value.as_i64() {
            Some(n) if n > 0 => Ok(()),
            _ => Err(Box::new(TypeValidationError::with_message(
                value.clone(),
                TypeDescriptor::custom("UserId"),
                "user ids are positive integers",
            ))),
        }
    });
    let checker = TypeChecker::new(&registry);
    let ids = TypeDescriptor::list_of(user_id);

    checker.validate_type(&Value::list([3, 4]), &ids).unwrap();
    let err = checker.validate_type(&Value::list([3, -4]), &ids).unwrap_err();
    assert_eq!(err.message(), "user ids are positive integers");
}

#[test]
fn test_can_coerce_tracks_registration() {
    let mut registry = CoercionRegistry::new();
    let value = Value::from("123");
    assert!(!CoercionEngine::new(&registry).can_coerce(&value, &TypeDescriptor::INT));

    registry.register(TypeDescriptor::INT, builtin::to_int);
    assert!(CoercionEngine::new(&registry).can_coerce(&value, &TypeDescriptor::INT));

    assert!(registry.unregister(&TypeDescriptor::INT).is_some());
    assert!(registry.unregister(&TypeDescriptor::INT).is_none());
    assert!(!CoercionEngine::new(&registry).can_coerce(&value, &TypeDescriptor::INT));
}

#[test]
fn test_coerce_outcomes() {
    let mut registry = CoercionRegistry::new();
    let engine_err = |registry: &CoercionRegistry| {
        CoercionEngine::new(registry)
            .coerce(&Value::from("123"), &TypeDescriptor::INT)
            .unwrap_err()
    };

    match engine_err(&registry) {
        CascadeError::Coercion(e) => assert_eq!(e.kind(), &CoercionErrorKind::NoCoercer),
        other => panic!("expected no-coercer, got {other}"),
    }

    registry.register(TypeDescriptor::INT, builtin::to_int);
    let converted = CoercionEngine::new(&registry)
        .coerce(&Value::from("123"), &TypeDescriptor::INT)
        .unwrap();
    assert_eq!(converted, Value::Int(123));

    registry.register(TypeDescriptor::INT, |_: &Value| -> Result<Value, BoxError> {
        Ok(Value::from("still a string"))
    });
    match engine_err(&registry) {
        CascadeError::Coercion(e) => {
            assert!(matches!(e.kind(), CoercionErrorKind::ResultTypeMismatch { .. }))
        }
        other => panic!("expected result mismatch, got {other}"),
    }
}

#[test]
fn test_coercer_failure_keeps_original_error() {
    let mut registry = CoercionRegistry::new();
    registry.register(TypeDescriptor::INT, builtin::to_int);
    let err = CoercionEngine::new(&registry)
        .coerce(&Value::from("twelve"), &TypeDescriptor::INT)
        .unwrap_err();
    match err {
        CascadeError::CoercerFailed { source, .. } => {
            assert!(source.downcast_ref::<builtin::ConversionError>().is_some());
        }
        other => panic!("expected the coercer's own failure, got {other}"),
    }
}
