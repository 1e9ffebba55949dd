use rstest::{fixture, rstest};
use serde_json::json;

use super::*;

fn add(params: &Params) -> Result<Value, RouteError> {
    let operand = |index| {
        params
            .positional(index)
            .and_then(Value::as_i64)
            .ok_or_else(|| RouteError::bad_request("expected two integers"))
    };
    Ok(json!(operand(0)? + operand(1)?))
}

#[fixture]
fn registry() -> UnitRegistry {
    UnitRegistry::new().with_unit(
        "math",
        MethodTable::new()
            .with_operation("add", add)
            .with_operation("zero", |_| Ok(json!(0))),
    )
}

#[rstest]
fn resolves_registered_units(registry: UnitRegistry) {
    assert!(registry.contains("math"));
    assert!(!registry.contains("text"));
    assert!(registry.resolve("text").is_none());

    let unit = registry.resolve("math").expect("math unit");
    assert_eq!(unit.operation_names(), vec!["add", "zero"]);
}

#[rstest]
fn operations_receive_params(registry: UnitRegistry) {
    let unit = registry.resolve("math").expect("math unit");
    let operation = unit.operation("add").expect("add operation");

    let sum = operation
        .invoke(&Params::Positional(vec![json!(2), json!(3)]))
        .expect("sum");
    assert_eq!(sum, json!(5));

    let error = operation.invoke(&Params::None).expect_err("missing operands");
    assert_eq!(error.status_code(), 400);
}

#[test]
fn later_registration_replaces_earlier() {
    let mut table = MethodTable::new().with_operation("v", |_| Ok(json!(1)));
    table.insert("v", |_| Ok(json!(2)));
    assert_eq!(table.len(), 1);

    let value = table
        .operation("v")
        .expect("operation")
        .invoke(&Params::None)
        .expect("value");
    assert_eq!(value, json!(2));
}

#[test]
fn debug_lists_names_only() {
    let registry = UnitRegistry::new()
        .with_unit("b", MethodTable::new())
        .with_unit("a", MethodTable::new());
    assert_eq!(format!("{registry:?}"), r#"UnitRegistry { units: ["a", "b"] }"#);
}
