//! JSON type and emptiness checks.

use rules_core::{HandlerDefinition, HandlerTable};
use serde_json::Value;

pub(crate) fn install(table: &mut HandlerTable) {
    table
        .set("empty", HandlerDefinition::predicate(|v, _, _| Ok(is_empty(v))))
        .set("string", HandlerDefinition::predicate(|v, _, _| Ok(v.is_string())))
        .set("number", HandlerDefinition::predicate(|v, _, _| Ok(v.is_number())))
        .set(
            "integer",
            HandlerDefinition::predicate(|v, _, _| Ok(v.is_i64() || v.is_u64())),
        )
        .set("boolean", HandlerDefinition::predicate(|v, _, _| Ok(v.is_boolean())))
        .set("array", HandlerDefinition::predicate(|v, _, _| Ok(v.is_array())))
        .set("object", HandlerDefinition::predicate(|v, _, _| Ok(v.is_object())));
}

/// `null`, `""`, `[]` and `{}` are empty.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
