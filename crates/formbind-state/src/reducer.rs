//! The pure form reducer.

use crate::{
    error::{value_type_name, FormError, FormResult},
    parse_path, set_at_path, FormAction, Path,
};
use serde_json::{Map, Value};

/// Apply `action` to `state` and return the next state (pure function).
///
/// # Examples
///
/// ```
/// use formbind_state::{reduce, update_field, FieldChange};
/// use serde_json::json;
///
/// let state = json!({"signup": {"email": ""}});
/// let action = update_field("signup", FieldChange { name: "email".into(), value: json!("a@b.c") });
///
/// let next = reduce(&state, &action).unwrap();
/// assert_eq!(next["signup"]["email"], "a@b.c");
/// assert_eq!(state["signup"]["email"], "");
/// ```
pub fn reduce(state: &Value, action: &FormAction) -> FormResult<Value> {
    match action {
        FormAction::SetInitialValues { payload } => merge_initial_values(state, payload),
        FormAction::UpdateField { key, name, value } => {
            let target = parse_path(key).join(&parse_path(name));
            set_at_path(state, &target, value.clone())
        }
    }
}

fn merge_initial_values(state: &Value, payload: &Value) -> FormResult<Value> {
    let incoming = payload
        .as_object()
        .ok_or_else(|| FormError::type_mismatch(Path::root(), "object", value_type_name(payload)))?;

    let mut merged = match state {
        Value::Object(obj) => obj.clone(),
        _ => Map::new(),
    };
    for (k, v) in incoming {
        merged.insert(k.clone(), v.clone());
    }

    Ok(Value::Object(merged))
}
