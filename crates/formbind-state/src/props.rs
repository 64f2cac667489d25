//! Helpers for shaping field-prop maps and inspecting leaf values.

use serde_json::{Map, Value};

/// Copy `props` without the keys listed in `exclude`.
///
/// Surviving keys keep their original order.
///
/// # Examples
///
/// ```
/// use formbind_state::exclude_props;
/// use serde_json::json;
///
/// let props = json!({"a": 1, "b": 2});
/// let kept = exclude_props(&["a"], props.as_object().unwrap());
/// assert_eq!(serde_json::Value::Object(kept), json!({"b": 2}));
/// ```
pub fn exclude_props<S: AsRef<str>>(exclude: &[S], props: &Map<String, Value>) -> Map<String, Value> {
    props
        .iter()
        .filter(|(key, _)| !exclude.iter().any(|ex| ex.as_ref() == key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Deduplicate `exclude` (first occurrence wins) and drop every key that
/// also appears in `include`.
pub fn compute_exclude<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(exclude.len());
    for key in exclude.iter().map(AsRef::as_ref) {
        if include.iter().any(|inc| inc.as_ref() == key) || out.iter().any(|seen| seen == key) {
            continue;
        }
        out.push(key.to_owned());
    }
    out
}

/// Dotted path without its first piece: `"form.user.name"` becomes `"user.name"`.
pub fn tail_path(path: &str) -> String {
    path.split('.').skip(1).collect::<Vec<_>>().join(".")
}

/// True for values that carry nothing: `null`, `""`, `[]` and `{}`.
pub fn is_none(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Truthiness used for validation results: `null`, `false`, `0` and `""` are
/// falsy, every other value is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text shown in a field for `value`. Absent and `null` render as empty.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
