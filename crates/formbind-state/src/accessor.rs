//! Reading and writing values at a path inside form state.
//!
//! Both directions follow the same addressing rules:
//!
//! - a key selects an object entry, or an array element when the key is a
//!   canonical non-negative integer (`"0"`, `"12"`)
//! - an index selects an array element, counting from the end when negative,
//!   or the object entry named by the decimal index
//!
//! Writes never touch their input: `set_at_path` builds a new document that
//! differs from the original only along the written path.

use crate::{
    error::{value_type_name, FormError, FormResult},
    parse_path, Path, Seg,
};
use serde_json::{Map, Value};

/// Most `null` slots a single write may add past the end of an array.
pub const MAX_ARRAY_GAP: usize = 10_000;

/// Get a reference to the value at a path.
///
/// Returns `None` when any step of the walk is missing. A stored `null`
/// comes back as `Some(&Value::Null)`.
///
/// # Examples
///
/// ```
/// use formbind_state::{get_at_path, path};
/// use serde_json::json;
///
/// let doc = json!({"a": {"list": [1, 2, 3], "empty": null}});
/// assert_eq!(get_at_path(&doc, &path!("a", "list", -1)), Some(&json!(3)));
/// assert_eq!(get_at_path(&doc, &path!("a", "empty")), Some(&json!(null)));
/// assert_eq!(get_at_path(&doc, &path!("a", "missing")), None);
/// ```
pub fn get_at_path<'a>(doc: &'a Value, path: &Path) -> Option<&'a Value> {
    path.iter().try_fold(doc, step)
}

/// Parse `path` and read the value there.
pub fn get<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    get_at_path(doc, &parse_path(path))
}

fn step<'a>(current: &'a Value, seg: &Seg) -> Option<&'a Value> {
    match (seg, current) {
        (Seg::Key(key), Value::Object(obj)) => obj.get(key),
        (Seg::Key(key), Value::Array(arr)) => canonical_index(key).and_then(|i| arr.get(i)),
        (Seg::Index(idx), Value::Array(arr)) => resolve_index(*idx, arr.len()).and_then(|i| arr.get(i)),
        (Seg::Index(idx), Value::Object(obj)) => obj.get(&idx.to_string()),
        _ => None,
    }
}

/// Write `value` at `path` and return the new document (pure function).
///
/// Missing intermediate containers are created: an object for a key
/// segment, an array for an index segment. Scalars and nulls in the way are
/// replaced. Writing past the end of an array pads it with `null`. A
/// non-numeric key on an array turns it into an object keyed by position.
///
/// # Errors
///
/// - [`FormError::InvalidPath`] for an empty path
/// - [`FormError::IndexOutOfBounds`] for a negative index reaching before
///   the start of an array, or a write more than [`MAX_ARRAY_GAP`] slots
///   past its end
///
/// # Examples
///
/// ```
/// use formbind_state::{set_at_path, path};
/// use serde_json::json;
///
/// let doc = json!({"keep": true});
/// let new_doc = set_at_path(&doc, &path!("rows", 2, "name"), json!("x")).unwrap();
///
/// assert_eq!(new_doc, json!({"keep": true, "rows": [null, null, {"name": "x"}]}));
/// assert_eq!(doc, json!({"keep": true}));
/// ```
pub fn set_at_path(doc: &Value, path: &Path, value: Value) -> FormResult<Value> {
    if path.is_empty() {
        return Err(FormError::invalid_path(path.clone()));
    }

    tracing::trace!(path = %path, "writing form state");
    build(Some(doc), path, 0, value)
}

/// Parse `path` and write `value` there.
pub fn set(doc: &Value, path: &str, value: Value) -> FormResult<Value> {
    set_at_path(doc, &parse_path(path), value)
}

/// Rebuild `current` with the remaining segments of `full_path` written.
fn build(current: Option<&Value>, full_path: &Path, depth: usize, value: Value) -> FormResult<Value> {
    let Some(seg) = full_path.segments().get(depth) else {
        return Ok(value);
    };
    let next = |child: Option<&Value>| build(child, full_path, depth + 1, value);

    match (seg, current) {
        (Seg::Key(key), Some(Value::Object(obj))) => rebuild_object(obj, key, next).map(Value::Object),
        (Seg::Key(key), Some(Value::Array(arr))) => match canonical_index(key) {
            Some(idx) => {
                let idx = within_gap(full_path, depth, idx, arr.len())?;
                rebuild_array(arr, idx, next).map(Value::Array)
            }
            None => rebuild_object(&positions_to_keys(arr), key, next).map(Value::Object),
        },
        (Seg::Key(key), _) => rebuild_object(&Map::new(), key, next).map(Value::Object),
        (Seg::Index(idx), Some(Value::Array(arr))) => {
            let resolved = resolve_index(*idx, arr.len()).ok_or_else(|| {
                FormError::index_out_of_bounds(full_path.prefix(depth + 1), *idx, arr.len())
            })?;
            let resolved = within_gap(full_path, depth, resolved, arr.len())?;
            rebuild_array(arr, resolved, next).map(Value::Array)
        }
        (Seg::Index(idx), Some(Value::Object(obj))) => {
            rebuild_object(obj, &idx.to_string(), next).map(Value::Object)
        }
        (Seg::Index(idx), other) => {
            let resolved = resolve_index(*idx, 0).ok_or_else(|| {
                let found = other.map(value_type_name).unwrap_or("nothing");
                tracing::trace!(found, index = *idx, "negative index on a missing array");
                FormError::index_out_of_bounds(full_path.prefix(depth + 1), *idx, 0)
            })?;
            let resolved = within_gap(full_path, depth, resolved, 0)?;
            rebuild_array(&[], resolved, next).map(Value::Array)
        }
    }
}

/// Reject positions that would pad an array of `len` by more than [`MAX_ARRAY_GAP`].
fn within_gap(full_path: &Path, depth: usize, idx: usize, len: usize) -> FormResult<usize> {
    if idx.saturating_sub(len) > MAX_ARRAY_GAP {
        let index = i64::try_from(idx).unwrap_or(i64::MAX);
        tracing::debug!(index, len, "array write too far past the end");
        return Err(FormError::index_out_of_bounds(full_path.prefix(depth + 1), index, len));
    }
    Ok(idx)
}

/// Object holding the elements of `arr` under their decimal positions.
fn positions_to_keys(arr: &[Value]) -> Map<String, Value> {
    arr.iter()
        .enumerate()
        .map(|(i, v)| (i.to_string(), v.clone()))
        .collect()
}

/// Copy `obj` with the entry at `key` replaced by `child`'s result.
/// Entry order is preserved; a new key goes last.
fn rebuild_object<F>(obj: &Map<String, Value>, key: &str, child: F) -> FormResult<Map<String, Value>>
where
    F: FnOnce(Option<&Value>) -> FormResult<Value>,
{
    let mut replacement = Some(child(obj.get(key))?);
    let mut out = Map::new();

    for (k, v) in obj {
        if k != key {
            out.insert(k.clone(), v.clone());
        } else if let Some(new_value) = replacement.take() {
            out.insert(k.clone(), new_value);
        }
    }
    if let Some(new_value) = replacement {
        out.insert(key.to_owned(), new_value);
    }

    Ok(out)
}

/// Copy `arr` with position `idx` replaced by `child`'s result, padding
/// with `null` when `idx` is past the end.
fn rebuild_array<F>(arr: &[Value], idx: usize, child: F) -> FormResult<Vec<Value>>
where
    F: FnOnce(Option<&Value>) -> FormResult<Value>,
{
    let mut replacement = Some(child(arr.get(idx))?);
    let mut out = Vec::with_capacity(arr.len().max(idx + 1));

    for (i, v) in arr.iter().enumerate() {
        if i != idx {
            out.push(v.clone());
        } else if let Some(new_value) = replacement.take() {
            out.push(new_value);
        }
    }
    if let Some(new_value) = replacement {
        out.resize(idx, Value::Null);
        out.push(new_value);
    }

    Ok(out)
}

/// Array position for a key such as `"3"`. Leading zeros and signs do not count.
fn canonical_index(key: &str) -> Option<usize> {
    let idx: usize = key.parse().ok()?;
    (idx.to_string() == key).then_some(idx)
}

/// Absolute array position for `idx`; negative values count back from `len`.
fn resolve_index(idx: i64, len: usize) -> Option<usize> {
    if idx >= 0 {
        usize::try_from(idx).ok()
    } else {
        let back = usize::try_from(idx.unsigned_abs()).ok()?;
        len.checked_sub(back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    #[test]
    fn test_get_at_path() {
        let doc = json!({"a": {"b": {"c": 42}}});
        assert_eq!(get_at_path(&doc, &path!("a", "b", "c")), Some(&json!(42)));
        assert_eq!(get_at_path(&doc, &path!("a", "x")), None);
        assert_eq!(get_at_path(&doc, &Path::root()), Some(&doc));
    }

    #[test]
    fn test_get_distinguishes_null_from_absent() {
        let doc = json!({"a": null, "b": false, "c": 0});
        assert_eq!(get(&doc, "a"), Some(&Value::Null));
        assert_eq!(get(&doc, "b"), Some(&json!(false)));
        assert_eq!(get(&doc, "c"), Some(&json!(0)));
        assert_eq!(get(&doc, "d"), None);
        assert_eq!(get(&doc, "a.deeper"), None);
    }

    #[test]
    fn test_get_indices() {
        let doc = json!({"list": ["x", "y", "z"], "by_id": {"7": "seven"}});
        assert_eq!(get(&doc, "list[0]"), Some(&json!("x")));
        assert_eq!(get(&doc, "list.1"), Some(&json!("y")));
        assert_eq!(get(&doc, "list[-1]"), Some(&json!("z")));
        assert_eq!(get(&doc, "list[-4]"), None);
        assert_eq!(get(&doc, "list[3]"), None);
        assert_eq!(get(&doc, "list.01"), None);
        assert_eq!(get(&doc, "by_id[7]"), Some(&json!("seven")));
    }

    #[test]
    fn test_set_replaces_leaf() {
        let doc = json!({"name": "Alice", "age": 30});
        let result = set(&doc, "name", json!("Bob")).unwrap();
        assert_eq!(result, json!({"name": "Bob", "age": 30}));
        assert_eq!(doc["name"], "Alice");
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let result = set(&json!({}), "a.b.c", json!(42)).unwrap();
        assert_eq!(result, json!({"a": {"b": {"c": 42}}}));
    }

    #[test]
    fn test_set_creates_intermediate_arrays() {
        let result = set(&json!(null), "rows[1].name", json!("n")).unwrap();
        assert_eq!(result, json!({"rows": [null, {"name": "n"}]}));
    }

    #[test]
    fn test_set_extends_array_with_nulls() {
        let doc = json!({"arr": [1, 2, 3]});
        let result = set(&doc, "arr[5]", json!(6)).unwrap();
        assert_eq!(result["arr"], json!([1, 2, 3, null, null, 6]));
    }

    #[test]
    fn test_set_rejects_index_far_past_the_end() {
        let err = set(&json!({}), "a[9223372036854775807]", json!(1)).unwrap_err();
        assert!(matches!(
            err,
            FormError::IndexOutOfBounds { index: i64::MAX, len: 0, .. }
        ));

        let doc = json!({"arr": [1, 2, 3]});
        let err = set(&doc, "arr[1000000000000].x", json!(1)).unwrap_err();
        match err {
            FormError::IndexOutOfBounds { path, index, len } => {
                assert_eq!(path, path!("arr", 1_000_000_000_000i64));
                assert_eq!(index, 1_000_000_000_000);
                assert_eq!(len, 3);
            }
            other => panic!("expected IndexOutOfBounds, got {other:?}"),
        }

        let err = set(&doc, "arr.99999999", json!(1)).unwrap_err();
        assert!(matches!(err, FormError::IndexOutOfBounds { len: 3, .. }));
    }

    #[test]
    fn test_set_pads_up_to_the_gap_limit() {
        let doc = json!({"arr": [1]});
        let at_limit = format!("arr[{}]", 1 + MAX_ARRAY_GAP);
        let result = set(&doc, &at_limit, json!(2)).unwrap();
        assert_eq!(result["arr"].as_array().map(Vec::len), Some(MAX_ARRAY_GAP + 2));

        let past_limit = format!("arr[{}]", 2 + MAX_ARRAY_GAP);
        assert!(set(&doc, &past_limit, json!(2)).is_err());
    }

    #[test]
    fn test_set_replaces_scalar_in_the_way() {
        let doc = json!({"a": 5});
        let result = set(&doc, "a.b", json!(1)).unwrap();
        assert_eq!(result, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_set_negative_index() {
        let doc = json!({"arr": [1, 2, 3]});
        let result = set(&doc, "arr[-1]", json!(30)).unwrap();
        assert_eq!(result["arr"], json!([1, 2, 30]));

        let err = set(&doc, "arr[-4]", json!(0)).unwrap_err();
        assert!(matches!(
            err,
            FormError::IndexOutOfBounds { index: -4, len: 3, .. }
        ));

        let err = set(&json!({}), "fresh[-1]", json!(0)).unwrap_err();
        assert!(matches!(err, FormError::IndexOutOfBounds { len: 0, .. }));
    }

    #[test]
    fn test_set_index_into_object_uses_string_key() {
        let doc = json!({"by_id": {"1": "one"}});
        let result = set(&doc, "by_id[2]", json!("two")).unwrap();
        assert_eq!(result["by_id"], json!({"1": "one", "2": "two"}));
    }

    #[test]
    fn test_set_key_on_array() {
        let doc = json!({"arr": [1, 2]});
        let result = set(&doc, "arr.0", json!(10)).unwrap();
        assert_eq!(result["arr"], json!([10, 2]));

        let result = set(&doc, "arr.name", json!("x")).unwrap();
        assert_eq!(result["arr"], json!({"0": 1, "1": 2, "name": "x"}));
        assert_eq!(get(&result, "arr.name"), Some(&json!("x")));
        assert_eq!(get(&result, "arr[1]"), Some(&json!(2)));
        assert_eq!(doc["arr"], json!([1, 2]));
    }

    #[test]
    fn test_set_empty_path_is_invalid() {
        let err = set_at_path(&json!({"a": 1}), &Path::root(), json!(2)).unwrap_err();
        assert!(matches!(err, FormError::InvalidPath { .. }));

        let err = set(&json!({}), "..", json!(2)).unwrap_err();
        assert!(matches!(err, FormError::InvalidPath { .. }));
    }

    #[test]
    fn test_set_preserves_key_order() {
        let doc = json!({"z": 1, "a": 2, "m": 3});
        let result = set(&doc, "a", json!(20)).unwrap();
        let keys: Vec<_> = result.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(0, 0), Some(0));
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-3, 3), Some(0));
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(i64::MIN, 3), None);
    }

    #[test]
    fn test_canonical_index() {
        assert_eq!(canonical_index("0"), Some(0));
        assert_eq!(canonical_index("12"), Some(12));
        assert_eq!(canonical_index("012"), None);
        assert_eq!(canonical_index("+1"), None);
        assert_eq!(canonical_index("x"), None);
    }
}
