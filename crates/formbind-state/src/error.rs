//! Error types for formbind operations.

use crate::Path;
use thiserror::Error;

/// Result type alias for formbind operations.
pub type FormResult<T> = Result<T, FormError>;

/// Errors that can occur while writing form state or binding fields.
#[derive(Debug, Error)]
pub enum FormError {
    /// A write was requested with an empty path.
    #[error("invalid path: cannot write at the root ({path})")]
    InvalidPath {
        /// The offending path.
        path: Path,
    },

    /// An index reached before the start of the array, or further past its
    /// end than [`MAX_ARRAY_GAP`](crate::MAX_ARRAY_GAP) allows.
    #[error("index {index} out of bounds (len: {len}) at path {path}")]
    IndexOutOfBounds {
        /// The path to the array.
        path: Path,
        /// The index that was accessed.
        index: i64,
        /// The actual length of the array.
        len: usize,
    },

    /// A value has the wrong shape for the operation applied to it.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// The path where the mismatch occurred.
        path: Path,
        /// The expected type.
        expected: &'static str,
        /// The actual type found.
        found: &'static str,
    },

    #[error("[storePath] is required!")]
    MissingStorePath,

    #[error("invalid [fieldPath] given")]
    InvalidFieldPath,

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FormError {
    /// Create an invalid path error.
    #[inline]
    pub fn invalid_path(path: Path) -> Self {
        FormError::InvalidPath { path }
    }

    /// Create an index out of bounds error.
    #[inline]
    pub fn index_out_of_bounds(path: Path, index: i64, len: usize) -> Self {
        FormError::IndexOutOfBounds { path, index, len }
    }

    /// Create a type mismatch error.
    #[inline]
    pub fn type_mismatch(path: Path, expected: &'static str, found: &'static str) -> Self {
        FormError::TypeMismatch {
            path,
            expected,
            found,
        }
    }
}

/// Get the type name of a JSON value.
#[inline]
pub fn value_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn test_error_display() {
        let err = FormError::index_out_of_bounds(path!("items", -5), -5, 2);
        assert_eq!(
            err.to_string(),
            "index -5 out of bounds (len: 2) at path $.items[-5]"
        );
        assert_eq!(FormError::MissingStorePath.to_string(), "[storePath] is required!");
        assert_eq!(FormError::InvalidFieldPath.to_string(), "invalid [fieldPath] given");
    }

    #[test]
    fn test_value_type_name() {
        use serde_json::json;

        assert_eq!(value_type_name(&json!(null)), "null");
        assert_eq!(value_type_name(&json!(true)), "boolean");
        assert_eq!(value_type_name(&json!(42)), "number");
        assert_eq!(value_type_name(&json!("hello")), "string");
        assert_eq!(value_type_name(&json!([1, 2, 3])), "array");
        assert_eq!(value_type_name(&json!({"a": 1})), "object");
    }
}
