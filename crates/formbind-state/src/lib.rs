//! Path-addressed form state: parsing, nested get/set, and a reducer-driven store.
//!
//! `formbind-state` is the core under `formbind`. It turns human-authored
//! path strings into typed paths and reads or writes values at those paths
//! inside a JSON state tree without mutating the original.
//!
//! # Core Concepts
//!
//! - **Path / Seg**: a sequence of object keys and array indices
//! - **parse_path**: `"a.b[2].c"` to `path!("a", "b", 2, "c")`, never fails
//! - **get_at_path / set_at_path**: pure nested read and copy-on-write
//! - **FormAction / reduce**: the two state transitions a form needs
//! - **FormStore**: shared state that applies actions and notifies subscribers
//!
//! # Quick Start
//!
//! ```
//! use formbind_state::{get, set};
//! use serde_json::json;
//!
//! let state = json!({"user": {"emails": ["a@x.io"]}});
//!
//! let next = set(&state, "user.emails[1]", json!("b@x.io")).unwrap();
//!
//! assert_eq!(get(&next, "user.emails[-1]"), Some(&json!("b@x.io")));
//! assert_eq!(get(&state, "user.emails[1]"), None); // Original unchanged
//! ```

mod accessor;
mod action;
mod error;
mod parse;
mod path;
mod props;
mod reducer;
mod store;

pub use accessor::{get, get_at_path, set, set_at_path, MAX_ARRAY_GAP};
pub use action::{set_initial_values, update_field, FieldChange, FormAction};
pub use error::{value_type_name, FormError, FormResult};
pub use parse::{parse_path, parse_path_opt};
pub use path::{Path, Seg};
pub use props::{compute_exclude, display_value, exclude_props, is_none, is_truthy, tail_path};
pub use reducer::reduce;
pub use store::{DispatchResult, FormStore, StoreUpdate};

// Re-export serde_json::Value for convenience
pub use serde_json::Value;
