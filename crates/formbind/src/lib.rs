//! Bind form fields to a path inside a shared JSON store.
//!
//! A [`FormBinding`] selects the form state at its `store_path`, validates it,
//! and produces field props (value, disabled, name, invalid flag) for any field
//! path inside the form. Field edits come back through the `on_change`
//! callback, where they are usually turned into an [`update_field`] action for
//! the [`FormStore`].
//!
//! # Quick Start
//!
//! ```
//! use formbind::{update_field, BindingConfig, FieldEvent, FieldOptions, FormBinding, FormStore};
//! use serde_json::json;
//! use std::sync::{Arc, Mutex};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = FormStore::new(json!({"signup": {"email": ""}}));
//! let pending = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&pending);
//! let mut form = FormBinding::builder(BindingConfig::new("signup"))
//!     .with_on_change(move |change, _event| {
//!         sink.lock().unwrap().push(update_field("signup", change));
//!     })
//!     .build()
//!     .unwrap();
//!
//! form.sync_from(&store).await;
//! let email = form.field_props("email", FieldOptions::new().required()).unwrap();
//! assert_eq!(email.get("isInvalid"), Some(&json!(true)));
//!
//! email.on_change(FieldEvent::native("ann@x.io"));
//! let actions = std::mem::take(&mut *pending.lock().unwrap());
//! store.dispatch_batch(actions).await.unwrap();
//!
//! form.sync_from(&store).await;
//! let email = form.field_props("email", FieldOptions::new().required()).unwrap();
//! assert_eq!(email.get("value"), Some(&json!("ann@x.io")));
//! assert_eq!(email.get("isInvalid"), Some(&json!(false)));
//! # });
//! ```

mod binding;
mod config;

pub use binding::{
    ChangeFn, DisableFn, EventTarget, FieldEvent, FieldInput, FieldOptions, FieldProps,
    FormBinding, FormBindingBuilder, KeyFn, SubmitArgs, SubmitFn, TransformFn, ValidateFn,
};
pub use config::{BindingConfig, NegativeIndexPolicy};

pub use formbind_state::{
    exclude_props, get, get_at_path, parse_path, path, reduce, set, set_at_path,
    set_initial_values, update_field, FieldChange, FormAction, FormError, FormResult, FormStore,
    Path, Seg, StoreUpdate, Value,
};
