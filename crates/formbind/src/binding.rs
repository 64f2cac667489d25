//! FormBinding derives field props from the form state stored at a path.
//!
//! The binding owns no store. Callers feed it state with [`FormBinding::sync`]
//! (or [`FormBinding::sync_from`]) and turn field changes into store actions
//! through the `on_change` callback.

use crate::config::{BindingConfig, NegativeIndexPolicy};
use formbind_state::{
    display_value, exclude_props, get_at_path, is_none, is_truthy, parse_path, FieldChange,
    FormError, FormResult, FormStore, Path,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Returns true while the form should be disabled.
pub type DisableFn = Arc<dyn Fn() -> bool + Send + Sync>;
/// Maps a field's raw value to the value shown and emitted.
pub type TransformFn = Arc<dyn Fn(&FieldInput) -> Value + Send + Sync>;
/// Computes an error map (field path to error) from the form state.
pub type ValidateFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;
/// Receives every field change together with the event that caused it.
pub type ChangeFn = Arc<dyn Fn(FieldChange, &FieldEvent) + Send + Sync>;
/// Receives the submit arguments.
pub type SubmitFn = Arc<dyn Fn(SubmitArgs) + Send + Sync>;
/// Computes a child path suffix from `(parent_value, form_state)`.
pub type KeyFn = Arc<dyn Fn(&Value, &Value) -> String + Send + Sync>;

/// Input to the transform callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInput {
    pub name: String,
    pub value: Value,
}

/// The element an input event originated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTarget {
    pub value: Value,
}

/// What a field's change handler receives: an input event, or a bare value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    Native { target: EventTarget },
    Value(Value),
}

impl FieldEvent {
    /// Create an input event whose target holds `value`.
    pub fn native(value: impl Into<Value>) -> Self {
        FieldEvent::Native {
            target: EventTarget {
                value: value.into(),
            },
        }
    }

    pub fn is_event(&self) -> bool {
        matches!(self, FieldEvent::Native { .. })
    }

    /// The carried value: the target's value for events, the value itself otherwise.
    pub fn value(&self) -> &Value {
        match self {
            FieldEvent::Native { target } => &target.value,
            FieldEvent::Value(value) => value,
        }
    }
}

impl From<Value> for FieldEvent {
    fn from(value: Value) -> Self {
        FieldEvent::Value(value)
    }
}

/// Per-field options for [`FormBinding::field_props`].
#[derive(Clone, Default)]
pub struct FieldOptions {
    /// An empty value marks the field invalid.
    pub is_required: bool,
    /// Prop keys left out of the result.
    pub exclude: Vec<String>,
    /// Overrides the `name` prop and is also looked up in the error map.
    pub name: Option<String>,
    /// Selects a child of the field value, e.g. returning `"[2]"`.
    pub key: Option<KeyFn>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    #[must_use]
    pub fn exclude<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(keys.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn key<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> String + Send + Sync + 'static,
    {
        self.key = Some(Arc::new(f));
        self
    }
}

/// Arguments handed to the submit callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitArgs {
    pub values: Value,
    pub is_invalid: bool,
    pub errors: Map<String, Value>,
}

/// Props for one field, plus its change handler.
#[derive(Clone)]
pub struct FieldProps {
    props: Map<String, Value>,
    path: String,
    is_invalid: bool,
    transform: TransformFn,
    on_change: ChangeFn,
}

impl FieldProps {
    /// The prop map: `value`, `selected`, `disabled`, `name`, `isInvalid`,
    /// minus any excluded keys.
    pub fn props(&self) -> &Map<String, Value> {
        &self.props
    }

    pub fn into_props(self) -> Map<String, Value> {
        self.props
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Full path of the field inside the form, child suffix included.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_invalid(&self) -> bool {
        self.is_invalid
    }

    /// Handle an edit: transform the incoming value and pass it to `on_change`.
    pub fn on_change(&self, event: impl Into<FieldEvent>) {
        let event = event.into();
        let value = (self.transform)(&FieldInput {
            name: self.path.clone(),
            value: event.value().clone(),
        });
        tracing::trace!(field = %self.path, native = event.is_event(), "field changed");
        (self.on_change)(
            FieldChange {
                name: self.path.clone(),
                value,
            },
            &event,
        );
    }
}

/// Binds form fields to the form state found at `store_path`.
///
/// # Example
///
/// ```
/// use formbind::{BindingConfig, FieldOptions, FormBinding};
/// use serde_json::json;
///
/// let mut form = FormBinding::builder(BindingConfig::new("forms.login")).build().unwrap();
/// form.sync(&json!({"forms": {"login": {"user": "ann"}}}));
///
/// let props = form.field_props("user", FieldOptions::new()).unwrap();
/// assert_eq!(props.get("value"), Some(&json!("ann")));
/// assert_eq!(props.get("name"), Some(&json!("user")));
/// ```
pub struct FormBinding {
    config: BindingConfig,
    store_path: Path,
    disable: DisableFn,
    transform: TransformFn,
    validate: ValidateFn,
    on_change: ChangeFn,
    on_submit: SubmitFn,
    form_state: Value,
    errors: Map<String, Value>,
    is_disabled: bool,
}

impl FormBinding {
    pub fn builder(config: BindingConfig) -> FormBindingBuilder {
        FormBindingBuilder::new(config)
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Refresh the form state from the full store state and re-run the
    /// disable and validate callbacks.
    pub fn sync(&mut self, root: &Value) {
        self.form_state = get_at_path(root, &self.store_path)
            .cloned()
            .unwrap_or(Value::Null);
        self.is_disabled = (self.disable)();
        self.errors = match (self.validate)(&self.form_state) {
            Value::Object(errors) => errors,
            _ => Map::new(),
        };
        tracing::debug!(
            store_path = %self.config.store_path,
            errors = self.errors.len(),
            disabled = self.is_disabled,
            "form binding synced"
        );
    }

    /// [`sync`](Self::sync) against the current snapshot of `store`.
    pub async fn sync_from(&mut self, store: &FormStore) {
        let snapshot = store.snapshot().await;
        self.sync(&snapshot);
    }

    /// The form state selected at `store_path` (null when absent).
    pub fn form_state(&self) -> &Value {
        &self.form_state
    }

    pub fn errors(&self) -> &Map<String, Value> {
        &self.errors
    }

    pub fn is_disabled(&self) -> bool {
        self.is_disabled
    }

    /// True when validation produced no entries.
    pub fn is_validated(&self) -> bool {
        self.errors.is_empty()
    }

    /// Compute the props for the field at `field_path` (relative to the form).
    pub fn field_props(&self, field_path: &str, options: FieldOptions) -> FormResult<FieldProps> {
        if field_path.is_empty() {
            return Err(FormError::InvalidFieldPath);
        }

        let parent_value = get_at_path(&self.form_state, &parse_path(field_path));
        let (path, value) = match &options.key {
            None => (field_path.to_owned(), parent_value),
            Some(key) => {
                let child = key(parent_value.unwrap_or(&Value::Null), &self.form_state);
                let path = format!("{field_path}{child}");
                let value = if parse_path(&child).has_negative_index()
                    && self.config.negative_index == NegativeIndexPolicy::Placeholder
                {
                    None
                } else {
                    get_at_path(&self.form_state, &parse_path(&path))
                };
                (path, value)
            }
        };

        let value = (self.transform)(&FieldInput {
            name: path.clone(),
            value: Value::String(display_value(value)),
        });

        let has_error = |key: &str| self.errors.get(key).is_some_and(is_truthy);
        let is_invalid = (options.is_required && is_none(&value))
            || has_error(&path)
            || options.name.as_deref().is_some_and(has_error);

        let name = options
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| path.clone());

        let mut props = Map::new();
        props.insert("value".into(), value.clone());
        props.insert("selected".into(), value);
        props.insert("disabled".into(), Value::Bool(self.is_disabled));
        props.insert("name".into(), Value::String(name));
        props.insert("isInvalid".into(), Value::Bool(is_invalid));

        Ok(FieldProps {
            props: exclude_props(&options.exclude, &props),
            path,
            is_invalid,
            transform: Arc::clone(&self.transform),
            on_change: Arc::clone(&self.on_change),
        })
    }

    /// Arguments passed to the submit callback for the current state.
    pub fn submit_args(&self) -> SubmitArgs {
        SubmitArgs {
            values: self.form_state.clone(),
            is_invalid: self.errors.values().any(is_truthy),
            errors: self.errors.clone(),
        }
    }

    /// Invoke `on_submit` with the current values and validation outcome.
    pub fn handle_submit(&self) {
        (self.on_submit)(self.submit_args());
    }

    /// Hand the submit arguments and `on_submit` to `f`, which decides
    /// whether and how to submit.
    pub fn handle_submit_with<F>(&self, f: F)
    where
        F: FnOnce(SubmitArgs, &dyn Fn(SubmitArgs)),
    {
        f(self.submit_args(), &*self.on_submit);
    }
}

/// Builder for [`FormBinding`].
pub struct FormBindingBuilder {
    config: BindingConfig,
    disable: DisableFn,
    transform: TransformFn,
    validate: ValidateFn,
    on_change: ChangeFn,
    on_submit: SubmitFn,
}

impl FormBindingBuilder {
    pub fn new(config: BindingConfig) -> Self {
        Self {
            config,
            disable: Arc::new(|| false),
            transform: Arc::new(|input: &FieldInput| input.value.clone()),
            validate: Arc::new(|_: &Value| Value::Object(Map::new())),
            on_change: Arc::new(|_: FieldChange, _: &FieldEvent| {}),
            on_submit: Arc::new(|_: SubmitArgs| {}),
        }
    }

    #[must_use]
    pub fn with_disable<F>(mut self, f: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.disable = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldInput) -> Value + Send + Sync + 'static,
    {
        self.transform = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.validate = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(FieldChange, &FieldEvent) + Send + Sync + 'static,
    {
        self.on_change = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_on_submit<F>(mut self, f: F) -> Self
    where
        F: Fn(SubmitArgs) + Send + Sync + 'static,
    {
        self.on_submit = Arc::new(f);
        self
    }

    /// Build the binding. Fails when `store_path` is empty.
    pub fn build(self) -> FormResult<FormBinding> {
        if self.config.store_path.is_empty() {
            return Err(FormError::MissingStorePath);
        }

        Ok(FormBinding {
            store_path: parse_path(&self.config.store_path),
            config: self.config,
            disable: self.disable,
            transform: self.transform,
            validate: self.validate,
            on_change: self.on_change,
            on_submit: self.on_submit,
            form_state: Value::Null,
            errors: Map::new(),
            is_disabled: false,
        })
    }
}
