//! Actions understood by the form reducer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A state transition request for the form store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormAction {
    /// Shallow-merge `payload` into the top level of the state.
    SetInitialValues { payload: Value },
    /// Write `value` at field `name` inside the form stored at `key`.
    UpdateField {
        key: String,
        name: String,
        value: Value,
    },
}

impl FormAction {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FormAction::SetInitialValues { .. } => "SET_INITIAL_VALUES",
            FormAction::UpdateField { .. } => "UPDATE_FIELD",
        }
    }
}

/// A field edit: the field path (relative to the form) and its new value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub name: String,
    pub value: Value,
}

/// Create a [`FormAction::SetInitialValues`] action.
pub fn set_initial_values(values: Value) -> FormAction {
    FormAction::SetInitialValues { payload: values }
}

/// Create a [`FormAction::UpdateField`] action for the form at `parent_state`.
pub fn update_field(parent_state: impl Into<String>, change: FieldChange) -> FormAction {
    FormAction::UpdateField {
        key: parent_state.into(),
        name: change.name,
        value: change.value,
    }
}
