//! Binding configuration.

use serde::{Deserialize, Serialize};

/// How a field reacts when its computed child path holds a negative index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeIndexPolicy {
    /// The field has no concrete element yet and shows an empty value.
    #[default]
    Placeholder,
    /// Resolve the index from the end of the array.
    FromEnd,
}

/// Static settings of a [`FormBinding`](crate::FormBinding).
///
/// # Example
///
/// ```
/// use formbind::{BindingConfig, NegativeIndexPolicy};
///
/// let config: BindingConfig =
///     serde_json::from_str(r#"{"store_path": "forms.signup", "negative_index": "from_end"}"#).unwrap();
/// assert_eq!(config.negative_index, NegativeIndexPolicy::FromEnd);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Dotted/bracketed path of the form inside the store.
    pub store_path: String,
    #[serde(default)]
    pub negative_index: NegativeIndexPolicy,
}

impl BindingConfig {
    pub fn new(store_path: impl Into<String>) -> Self {
        Self {
            store_path: store_path.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_negative_index(mut self, policy: NegativeIndexPolicy) -> Self {
        self.negative_index = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: BindingConfig = serde_json::from_str(r#"{"store_path": "f"}"#).unwrap();
        assert_eq!(config, BindingConfig::new("f"));
        assert_eq!(config.negative_index, NegativeIndexPolicy::Placeholder);
    }

    #[test]
    fn test_builder() {
        let config = BindingConfig::new("f").with_negative_index(NegativeIndexPolicy::FromEnd);
        assert_eq!(config.negative_index, NegativeIndexPolicy::FromEnd);
    }
}
