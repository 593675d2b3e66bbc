use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One executable step of a workflow.
///
/// Only the fields every kind shares are typed. Kind-specific configuration is kept
/// as an opaque map so that a load/save cycle never loses a field this crate does
/// not know about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub label: String,
    pub block_type: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub continue_on_failure: bool,
    #[serde(flatten)]
    pub config: Map<String, Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Block {
    pub fn new(label: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            block_type: block_type.into(),
            continue_on_failure: false,
            config: Map::new(),
        }
    }

    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    pub fn with_continue_on_failure(mut self, continue_on_failure: bool) -> Self {
        self.continue_on_failure = continue_on_failure;
        self
    }

    pub fn config_value(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }
}
