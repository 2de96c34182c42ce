//! Resource limits for script execution.

use serde::{Deserialize, Serialize};

/// Limits applied to every script run. All nodes must agree on these values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmConfig {
    /// Combined size of unlock and lock script.
    #[serde(default = "default_max_script_bytes")]
    pub max_script_bytes: usize,

    /// Maximum number of items on the stack at any point.
    #[serde(default = "default_max_stack_items")]
    pub max_stack_items: usize,

    /// Maximum size of any single stack item, including output parameters.
    #[serde(default = "default_max_item_bytes")]
    pub max_item_bytes: usize,
}

fn default_max_script_bytes() -> usize {
    1024
}

fn default_max_stack_items() -> usize {
    1024
}

fn default_max_item_bytes() -> usize {
    1024
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_script_bytes: default_max_script_bytes(),
            max_stack_items: default_max_stack_items(),
            max_item_bytes: default_max_item_bytes(),
        }
    }
}
