//! Reference data used to populate admin select boxes.

use serde::{Deserialize, Serialize};

/// One `<option>` of an admin select box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Submitted value (zone id, hub id, tier key)
    pub value: String,
    /// Visible text
    pub label: String,
}

impl SelectOption {
    /// Build an option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}
