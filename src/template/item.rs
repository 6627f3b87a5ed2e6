use serde::{Deserialize, Serialize};

/// A named fragment of template source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Name other fragments include this one by
    pub name: String,
    /// Template source
    pub text: String,
}

impl Item {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}
