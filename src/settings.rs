//! Rendering settings shared by every built-in function.

use crate::{constants::DEFAULT_INDENT_LEVEL, error::Result};
use serde::{Deserialize, Serialize};

/// Read-only configuration consulted while rendering.
///
/// Every field has a default, so a partial settings document (or none at
/// all) produces a usable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Escape underscores in identifiers (`foo_bar` -> `foo\_bar`).
    pub escape_characters: bool,
    /// Escape pipe characters inside table cells.
    pub escape_pipe: bool,
    /// Base depth used by the `indent` function.
    pub indent_level: i64,
    /// Skip sections that have nothing to show.
    pub hide_empty: bool,
    pub show_header: bool,
    pub show_footer: bool,
    pub show_inputs: bool,
    pub show_outputs: bool,
    pub show_providers: bool,
    pub show_requirements: bool,
    pub show_resources: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            escape_characters: true,
            escape_pipe: true,
            indent_level: DEFAULT_INDENT_LEVEL,
            hide_empty: false,
            show_header: true,
            show_footer: false,
            show_inputs: true,
            show_outputs: true,
            show_providers: true,
            show_requirements: true,
            show_resources: true,
        }
    }
}

impl Settings {
    /// Parses settings from a YAML document.
    ///
    /// Missing keys keep their default value. An empty document yields
    /// [`Settings::default`].
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }
}
