//! Constants used throughout the template layer

/// Name of the fragment a render starts from
pub const ENTRY_FRAGMENT: &str = "all";

/// Indentation depth used when the configured one is out of range
pub const DEFAULT_INDENT_LEVEL: i64 = 2;

/// Smallest accepted indentation depth
pub const MIN_INDENT_LEVEL: i64 = 1;

/// Largest accepted indentation depth
pub const MAX_INDENT_LEVEL: i64 = 5;

/// Largest indentation, in bytes, the `indent` function produces
pub const MAX_INDENT_BYTES: usize = 4096;

/// Name under which the settings are exposed to fragments
pub const SETTINGS_GLOBAL: &str = "settings";

/// Public registry that hosts provider documentation
pub const REGISTRY_HOST: &str = "registry.terraform.io";

/// Version segment used in registry links when a provider is unpinned
pub const LATEST_VERSION: &str = "latest";

/// Resource modes as reported by the extraction step
pub mod mode {
    pub const MANAGED: &str = "managed";
    pub const DATA: &str = "data";
}

/// Names of the built-in functions
pub mod functions {
    pub const DEFAULT: &str = "default";
    pub const INDENT: &str = "indent";
    pub const NAME: &str = "name";
    pub const TERNARY: &str = "ternary";
    pub const TRIM: &str = "trim";
    pub const TRIM_LEFT: &str = "trimLeft";
    pub const TRIM_RIGHT: &str = "trimRight";
    pub const TRIM_PREFIX: &str = "trimPrefix";
    pub const TRIM_SUFFIX: &str = "trimSuffix";
    pub const SANITIZE_TABLE: &str = "sanitizeTable";
}
