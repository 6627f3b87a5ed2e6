/// Constants shared across modules.
pub mod constants;

/// Defines custom error types.
pub mod error;

/// Template engines and the built-in function library.
pub mod renderer;

/// Rendering settings consumed by the built-in functions.
pub mod settings;

/// Fragment composition and rendering.
pub mod template;

/// Module metadata rendered by templates.
pub mod terraform;

pub use error::{Error, Result};
pub use renderer::{Function, FunctionTable};
pub use settings::Settings;
pub use template::{Item, Template};
