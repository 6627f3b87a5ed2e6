//! Template engines and the built-in function library.
//!
//! - `functions`: typed functions and the settings-aware built-ins
//! - `interface`: the engine seam fragments are composed on
//! - `minijinja`: the default engine

pub mod functions;
pub mod interface;
pub mod minijinja;

pub use self::functions::{
    builtin_functions, generate_indentation, sanitize_name, Function, FunctionTable,
};
pub use self::interface::TemplateEngine;
pub use self::minijinja::MiniJinjaEngine;
