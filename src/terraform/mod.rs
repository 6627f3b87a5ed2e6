//! Module metadata rendered by documentation templates
//!
//! The extraction step that fills these types lives outside this crate.

pub mod module;
pub mod resource;

pub use module::{Input, Module, Output, Provider, Requirement};
pub use resource::Resource;
