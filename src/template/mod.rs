//! Fragment composition for documentation templates
//!
//! - `item`: named fragments of template source
//! - `composer`: merges fragments and functions and renders an entry fragment

pub mod composer;
pub mod item;

pub use composer::Template;
pub use item::Item;
