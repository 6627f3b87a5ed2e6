use crate::{error::Result, renderer::functions::Function};

/// Trait for template engines that fragments are composed on.
///
/// An engine holds one namespace of named templates, so a fragment can
/// include any other fragment registered on the same instance.
pub trait TemplateEngine {
    /// Makes a function callable from every registered template.
    ///
    /// Registering a name twice replaces the earlier function.
    ///
    /// # Arguments
    /// * `name` - Name fragments call the function by
    /// * `function` - Typed function to register
    fn add_function(&mut self, name: &str, function: &Function);

    /// Exposes a read-only value to every registered template.
    ///
    /// # Arguments
    /// * `name` - Variable name visible in templates
    /// * `value` - Value bound to that name
    fn add_global(&mut self, name: &str, value: &serde_json::Value);

    /// Parses and registers a named template.
    ///
    /// # Arguments
    /// * `name` - Name to identify the template
    /// * `source` - Template content as string
    ///
    /// # Returns
    /// * `Result<()>` - `Error::Parse` if the source is not valid
    fn add_template(&mut self, name: &str, source: &str) -> Result<()>;

    /// Executes a registered template with `data` as the root context.
    ///
    /// # Arguments
    /// * `name` - Name of the template to execute
    /// * `data` - Root context for the execution
    ///
    /// # Returns
    /// * `Result<String>` - Rendered text, never partial output
    fn render_named(&self, name: &str, data: &serde_json::Value) -> Result<String>;
}
