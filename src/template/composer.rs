use crate::{
    constants::{ENTRY_FRAGMENT, SETTINGS_GLOBAL},
    error::{Error, Result},
    renderer::{FunctionTable, MiniJinjaEngine, TemplateEngine},
    settings::Settings,
    template::item::Item,
};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use std::marker::PhantomData;

/// Composes named fragments and functions into one renderable unit.
///
/// Every fragment can include every other one by name. A render starts
/// from the `"all"` fragment unless another entry is requested.
///
/// A `Template` is configured through `&mut self` ([`custom_func`]) and
/// rendered through `&self`, so once configured it can be shared between
/// threads for concurrent renders.
///
/// [`custom_func`]: Template::custom_func
///
/// # Example
///
/// ```rust
/// use tfdocs_template::{Item, Settings, Template};
/// use serde_json::json;
///
/// let template = Template::new(
///     &Settings::default(),
///     vec![
///         Item::new("all", r#"{%- include "title" -%}"#),
///         Item::new("title", r##"{{ indent(0, "#") }} {{ name(title) }}"##),
///     ],
/// )
/// .unwrap();
///
/// let out = template.render(&json!({ "title": "my_module" })).unwrap();
/// assert_eq!(out, "## my\\_module");
/// ```
#[derive(Debug)]
pub struct Template<E = MiniJinjaEngine> {
    settings: Settings,
    items: IndexMap<String, String>,
    functions: FunctionTable,
    engine: PhantomData<fn() -> E>,
}

impl Template<MiniJinjaEngine> {
    /// Creates a template on the default MiniJinja engine.
    ///
    /// # Arguments
    /// * `settings` - Settings snapshot used by the built-in functions
    /// * `items` - Fragments to compose, at least one
    ///
    /// # Returns
    /// * `Result<Self>` - `Error::Configuration` when `items` is empty
    pub fn new(settings: &Settings, items: Vec<Item>) -> Result<Self> {
        Self::with_engine(settings, items)
    }
}

impl<E: TemplateEngine + Default> Template<E> {
    /// Creates a template that renders on the engine `E`.
    pub fn with_engine(settings: &Settings, items: Vec<Item>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::Configuration);
        }

        let mut registry = IndexMap::with_capacity(items.len());
        for item in items {
            if registry.insert(item.name.clone(), item.text).is_some() {
                warn!("Fragment '{}' is defined more than once, the last one wins", item.name);
            }
        }

        Ok(Self {
            settings: settings.clone(),
            items: registry,
            functions: FunctionTable::builtin(settings)?,
            engine: PhantomData,
        })
    }

    /// Adds or overrides functions.
    ///
    /// Later calls win over earlier ones and over the built-ins.
    pub fn custom_func(&mut self, functions: FunctionTable) -> &mut Self {
        self.functions.merge(functions);
        self
    }

    /// Names of the registered fragments in registration order.
    pub fn fragment_names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Renders the `"all"` fragment against `data`.
    pub fn render<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        self.render_entry(ENTRY_FRAGMENT, data)
    }

    /// Renders the fragment named `entry` against `data`.
    ///
    /// All fragments are parsed first, so a syntax error anywhere fails the
    /// render even if the broken fragment is never included.
    pub fn render_entry<T: Serialize + ?Sized>(&self, entry: &str, data: &T) -> Result<String> {
        if !self.items.contains_key(entry) {
            debug!(
                "Entry fragment '{entry}' is not registered, known fragments: {}",
                self.fragment_names().collect::<Vec<_>>().join(", ")
            );
            return Err(Error::Resolution {
                name: entry.to_string(),
            });
        }

        let engine = self.build_engine().inspect_err(|err| debug!("{err}"))?;
        let data = serde_json::to_value(data)?;

        debug!(
            "Rendering fragment '{entry}' ({} fragments, {} functions)",
            self.items.len(),
            self.functions.len()
        );
        engine.render_named(entry, &data).inspect_err(|err| debug!("{err}"))
    }

    fn build_engine(&self) -> Result<E> {
        let mut engine = E::default();
        for (name, function) in self.functions.iter() {
            engine.add_function(name, function);
        }
        engine.add_global(SETTINGS_GLOBAL, &serde_json::to_value(&self.settings)?);
        for (name, text) in &self.items {
            engine.add_template(name, text)?;
        }
        Ok(engine)
    }
}
