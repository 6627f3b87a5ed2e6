use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A template was built without any fragment to render.
    #[error("Cannot build template: at least one fragment is required.")]
    Configuration,

    /// Two built-in functions were registered under the same name.
    #[error("Built-in function '{0}' is registered more than once.")]
    DuplicateFunction(String),

    /// `indent` was asked for more output than it is allowed to produce.
    #[error("Indentation with extra depth {extra} exceeds the limit of {limit} bytes.")]
    IndentationTooLarge { extra: i64, limit: usize },

    /// The entry fragment is not part of the registered fragments.
    #[error("Fragment '{name}' is not defined.")]
    Resolution { name: String },

    /// A fragment source does not follow the template grammar.
    #[error("Failed to parse fragment '{name}'. Original error: {source}")]
    Parse {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// The resolved fragment failed while executing against the data.
    #[error("Failed to render. Original error: {0}")]
    Execution(#[source] minijinja::Error),

    #[error("Failed to serialize render data. Original error: {0}")]
    Data(#[from] serde_json::Error),

    #[error("Failed to parse settings. Original error: {0}")]
    Settings(#[from] serde_yaml::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
