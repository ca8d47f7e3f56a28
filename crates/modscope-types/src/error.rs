use thiserror::Error;

/// Errors produced while building a [`ModDefinition`](crate::ModDefinition).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// A required field was empty or whitespace-only.
    #[error("required field `{field}` must not be empty")]
    MissingField { field: &'static str },

    /// The version text could not be parsed.
    #[error("version of the mod is not in a valid format: {value:?}: {source}")]
    Format {
        value: String,
        #[source]
        source: VersionParseError,
    },
}

/// Diagnostic from the dotted version parser.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionParseError {
    #[error("version text is empty")]
    Empty,

    #[error("component {index} is empty")]
    EmptyComponent { index: usize },

    #[error("component {index} is not a non-negative integer: {component:?}")]
    InvalidComponent { index: usize, component: String },

    #[error("component {index} is out of range: {component}")]
    Overflow { index: usize, component: String },

    #[error("expected at most 4 components, got {count}")]
    TooManyComponents { count: usize },
}
