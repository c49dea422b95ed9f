//! Error handling for pipes-rs
//!
//! Routing itself never fails loudly: topology refusals are reported as
//! `bool` / `Option` results on the fittings. This module covers the places
//! where a reason matters: filter rejections, configuration and
//! construction of topologies from config.

use thiserror::Error;

/// Main error type for pipes-rs operations
#[derive(Error, Debug)]
pub enum PipesError {
    /// A filter function refused a message
    #[error("Message rejected: {0}")]
    Rejected(String),

    /// Errors related to configuration loading/saving/validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// A filter function name that is not registered with the builder
    #[error("Unknown filter function: {0}")]
    UnknownFilter(String),

    /// A pipe direction string other than `input` / `output`
    #[error("Invalid pipe direction: {0}")]
    InvalidDirection(String),

    /// A pipe chain was requested without any stages
    #[error("Pipe chain needs at least one stage")]
    EmptyChain,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PipesError>,
    },
}

impl PipesError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PipesError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a filter rejection
    pub fn rejected(reason: impl Into<String>) -> Self {
        PipesError::Rejected(reason.into())
    }
}

/// Result type alias for pipes-rs operations
pub type Result<T> = std::result::Result<T, PipesError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
