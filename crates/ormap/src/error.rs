//! Facade error types.

use thiserror::Error;

/// Session factory and dispatch errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Metadata resolution failed.
    #[error("metadata error: {0}")]
    Metadata(#[from] ormap_core::Error),

    /// The unit configuration is unusable.
    #[error("invalid unit '{unit}': {message}")]
    Config {
        /// Unit name.
        unit: String,
        /// What is wrong.
        message: String,
    },

    /// No entity type matches the discriminators of an instance.
    #[error("no entity type matches discriminators [{}]", .discriminators.join(", "))]
    NoMatchingType {
        /// The instance's discriminators.
        discriminators: Vec<String>,
    },

    /// A method name has no entry in the dispatch table.
    #[error("method '{method}' is not declared on {types}")]
    UndefinedMethod {
        /// The invoked method.
        method: String,
        /// The composite type set, joined with '+'.
        types: String,
    },
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
