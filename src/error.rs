//! Error types for engine construction and content loading.
//!
//! Only construction and loading can fail. Once an [`Engine`](crate::Engine)
//! exists, requests never return an error: missing candidates, unreachable
//! constraints and vague text are reported as diagnostics on the build.

use thiserror::Error;

/// Format a list of ids as a readable string.
fn format_ids(ids: &[String]) -> String {
    if ids.is_empty() {
        return String::from("(none)");
    }
    ids.join(", ")
}

/// Errors that can occur while constructing an engine or loading its data.
///
/// # Examples
///
/// ```rust
/// use buildsmith::EngineError;
///
/// let err = EngineError::EmptyCatalog;
/// assert!(err.to_string().contains("catalog"));
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// The catalog contains no item definitions.
    ///
    /// This is the only fatal condition of the request pipeline; it is
    /// raised when an engine is built over an absent or empty catalog.
    #[error("Catalog is empty: no item definitions were supplied")]
    EmptyCatalog,

    /// Configuration values are inconsistent or out of range.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A data file (manifest JSON, rule RON, config TOML) failed to parse.
    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    /// A data file could not be read.
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// A rule table references an id that no table declares.
    #[error("Table `{table}` references unknown id `{id}`")]
    UnknownReference { table: String, id: String },

    /// The same id is declared more than once in a table.
    #[error("Table `{table}` declares duplicate ids: {}", format_ids(.ids))]
    DuplicateIds { table: String, ids: Vec<String> },
}

impl EngineError {
    pub(crate) fn parse(what: impl Into<String>, message: impl std::fmt::Display) -> Self {
        EngineError::Parse {
            what: what.into(),
            message: message.to_string(),
        }
    }
}
