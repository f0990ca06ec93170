//! Error types for dough-calc

use thiserror::Error;

/// Result type alias for dough-calc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by storage and configuration.
///
/// The recalculation engine and the metric calculator never fail; these
/// variants only cover the collaborators around them.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("recipe '{0}' not found")]
    RecipeNotFound(String),
}

impl Error {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
