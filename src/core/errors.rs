//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

use crate::stats::StatsError;

/// Main error type for appcompare operations
#[derive(Debug, Error)]
pub enum Error {
    /// File system related errors
    #[error("File system error: {message} ({})", path.display())]
    FileSystem {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A JSON artifact could not be decoded
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The quality CSV could not be read
    #[error("Invalid CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A document decoded but does not have the expected shape
    #[error("Unexpected layout in {document}: {message}")]
    Schema { document: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Chart rendering errors
    #[error("Failed to render chart {}: {message}", path.display())]
    Chart { path: PathBuf, message: String },

    /// Statistical test errors
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a file system error with path context
    pub fn file_system(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: path.into(),
            source: None,
        }
    }

    /// Wrap an I/O failure on a specific path
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            message: source.to_string(),
            path: path.into(),
            source: Some(source),
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn schema(document: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            document: document.into(),
            message: message.into(),
        }
    }

    pub fn chart(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Chart {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
