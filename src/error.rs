//! Error types for ParlaMint
//!
//! This module defines all error types used throughout the toolkit,
//! providing detailed error information for debugging and user feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ParlaMint operations
#[derive(Error, Debug)]
pub enum ParlaMintError {
    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File or directory not found
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// CSV reading or writing failed
    #[error("CSV error in '{path}': {message}")]
    Csv { path: PathBuf, message: String },

    /// A table lacks a column the operation depends on
    #[error("Missing column '{column}' in '{path}'")]
    MissingColumn { path: PathBuf, column: String },

    /// Malformed TEI document
    #[error("XML error in '{path}': {message}")]
    Xml { path: PathBuf, message: String },

    /// Session file without a usable date
    #[error("No session date found in '{0}'")]
    MissingSessionDate(PathBuf),

    /// Date attribute that does not parse as YYYY-MM-DD
    #[error("Invalid date '{value}' in '{path}'")]
    InvalidDate { path: PathBuf, value: String },

    /// File name without a legislature term
    #[error("No legislature term (YYYY-YYYY) in '{0}'")]
    MissingTerm(String),

    /// HTTP request failed
    #[error("HTTP error for '{url}': {message}")]
    Http { url: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Thread pool error
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),

    /// Report serialization error
    #[error("Report error: {0}")]
    ReportError(String),
}

impl ParlaMintError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a CSV error with path context
    pub fn csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Create an XML error with path context
    pub fn xml(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Xml {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a missing column error
    pub fn missing_column(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            path: path.into(),
            column: column.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Check if this error only affects a single corpus file or verb,
    /// so the run may skip it and go on
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Xml { .. }
                | Self::MissingSessionDate(_)
                | Self::InvalidDate { .. }
                | Self::Http { .. }
        )
    }
}

/// Result type alias for ParlaMint operations
pub type Result<T> = std::result::Result<T, ParlaMintError>;

impl From<serde_json::Error> for ParlaMintError {
    fn from(err: serde_json::Error) -> Self {
        ParlaMintError::ReportError(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| ParlaMintError::io(path, e))
    }
}

/// Extension trait for adding path context to csv::Result
pub trait CsvResultExt<T> {
    /// Add path context to a CSV error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> CsvResultExt<T> for csv::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| ParlaMintError::csv(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_io_error_with_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let err = result.with_path("/corpus/session.xml").unwrap_err();
        assert!(matches!(
            err,
            ParlaMintError::Io { ref path, .. } if path == Path::new("/corpus/session.xml")
        ));
        assert!(err.to_string().contains("/corpus/session.xml"));
    }

    #[test]
    fn test_error_recoverability() {
        assert!(ParlaMintError::xml("a.xml", "unexpected EOF").is_recoverable());
        assert!(ParlaMintError::http("https://conjugare.ro", "timeout").is_recoverable());
        assert!(ParlaMintError::MissingSessionDate(PathBuf::from("a.xml")).is_recoverable());
        assert!(!ParlaMintError::config("bad").is_recoverable());
        assert!(!ParlaMintError::missing_column("forms.csv", "Viitor").is_recoverable());
    }

    #[test]
    fn test_missing_column_message() {
        let err = ParlaMintError::missing_column("stats.csv", "UsageCount");
        assert_eq!(err.to_string(), "Missing column 'UsageCount' in 'stats.csv'");
    }
}
