//! Error types for the diff library.

use thiserror::Error;

/// Exit status reported for every error condition.
pub const EXIT_ERROR: u8 = 2;

/// Main error type for diff operations.
#[derive(Error, Debug)]
pub enum DiffError {
    /// Configuration error (bad DSN, invalid connection file, bad options)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database could not be opened or reached
    #[error("Connection error: {message}\n  Context: {context}")]
    Connection { message: String, context: String },

    /// A SELECT could not be prepared or executed
    #[error("Query failed: {query}\n  Cause: {message}")]
    Query { query: String, message: String },

    /// A row could not be decoded mid-stream
    #[error("Scan failed on {side} row {row}: {message}")]
    Scan {
        side: String,
        row: usize,
        message: String,
    },

    /// The normalizer met a scan type it was never taught to compare
    #[error("Unsupported scan type: {0}")]
    UnsupportedType(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Comparison was interrupted (SIGINT, etc.)
    #[error("Comparison cancelled")]
    Cancelled,
}

impl DiffError {
    /// Create a Connection error with context about where it occurred
    pub fn connection(message: impl ToString, context: impl Into<String>) -> Self {
        DiffError::Connection {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Create a Query error for the given SQL text
    pub fn query(query: impl Into<String>, message: impl ToString) -> Self {
        DiffError::Query {
            query: query.into(),
            message: message.to_string(),
        }
    }

    /// Create a Scan error for a row of one side
    pub fn scan(side: impl Into<String>, row: usize, message: impl ToString) -> Self {
        DiffError::Scan {
            side: side.into(),
            row,
            message: message.to_string(),
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        EXIT_ERROR
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for diff operations.
pub type Result<T> = std::result::Result<T, DiffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_maps_to_exit_2() {
        let errors = [
            DiffError::Config("bad".into()),
            DiffError::connection("refused", "connecting"),
            DiffError::query("SELECT * FROM t ORDER BY id", "no such table"),
            DiffError::scan("left", 3, "truncated"),
            DiffError::UnsupportedType("GEOMETRY".into()),
            DiffError::Cancelled,
        ];
        for err in &errors {
            assert_eq!(err.exit_code(), 2, "{err}");
        }
    }

    #[test]
    fn test_query_error_names_the_sql() {
        let err = DiffError::query("SELECT * FROM hoges ORDER BY id", "table missing");
        let text = err.to_string();
        assert!(text.contains("SELECT * FROM hoges ORDER BY id"));
        assert!(text.contains("table missing"));
    }

    #[test]
    fn test_format_detailed_includes_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "dbinfo.json");
        let err = DiffError::from(io);
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: IO error: dbinfo.json"));
    }
}
