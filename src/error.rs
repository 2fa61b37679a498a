//! Error types for the Percolator library.
//!
//! All fallible operations return [`PercolatorError`], which distinguishes the
//! failure classes a caller has to react to differently:
//!
//! - [`PercolatorError::Parse`] - malformed query source; the store is left unchanged
//! - [`PercolatorError::UnsupportedNode`] - an unknown query node kind, only when
//!   the extractor registry is configured to be strict
//! - [`PercolatorError::Closed`] - the monitor was already closed
//! - [`PercolatorError::Evaluation`] - exact verification of one candidate failed
//! - [`PercolatorError::ResourceExhausted`] - the candidate index hit a configured limit
//!
//! # Examples
//!
//! ```
//! use percolator::error::{PercolatorError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PercolatorError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Percolator operations.
#[derive(Error, Debug)]
pub enum PercolatorError {
    /// I/O errors (reading query or document files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed query source text
    #[error("Parse error: {0}")]
    Parse(String),

    /// A query node kind with no registered term extractor
    #[error("Unsupported query node: {0}")]
    UnsupportedNode(String),

    /// Operation attempted after the monitor was closed
    #[error("Monitor closed: {0}")]
    Closed(String),

    /// Exact evaluation of a candidate query failed
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Resource exhausted
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with PercolatorError.
pub type Result<T> = std::result::Result<T, PercolatorError>;

impl PercolatorError {
    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        PercolatorError::Parse(msg.into())
    }

    /// Create a new unsupported node error.
    pub fn unsupported_node<S: Into<String>>(kind: S) -> Self {
        PercolatorError::UnsupportedNode(kind.into())
    }

    /// Create a new closed error.
    pub fn closed<S: Into<String>>(msg: S) -> Self {
        PercolatorError::Closed(msg.into())
    }

    /// Create a new evaluation error.
    pub fn evaluation<S: Into<String>>(msg: S) -> Self {
        PercolatorError::Evaluation(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        PercolatorError::Analysis(msg.into())
    }

    /// Create a new resource exhausted error.
    pub fn resource_exhausted<S: Into<String>>(msg: S) -> Self {
        PercolatorError::ResourceExhausted(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        PercolatorError::InvalidArgument(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PercolatorError::Other(msg.into())
    }

    /// Whether this error is confined to a single query or candidate.
    ///
    /// Per-query errors are reported alongside results; the remaining queries
    /// and documents of the same call are unaffected.
    pub fn is_per_query(&self) -> bool {
        matches!(
            self,
            PercolatorError::Parse(_)
                | PercolatorError::UnsupportedNode(_)
                | PercolatorError::Evaluation(_)
        )
    }
}
