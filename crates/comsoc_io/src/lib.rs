//! crates/comsoc_io/src/lib.rs
//! Wire-facing I/O for the ballot engine.
//!
//! - Request/response bodies with their exact JSON field names (`wire`)
//! - RFC3339 deadline parsing/formatting (`deadline`)
//! - Scenario files driving the CLI (`scenario`)
//! - Atomic JSON report writing (`report`)
//!
//! Shared error type (`IoError`) with `From` conversions used across modules.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for comsoc_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors.
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON decode/encode errors, with line/column when serde_json reports them.
    #[error("json error at {line}:{column}: {msg}")]
    Json {
        line: usize,
        column: usize,
        msg: String,
    },

    /// Deadline is not an RFC3339 timestamp.
    #[error("invalid deadline {value:?}: {msg}")]
    Deadline { value: String, msg: String },

    /// Scenario file is well-formed JSON but semantically unusable.
    #[error("invalid scenario: {0}")]
    Scenario(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json {
            line: e.line(),
            column: e.column(),
            msg: e.to_string(),
        }
    }
}

pub mod deadline;
pub mod report;
pub mod scenario;
pub mod wire;
