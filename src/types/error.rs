//! Unified Error Type
//!
//! Centralized error type for the whole crate.
//!
//! Most extraction problems are *not* errors: unsupported statements,
//! unrecognized diagram lines and unparsable files degrade to missing or
//! empty output with a diagnostic. Only the failures below reach callers.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScopeError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("Scan error: {0}")]
    Scan(String),

    /// The external diagram generator could not run or exited unsuccessfully
    #[error("Diagram tool '{command}' failed: {message}")]
    DiagramTool { command: String, message: String },

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },
}

pub type Result<T> = std::result::Result<T, ScopeError>;

impl ScopeError {
    /// Create a diagram tool error
    pub fn diagram_tool(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DiagramTool {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Whether the failure came from the external diagram step.
    ///
    /// Symbol extraction never produces these, so callers can keep the
    /// symbol half of a run when this returns true.
    pub fn is_external(&self) -> bool {
        matches!(self, Self::DiagramTool { .. } | Self::Timeout { .. })
    }
}
