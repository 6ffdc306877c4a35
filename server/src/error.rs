//! Error types for the apidoc-mcp tool surface.

use crate::mcp::protocol::JsonRpcError;
use apidoc_index::IndexError;
use thiserror::Error;

/// Errors that can occur while running a tool or CLI command.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Missing {0} parameter")]
    MissingParameter(&'static str),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Specified API not found: {method} {path}")]
    ApiNotFound { path: String, method: String },

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// Errors that describe a bad request rather than a failed tool run.
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, ToolError::UnknownTool(_))
    }
}

impl From<ToolError> for JsonRpcError {
    fn from(err: ToolError) -> Self {
        match &err {
            ToolError::MissingParameter(_)
            | ToolError::UnknownTool(_)
            | ToolError::ApiNotFound { .. }
            | ToolError::Index(IndexError::GroupNotFound(_)) => {
                JsonRpcError::invalid_params(err.to_string())
            }
            _ => JsonRpcError::internal_error(err.to_string()),
        }
    }
}

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
