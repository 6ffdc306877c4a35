//! apidoc-mcp
//!
//! Command-line and MCP (Model Context Protocol) front ends for
//! [`apidoc_index`]: list tag groups, list a group's operations, fetch one
//! operation's detail, and keyword-search operations.

pub mod cli;
pub mod error;
pub mod mcp;
pub mod operations;

pub use error::{ToolError, ToolResult};
pub use operations::ApiOperation;
