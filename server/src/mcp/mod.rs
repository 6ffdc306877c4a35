//! MCP (Model Context Protocol) Server Module
//!
//! Exposes the API index as four tools to AI clients.
//!
//! ## Usage
//!
//! ```bash
//! apidoc-mcp https://api.example.com/swagger.json serve
//! apidoc-mcp ./swagger.json serve --reload once
//! ```
//!
//! The MCP server communicates via stdio using JSON-RPC 2.0.

pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use protocol::*;
pub use server::McpServer;
