//! Tool implementations
//!
//! Operations shared by the HTTP routes and the MCP server.

pub mod meals;
pub mod nutrition;
pub mod status;
