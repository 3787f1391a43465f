//! MCP server
//!
//! Exposes the calorie counter tools over the Model Context Protocol.

mod server;

pub use server::CalorieService;
