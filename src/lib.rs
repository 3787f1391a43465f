//! Calorie Counter Library
//!
//! Meal logging, calorie estimation and nutrition guidance: energy and macro
//! calculators, a randomized meal-plan generator, and a tiered nutrition
//! lookup, served over HTTP and MCP.

pub mod build_info;
pub mod config;
pub mod db;
pub mod error;
pub mod estimator;
pub mod http;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod state;
pub mod tools;
