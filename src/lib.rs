//! PawPal Health Library
//!
//! Nutrient targets, activity energy and daily logging for one dog, served
//! over MCP.

pub mod advisor;
pub mod build_info;
pub mod config;
pub mod db;
pub mod energy;
pub mod mcp;
pub mod models;
pub mod tools;
