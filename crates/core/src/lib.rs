//! tritonup_core - Core library for server bootstrap configuration
//!
//! This crate provides:
//! - TOML configuration with serde defaults, loaded from ~/.config/tritonup/
//! - Docker-style size string parsing ("64M", "1G")

pub mod config;
pub mod size;

pub use config::{Config, RuntimeConfig, ServerConfig, WaitConfig};
pub use size::parse_size;
