//! Configuration and profile management for DWH tooling
//!
//! A reusable configuration system for managing API credentials:
//!
//! - Multiple named profiles for different DWH deployments
//! - Environment variable expansion in config values
//! - Platform-specific config file locations
//! - `DWH_API_URL` / `DWH_API_TOKEN` overrides at client-creation time

pub mod config;
pub mod error;

pub use config::{Config, Profile};
pub use error::{ConfigError, Result};
