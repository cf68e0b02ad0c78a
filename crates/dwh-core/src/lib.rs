//! Shared logic for DWH tooling
//!
//! This crate layers reusable infrastructure on top of the `dwh-api`
//! client:
//!
//! - **Configuration**: named profiles in a TOML file with environment
//!   variable expansion and `DWH_API_URL` / `DWH_API_TOKEN` overrides
//! - **Progress tracking**: a wait loop that drives an asynchronous
//!   task one poll step at a time, emitting events for UI layers
//! - **Workflows**: `*_and_wait` helpers that submit an operation and
//!   block until the task resolves
//!
//! # Example
//!
//! ```no_run
//! use dwh_core::{Config, create_client, workflows};
//! use dwh_api::models::WarehouseCreateRequest;
//! use std::time::Duration;
//!
//! # async fn example() -> dwh_core::Result<()> {
//! let config = Config::load()?;
//! let client = create_client(&config, None)?;
//!
//! let request = WarehouseCreateRequest::new("analytics");
//! let warehouse = workflows::create_warehouse_and_wait(
//!     &client,
//!     &request,
//!     Duration::from_secs(600),
//!     Duration::from_secs(5),
//!     None,
//! )
//! .await?;
//! println!("created {}", warehouse.name);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod progress;
pub mod workflows;

pub use config::{Config, ConfigError, Profile};
pub use connection::create_client;
pub use error::{CoreError, Result};
pub use progress::{
    DEFAULT_WAIT_INTERVAL, DEFAULT_WAIT_TIMEOUT, ProgressCallback, ProgressEvent, wait_for,
};
