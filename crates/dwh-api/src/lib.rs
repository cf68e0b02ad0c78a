//! # dwh-api
//!
//! Rust client for the DWH warehouse provisioning REST API.
//!
//! Mutating operations on the API are asynchronous: a submit returns a
//! task envelope with a poll URI, and the outcome is observed by polling
//! that URI until it reports a terminal signal. This crate wraps the whole
//! exchange behind a future-like handle:
//!
//! ```rust,ignore
//! use dwh_api::{WarehouseClient, WarehouseHandler};
//! use dwh_api::models::WarehouseCreateRequest;
//!
//! let client = WarehouseClient::builder()
//!     .base_url("https://api.dwh.example.com/v2")
//!     .api_token(token)
//!     .build()?;
//!
//! let warehouses = WarehouseHandler::new(client);
//! let pending = warehouses
//!     .create(&WarehouseCreateRequest::new("analytics"))
//!     .await?;
//! let warehouse = pending.get().await?;
//! ```
//!
//! ## Layout
//!
//! - [`client`] - HTTP client and builder
//! - [`error`] - error taxonomy with phase-distinguishing variants
//! - [`poll`] - the generic [`PollHandler`]/[`FutureResult`] machinery
//! - [`models`] - wire DTOs
//! - [`warehouses`], [`users`], [`schemas`], [`credentials`] - resource
//!   handlers
//! - [`testing`] - mock server and fixtures (feature `testing`)

pub mod client;
pub mod credentials;
pub mod error;
pub mod models;
pub mod poll;
pub mod schemas;
pub mod users;
pub mod warehouses;

#[cfg(feature = "testing")]
pub mod testing;

pub use client::{WarehouseClient, WarehouseClientBuilder};
pub use credentials::S3CredentialsHandler;
pub use error::{ApiError, Result};
pub use poll::{FutureResult, PollHandler, PollObservation, PollStatus};
pub use schemas::{DEFAULT_SCHEMA_NAME, SchemaHandler};
pub use users::UserHandler;
pub use warehouses::WarehouseHandler;
