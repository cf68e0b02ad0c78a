//! Wire models for the DWH provisioning API
//!
//! Plain serde DTOs, camelCase on the wire. The interesting pieces are the
//! task types in [`task`], which carry the poll location and terminal-state
//! signals for asynchronous operations; the rest is straight data modeling.

pub mod paging;
pub mod s3;
pub mod schema;
pub mod task;
pub mod user;
pub mod warehouse;

pub use paging::{PageRequest, Paging};
pub use s3::{S3Credentials, S3CredentialsList};
pub use schema::{WarehouseSchema, WarehouseSchemaList};
pub use task::{TaskEnvelope, TaskState};
pub use user::{WarehouseUser, WarehouseUserCreateRequest, WarehouseUserList};
pub use warehouse::{Warehouse, WarehouseCreateRequest, WarehouseList};
