//! Warehouse schema operations. All synchronous reads.

use crate::client::WarehouseClient;
use crate::error::{ApiError, Result};
use crate::models::{WarehouseSchema, WarehouseSchemaList};
use crate::warehouses::warehouse_path;

/// Name of the schema every instance is provisioned with
pub const DEFAULT_SCHEMA_NAME: &str = "default";

pub(crate) fn schemas_path(warehouse_id: &str) -> String {
    format!("{}/schemas", warehouse_path(warehouse_id))
}

fn schema_path(warehouse_id: &str, name: &str) -> String {
    format!("{}/{name}", schemas_path(warehouse_id))
}

/// Operations on schemas of a warehouse instance
pub struct SchemaHandler {
    client: WarehouseClient,
}

impl SchemaHandler {
    pub fn new(client: WarehouseClient) -> Self {
        Self { client }
    }

    /// Schemas of a warehouse
    pub async fn list(&self, warehouse_id: &str) -> Result<WarehouseSchemaList> {
        self.client.get(&schemas_path(warehouse_id)).await
    }

    /// Get a schema by name
    pub async fn get_by_name(&self, warehouse_id: &str, name: &str) -> Result<WarehouseSchema> {
        self.get_by_uri(&schema_path(warehouse_id, name)).await
    }

    /// Get a schema by its URI
    pub async fn get_by_uri(&self, uri: &str) -> Result<WarehouseSchema> {
        self.client.get(uri).await.map_err(|e| {
            if e.is_not_found() {
                ApiError::NotFound {
                    message: format!("warehouse schema {uri} not found"),
                }
            } else {
                e
            }
        })
    }

    /// The `default` schema of a warehouse
    pub async fn default(&self, warehouse_id: &str) -> Result<WarehouseSchema> {
        self.get_by_name(warehouse_id, DEFAULT_SCHEMA_NAME).await
    }
}
