//! Warehouse schema models

use serde::{Deserialize, Serialize};

/// A schema within a warehouse instance. Every instance has at least the
/// `default` schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseSchema {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_uri: Option<String>,
}

/// Schemas of a warehouse instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseSchemaList {
    #[serde(default)]
    pub items: Vec<WarehouseSchema>,
}
