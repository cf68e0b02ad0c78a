//! Warehouse instance models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Paging;

/// A provisioned warehouse instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `ENABLED` once the instance is usable, `DISABLED` otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// JDBC-style endpoint for connecting to the instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// URI of this instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_uri: Option<String>,
}

impl Warehouse {
    /// True when the instance status is `ENABLED` (case-insensitive).
    /// A missing status reads as not enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("ENABLED"))
    }

    /// Self URI, if the API provided one
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.self_uri.as_deref()
    }
}

/// Request body for creating a warehouse
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseCreateRequest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sizing tier, e.g. `small`; the server default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

impl WarehouseCreateRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One page of warehouse instances
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseList {
    #[serde(default)]
    pub items: Vec<Warehouse>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_enabled() {
        let mut warehouse: Warehouse =
            serde_json::from_str(r#"{"name": "analytics", "status": "ENABLED"}"#).unwrap();
        assert!(warehouse.is_enabled());

        warehouse.status = Some("DISABLED".to_string());
        assert!(!warehouse.is_enabled());

        warehouse.status = Some("enabled".to_string());
        assert!(warehouse.is_enabled());

        warehouse.status = None;
        assert!(!warehouse.is_enabled());
    }

    #[test]
    fn test_create_request_serializes_without_empty_fields() {
        let request = WarehouseCreateRequest::new("analytics");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"name": "analytics"}));
    }

    #[test]
    fn test_list_tolerates_missing_items() {
        let list: WarehouseList = serde_json::from_str("{}").unwrap();
        assert!(list.items.is_empty());
        assert!(list.paging.is_none());
    }
}
