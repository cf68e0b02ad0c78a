//! Warehouse user models

use serde::{Deserialize, Serialize};

use super::Paging;

/// A user with access to a warehouse instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub login: String,

    /// Access role, e.g. `admin` or `dataAdmin`
    pub role: String,

    /// URI of the account profile backing this user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_uri: Option<String>,

    /// URI of this user within its warehouse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_uri: Option<String>,
}

impl WarehouseUser {
    /// Self URI, if the API provided one
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.self_uri.as_deref()
    }
}

/// Request body for granting a user access to a warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseUserCreateRequest {
    pub login: String,
    pub role: String,
}

impl WarehouseUserCreateRequest {
    pub fn new(login: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            role: role.into(),
        }
    }
}

/// One page of warehouse users
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseUserList {
    #[serde(default)]
    pub items: Vec<WarehouseUser>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}
