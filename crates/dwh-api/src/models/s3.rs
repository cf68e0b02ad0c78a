//! S3 credentials attached to a warehouse instance

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// S3 credentials for loading data into a warehouse. The secret key is
/// write-only: it is sent when creating or updating credentials and never
/// returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Credentials {
    pub region: String,

    pub access_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_uri: Option<String>,
}

impl S3Credentials {
    pub fn new(
        region: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            access_key: access_key.into(),
            secret_key: Some(secret_key.into()),
            updated_at: None,
            self_uri: None,
        }
    }
}

/// S3 credentials of a warehouse instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3CredentialsList {
    #[serde(default)]
    pub items: Vec<S3Credentials>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_without_secret_key_deserializes() {
        let body = r#"{
            "region": "eu-west-1",
            "accessKey": "AKIA123",
            "selfUri": "/warehouses/1/s3Credentials/eu-west-1/AKIA123"
        }"#;
        let credentials: S3Credentials = serde_json::from_str(body).unwrap();
        assert!(credentials.secret_key.is_none());
        assert_eq!(credentials.access_key, "AKIA123");
    }
}
