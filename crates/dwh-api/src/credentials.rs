//! S3 credentials operations
//!
//! Adding credentials is asynchronous (the service validates them against
//! S3 before accepting); the add future resolves to the stored record,
//! which never echoes the secret key back.

use async_trait::async_trait;
use tracing::debug;

use crate::client::WarehouseClient;
use crate::error::{ApiError, Result};
use crate::models::{S3Credentials, S3CredentialsList, TaskEnvelope};
use crate::poll::{FutureResult, PollHandler, PollObservation, task_finished};
use crate::warehouses::warehouse_path;

pub(crate) fn s3_credentials_path(warehouse_id: &str) -> String {
    format!("{}/s3Credentials", warehouse_path(warehouse_id))
}

fn s3_credentials_item_path(warehouse_id: &str, region: &str, access_key: &str) -> String {
    format!("{}/{region}/{access_key}", s3_credentials_path(warehouse_id))
}

/// Operations on S3 credentials of a warehouse instance
pub struct S3CredentialsHandler {
    client: WarehouseClient,
}

impl S3CredentialsHandler {
    pub fn new(client: WarehouseClient) -> Self {
        Self { client }
    }

    /// S3 credentials records of a warehouse
    pub async fn list(&self, warehouse_id: &str) -> Result<S3CredentialsList> {
        self.client.get(&s3_credentials_path(warehouse_id)).await
    }

    /// Get one credentials record, identified by region and access key
    pub async fn get(
        &self,
        warehouse_id: &str,
        region: &str,
        access_key: &str,
    ) -> Result<S3Credentials> {
        let uri = s3_credentials_item_path(warehouse_id, region, access_key);
        self.client.get(&uri).await.map_err(|e| {
            if e.is_not_found() {
                ApiError::NotFound {
                    message: format!("S3 credentials {uri} not found"),
                }
            } else {
                e
            }
        })
    }

    /// Attach S3 credentials to a warehouse. Resolves to the stored record.
    pub async fn add(
        &self,
        warehouse_id: &str,
        credentials: &S3Credentials,
    ) -> Result<FutureResult<S3CredentialsAddPoll>> {
        debug!(
            "adding S3 credentials for region '{}' to warehouse {}",
            credentials.region, warehouse_id
        );
        let task = self
            .client
            .post_task(&s3_credentials_path(warehouse_id), credentials)
            .await?;
        let handler = S3CredentialsAddPoll {
            client: self.client.clone(),
            poll_uri: task.poll_uri,
            region: credentials.region.clone(),
        };
        Ok(FutureResult::new(self.client.clone(), handler))
    }

    /// Remove a credentials record
    pub async fn remove(&self, credentials: &S3Credentials) -> Result<()> {
        let uri = credentials
            .self_uri
            .as_deref()
            .ok_or_else(|| ApiError::BadRequest {
                message: "S3 credentials have no self URI; fetch them before removing".to_string(),
            })?;
        debug!("removing S3 credentials {}", uri);
        self.client.delete(uri).await
    }
}

/// Poll policy for attaching S3 credentials
pub struct S3CredentialsAddPoll {
    client: WarehouseClient,
    poll_uri: String,
    region: String,
}

#[async_trait]
impl PollHandler for S3CredentialsAddPoll {
    type Envelope = TaskEnvelope;
    type Output = S3Credentials;

    fn poll_uri(&self) -> &str {
        &self.poll_uri
    }

    fn is_finished(&self, observation: &PollObservation) -> bool {
        task_finished(observation)
    }

    async fn on_success(&self, envelope: TaskEnvelope) -> Result<S3Credentials> {
        if let Some(failure) = envelope.failure() {
            return Err(ApiError::TaskFailed(format!(
                "S3 credentials for region '{}' were not added: {failure}",
                self.region
            )));
        }
        let uri = envelope.resource_uri.ok_or_else(|| {
            ApiError::TaskFailed(format!(
                "S3 credentials for region '{}' added but the task carries no resource URI",
                self.region
            ))
        })?;
        self.client.get::<S3Credentials>(&uri).await.map_err(|e| {
            if e.is_not_found() {
                ApiError::NotFound {
                    message: format!("added S3 credentials {uri} not found"),
                }
            } else {
                ApiError::TaskFailed(format!(
                    "S3 credentials added but fetching {uri} failed: {e}"
                ))
            }
        })
    }

    fn on_poll_error(&self, error: ApiError) -> ApiError {
        ApiError::TaskFailed(format!(
            "unable to add S3 credentials for region '{}': {error}",
            self.region
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s3_paths() {
        assert_eq!(
            s3_credentials_path("wh-1"),
            "/warehouses/wh-1/s3Credentials"
        );
        assert_eq!(
            s3_credentials_item_path("wh-1", "eu-west-1", "AKIA123"),
            "/warehouses/wh-1/s3Credentials/eu-west-1/AKIA123"
        );
    }
}
