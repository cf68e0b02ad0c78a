//! Warehouse user operations
//!
//! Granting and revoking access are asynchronous; both return a
//! [`FutureResult`]. Revocation is a delete-style operation whose future
//! resolves to `()`.

use async_trait::async_trait;
use tracing::debug;

use crate::client::WarehouseClient;
use crate::error::{ApiError, Result};
use crate::models::{
    PageRequest, TaskEnvelope, WarehouseUser, WarehouseUserCreateRequest, WarehouseUserList,
};
use crate::poll::{FutureResult, PollHandler, PollObservation, task_finished};
use crate::warehouses::warehouse_path;

pub(crate) fn users_path(warehouse_id: &str) -> String {
    format!("{}/users", warehouse_path(warehouse_id))
}

/// Operations on users of a warehouse instance
pub struct UserHandler {
    client: WarehouseClient,
}

impl UserHandler {
    pub fn new(client: WarehouseClient) -> Self {
        Self { client }
    }

    /// First page of users of a warehouse
    pub async fn list(&self, warehouse_id: &str) -> Result<WarehouseUserList> {
        self.client.get(&users_path(warehouse_id)).await
    }

    /// A specific page of users of a warehouse
    pub async fn list_page(
        &self,
        warehouse_id: &str,
        page: PageRequest,
    ) -> Result<WarehouseUserList> {
        self.client.get(&page.apply(&users_path(warehouse_id))).await
    }

    /// Grant a user access to a warehouse. Resolves to the added user.
    pub async fn add(
        &self,
        warehouse_id: &str,
        request: &WarehouseUserCreateRequest,
    ) -> Result<FutureResult<UserAddPoll>> {
        debug!(
            "adding user '{}' to warehouse {}",
            request.login, warehouse_id
        );
        let task = self
            .client
            .post_task(&users_path(warehouse_id), request)
            .await?;
        let handler = UserAddPoll {
            client: self.client.clone(),
            poll_uri: task.poll_uri,
            login: request.login.clone(),
        };
        Ok(FutureResult::new(self.client.clone(), handler))
    }

    /// Revoke a user's access. The returned future resolves to `()` once
    /// the removal completes. A missing user fails the submit with the
    /// distinct not-found error.
    pub async fn remove(&self, user: &WarehouseUser) -> Result<FutureResult<UserRemovePoll>> {
        let uri = user
            .uri()
            .ok_or_else(|| ApiError::BadRequest {
                message: "warehouse user has no self URI; fetch it before removing".to_string(),
            })?
            .to_string();
        debug!("removing warehouse user {}", uri);
        let task = self.client.delete_task(&uri).await.map_err(|e| {
            if e.is_not_found() {
                ApiError::NotFound {
                    message: format!("warehouse user {uri} not found"),
                }
            } else {
                e
            }
        })?;
        let handler = UserRemovePoll {
            poll_uri: task.poll_uri,
            user_uri: uri,
        };
        Ok(FutureResult::new(self.client.clone(), handler))
    }
}

/// Poll policy for granting warehouse access
pub struct UserAddPoll {
    client: WarehouseClient,
    poll_uri: String,
    login: String,
}

#[async_trait]
impl PollHandler for UserAddPoll {
    type Envelope = TaskEnvelope;
    type Output = WarehouseUser;

    fn poll_uri(&self) -> &str {
        &self.poll_uri
    }

    fn is_finished(&self, observation: &PollObservation) -> bool {
        task_finished(observation)
    }

    async fn on_success(&self, envelope: TaskEnvelope) -> Result<WarehouseUser> {
        if let Some(failure) = envelope.failure() {
            return Err(ApiError::TaskFailed(format!(
                "user '{}' was not added: {failure}",
                self.login
            )));
        }
        let uri = envelope.resource_uri.ok_or_else(|| {
            ApiError::TaskFailed(format!(
                "user '{}' added but the task carries no resource URI",
                self.login
            ))
        })?;
        self.client.get::<WarehouseUser>(&uri).await.map_err(|e| {
            if e.is_not_found() {
                ApiError::NotFound {
                    message: format!("added warehouse user {uri} not found"),
                }
            } else {
                ApiError::TaskFailed(format!(
                    "user '{}' added but fetching {uri} failed: {e}",
                    self.login
                ))
            }
        })
    }

    fn on_poll_error(&self, error: ApiError) -> ApiError {
        ApiError::TaskFailed(format!(
            "unable to add user '{}' to warehouse: {error}",
            self.login
        ))
    }
}

/// Poll policy for revoking warehouse access; no result to fetch
pub struct UserRemovePoll {
    poll_uri: String,
    user_uri: String,
}

#[async_trait]
impl PollHandler for UserRemovePoll {
    type Envelope = TaskEnvelope;
    type Output = ();

    fn poll_uri(&self) -> &str {
        &self.poll_uri
    }

    fn is_finished(&self, observation: &PollObservation) -> bool {
        task_finished(observation)
    }

    async fn on_success(&self, envelope: TaskEnvelope) -> Result<()> {
        match envelope.failure() {
            Some(failure) => Err(ApiError::TaskFailed(format!(
                "user {} was not removed: {failure}",
                self.user_uri
            ))),
            None => Ok(()),
        }
    }

    fn on_poll_error(&self, error: ApiError) -> ApiError {
        ApiError::TaskFailed(format!(
            "unable to remove user {} from warehouse: {error}",
            self.user_uri
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_path() {
        assert_eq!(users_path("wh-1"), "/warehouses/wh-1/users");
    }
}
