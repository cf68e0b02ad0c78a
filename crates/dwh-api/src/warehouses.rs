//! Warehouse instance operations
//!
//! Creation is asynchronous: [`WarehouseHandler::create`] submits the
//! request and hands back a [`FutureResult`] that polls the returned task,
//! fetches the created instance and enforces that it came up enabled.
//! Reads, updates and deletes are synchronous.

use async_trait::async_trait;
use tracing::debug;

use crate::client::WarehouseClient;
use crate::error::{ApiError, Result};
use crate::models::{
    PageRequest, TaskEnvelope, Warehouse, WarehouseCreateRequest, WarehouseList,
};
use crate::poll::{FutureResult, PollHandler, PollObservation, task_finished};

pub(crate) const WAREHOUSES_PATH: &str = "/warehouses";

pub(crate) fn warehouse_path(id: &str) -> String {
    format!("{WAREHOUSES_PATH}/{id}")
}

/// Operations on warehouse instances
pub struct WarehouseHandler {
    client: WarehouseClient,
}

impl WarehouseHandler {
    pub fn new(client: WarehouseClient) -> Self {
        Self { client }
    }

    /// Create a new warehouse. Returns a future that resolves to the
    /// created instance once provisioning completes.
    pub async fn create(
        &self,
        request: &WarehouseCreateRequest,
    ) -> Result<FutureResult<WarehouseCreatePoll>> {
        debug!("creating warehouse '{}'", request.name);
        let task = self.client.post_task(WAREHOUSES_PATH, request).await?;
        let handler = WarehouseCreatePoll {
            client: self.client.clone(),
            poll_uri: task.poll_uri,
            name: request.name.clone(),
        };
        Ok(FutureResult::new(self.client.clone(), handler))
    }

    /// Get a warehouse by id
    pub async fn get(&self, id: &str) -> Result<Warehouse> {
        self.get_by_uri(&warehouse_path(id)).await
    }

    /// Get a warehouse by its URI
    pub async fn get_by_uri(&self, uri: &str) -> Result<Warehouse> {
        self.client.get(uri).await.map_err(|e| {
            if e.is_not_found() {
                ApiError::NotFound {
                    message: format!("warehouse {uri} not found"),
                }
            } else {
                e
            }
        })
    }

    /// First page of warehouse instances
    pub async fn list(&self) -> Result<WarehouseList> {
        self.client.get(WAREHOUSES_PATH).await
    }

    /// A specific page of warehouse instances
    pub async fn list_page(&self, page: PageRequest) -> Result<WarehouseList> {
        self.client.get(&page.apply(WAREHOUSES_PATH)).await
    }

    /// Update a warehouse and return its fresh representation
    pub async fn update(&self, warehouse: &Warehouse) -> Result<Warehouse> {
        let uri = warehouse.uri().ok_or_else(|| ApiError::BadRequest {
            message: "warehouse has no self URI; fetch it before updating".to_string(),
        })?;
        self.client.put(uri, warehouse).await?;
        self.get_by_uri(uri).await
    }

    /// Delete a warehouse
    pub async fn delete(&self, warehouse: &Warehouse) -> Result<()> {
        let uri = warehouse.uri().ok_or_else(|| ApiError::BadRequest {
            message: "warehouse has no self URI; fetch it before deleting".to_string(),
        })?;
        debug!("deleting warehouse {}", uri);
        self.client.delete(uri).await
    }
}

/// Poll policy for warehouse creation
pub struct WarehouseCreatePoll {
    client: WarehouseClient,
    poll_uri: String,
    name: String,
}

#[async_trait]
impl PollHandler for WarehouseCreatePoll {
    type Envelope = TaskEnvelope;
    type Output = Warehouse;

    fn poll_uri(&self) -> &str {
        &self.poll_uri
    }

    fn is_finished(&self, observation: &PollObservation) -> bool {
        task_finished(observation)
    }

    async fn on_success(&self, envelope: TaskEnvelope) -> Result<Warehouse> {
        if let Some(failure) = envelope.failure() {
            return Err(ApiError::TaskFailed(format!(
                "warehouse '{}' was not created: {failure}",
                self.name
            )));
        }
        let uri = envelope.resource_uri.ok_or_else(|| {
            ApiError::TaskFailed(format!(
                "warehouse '{}' creation finished without a resource URI",
                self.name
            ))
        })?;
        self.client.get::<Warehouse>(&uri).await.map_err(|e| {
            if e.is_not_found() {
                ApiError::NotFound {
                    message: format!("created warehouse {uri} not found"),
                }
            } else {
                ApiError::TaskFailed(format!(
                    "warehouse '{}' created but fetching {uri} failed: {e}",
                    self.name
                ))
            }
        })
    }

    fn on_poll_error(&self, error: ApiError) -> ApiError {
        ApiError::TaskFailed(format!(
            "unable to create warehouse '{}': {error}",
            self.name
        ))
    }

    async fn on_finish(&self, result: &Warehouse) -> Result<()> {
        if result.is_enabled() {
            Ok(())
        } else {
            Err(ApiError::InvalidState(format!(
                "created warehouse {} is not enabled",
                result.uri().unwrap_or("<unknown>")
            )))
        }
    }
}
