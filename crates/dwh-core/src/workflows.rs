//! Multi-step workflows that submit a task and wait for it to resolve
//!
//! Each `*_and_wait` function combines the submit call with
//! [`wait_for`](crate::progress::wait_for), so callers get the final
//! resource (or a classified error) in one await.

use std::time::Duration;

use dwh_api::models::{
    S3Credentials, Warehouse, WarehouseCreateRequest, WarehouseUser, WarehouseUserCreateRequest,
};
use dwh_api::{S3CredentialsHandler, UserHandler, WarehouseClient, WarehouseHandler};
use tracing::info;

use crate::error::Result;
use crate::progress::{ProgressCallback, wait_for};

/// Create a warehouse and wait for provisioning to finish.
///
/// Resolves to the fully provisioned [`Warehouse`] resource.
pub async fn create_warehouse_and_wait(
    client: &WarehouseClient,
    request: &WarehouseCreateRequest,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<Warehouse> {
    info!("creating warehouse '{}'", request.name);
    let handler = WarehouseHandler::new(client.clone());
    let future = handler.create(request).await?.with_interval(interval);
    let warehouse = wait_for(&future, timeout, interval, on_progress).await?;
    info!("warehouse '{}' is ready", request.name);
    Ok(warehouse)
}

/// Grant a user access to a warehouse and wait for the grant to apply.
pub async fn add_user_and_wait(
    client: &WarehouseClient,
    warehouse_id: &str,
    request: &WarehouseUserCreateRequest,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<WarehouseUser> {
    info!(
        "adding user '{}' to warehouse {}",
        request.login, warehouse_id
    );
    let handler = UserHandler::new(client.clone());
    let future = handler.add(warehouse_id, request).await?.with_interval(interval);
    let user = wait_for(&future, timeout, interval, on_progress).await?;
    info!("user '{}' added to warehouse {}", request.login, warehouse_id);
    Ok(user)
}

/// Revoke a user's access and wait for the removal to complete.
pub async fn remove_user_and_wait(
    client: &WarehouseClient,
    user: &WarehouseUser,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<()> {
    info!("removing user '{}'", user.login);
    let handler = UserHandler::new(client.clone());
    let future = handler.remove(user).await?.with_interval(interval);
    wait_for(&future, timeout, interval, on_progress).await?;
    info!("user '{}' removed", user.login);
    Ok(())
}

/// Register S3 export credentials and wait for them to become active.
pub async fn add_s3_credentials_and_wait(
    client: &WarehouseClient,
    warehouse_id: &str,
    credentials: &S3Credentials,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<S3Credentials> {
    info!(
        "adding S3 credentials for region '{}' to warehouse {}",
        credentials.region, warehouse_id
    );
    let handler = S3CredentialsHandler::new(client.clone());
    let future = handler
        .add(warehouse_id, credentials)
        .await?
        .with_interval(interval);
    let stored = wait_for(&future, timeout, interval, on_progress).await?;
    info!(
        "S3 credentials for region '{}' active on warehouse {}",
        credentials.region, warehouse_id
    );
    Ok(stored)
}
