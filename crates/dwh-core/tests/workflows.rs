//! Workflow tests driving submit/poll/fetch exchanges against a mock server

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dwh_api::models::{S3Credentials, WarehouseCreateRequest, WarehouseUser, WarehouseUserCreateRequest};
use dwh_api::testing::{MockWarehouseServer, UserFixture, WarehouseFixture, task_envelope};
use dwh_core::{CoreError, ProgressCallback, ProgressEvent, workflows};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_millis(500);
const INTERVAL: Duration = Duration::from_millis(10);

fn collecting_callback() -> (Arc<Mutex<Vec<ProgressEvent>>>, ProgressCallback) {
    let events: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let callback: ProgressCallback = Box::new(move |event| {
        sink.lock().unwrap().push(event);
    });
    (events, callback)
}

#[tokio::test]
async fn create_warehouse_and_wait_reports_progress() {
    let server = MockWarehouseServer::start().await;
    server
        .mock_submit_task("POST", "/warehouses", "/tasks/1")
        .await;
    server.mock_poll_in_progress("/tasks/1", 2).await;
    server.mock_poll_created("/tasks/1", "/warehouses/wh-1").await;
    server
        .mock_resource(
            "/warehouses/wh-1",
            WarehouseFixture::new("wh-1", "analytics").build(),
        )
        .await;

    let (events, callback) = collecting_callback();
    let warehouse = workflows::create_warehouse_and_wait(
        &server.client(),
        &WarehouseCreateRequest::new("analytics"),
        TIMEOUT,
        INTERVAL,
        Some(callback),
    )
    .await
    .unwrap();

    assert_eq!(warehouse.name, "analytics");
    assert!(warehouse.is_enabled());

    let events = events.lock().unwrap();
    assert!(matches!(events.first(), Some(ProgressEvent::Started { .. })));
    let polling = events
        .iter()
        .filter(|e| matches!(e, ProgressEvent::Polling { .. }))
        .count();
    assert_eq!(polling, 2);
    assert!(matches!(events.last(), Some(ProgressEvent::Completed { .. })));
}

#[tokio::test]
async fn create_warehouse_failure_emits_failed_event() {
    let server = MockWarehouseServer::start().await;
    server
        .mock_submit_task("POST", "/warehouses", "/tasks/2")
        .await;
    server
        .mock_poll_failed("/tasks/2", "insufficient capacity")
        .await;

    let (events, callback) = collecting_callback();
    let err = workflows::create_warehouse_and_wait(
        &server.client(),
        &WarehouseCreateRequest::new("analytics"),
        TIMEOUT,
        INTERVAL,
        Some(callback),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("insufficient capacity"));
    let events = events.lock().unwrap();
    match events.last() {
        Some(ProgressEvent::Failed { error, .. }) => {
            assert!(error.contains("insufficient capacity"));
        }
        other => panic!("expected a Failed event, got {other:?}"),
    }
}

#[tokio::test]
async fn wait_timeout_leaves_task_pending_for_a_later_wait() {
    let server = MockWarehouseServer::start().await;
    server
        .mock_submit_task("POST", "/warehouses", "/tasks/3")
        .await;

    let in_progress = Mock::given(method("GET"))
        .and(path("/tasks/3"))
        .respond_with(
            ResponseTemplate::new(202)
                .set_body_json(task_envelope("/tasks/3", None, Some("PROVISIONING"))),
        )
        .mount_as_scoped(server.server())
        .await;

    let handler = dwh_api::WarehouseHandler::new(server.client());
    let future = handler
        .create(&WarehouseCreateRequest::new("analytics"))
        .await
        .unwrap();

    let err = dwh_core::wait_for(&future, Duration::from_millis(40), INTERVAL, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::TaskTimeout(_)));
    assert!(err.is_timeout());

    // The task is still pending; once the backend finishes, a second
    // wait on the same future succeeds.
    drop(in_progress);
    server.mock_poll_created("/tasks/3", "/warehouses/wh-3").await;
    server
        .mock_resource(
            "/warehouses/wh-3",
            WarehouseFixture::new("wh-3", "analytics").build(),
        )
        .await;

    let warehouse = dwh_core::wait_for(&future, TIMEOUT, INTERVAL, None)
        .await
        .unwrap();
    assert_eq!(warehouse.id.as_deref(), Some("wh-3"));
}

#[tokio::test]
async fn add_user_and_wait_resolves_to_the_granted_user() {
    let server = MockWarehouseServer::start().await;
    server
        .mock_submit_task("POST", "/warehouses/wh-1/users", "/tasks/4")
        .await;
    server
        .mock_poll_created("/tasks/4", "/warehouses/wh-1/users/u-1")
        .await;
    server
        .mock_resource(
            "/warehouses/wh-1/users/u-1",
            UserFixture::new("wh-1", "u-1", "ada@example.com").build(),
        )
        .await;

    let user = workflows::add_user_and_wait(
        &server.client(),
        "wh-1",
        &WarehouseUserCreateRequest::new("ada@example.com", "dataAdmin"),
        TIMEOUT,
        INTERVAL,
        None,
    )
    .await
    .unwrap();

    assert_eq!(user.login, "ada@example.com");
    assert_eq!(user.uri(), Some("/warehouses/wh-1/users/u-1"));
}

#[tokio::test]
async fn remove_user_and_wait_resolves_once_removal_completes() {
    let server = MockWarehouseServer::start().await;
    server
        .mock_submit_task("DELETE", "/warehouses/wh-1/users/u-1", "/tasks/5")
        .await;
    server.mock_poll_in_progress("/tasks/5", 1).await;
    server.mock_poll_created("/tasks/5", "/warehouses/wh-1/users/u-1").await;

    let user: WarehouseUser =
        serde_json::from_value(UserFixture::new("wh-1", "u-1", "ada@example.com").build()).unwrap();

    workflows::remove_user_and_wait(&server.client(), &user, TIMEOUT, INTERVAL, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn add_s3_credentials_and_wait_resolves_without_the_secret() {
    let server = MockWarehouseServer::start().await;
    server
        .mock_submit_task("POST", "/warehouses/wh-1/s3Credentials", "/tasks/6")
        .await;
    server
        .mock_poll_created("/tasks/6", "/warehouses/wh-1/s3Credentials/eu-west-1/AKIA123")
        .await;
    server
        .mock_resource(
            "/warehouses/wh-1/s3Credentials/eu-west-1/AKIA123",
            json!({
                "region": "eu-west-1",
                "accessKey": "AKIA123",
                "selfUri": "/warehouses/wh-1/s3Credentials/eu-west-1/AKIA123",
            }),
        )
        .await;

    let stored = workflows::add_s3_credentials_and_wait(
        &server.client(),
        "wh-1",
        &S3Credentials::new("eu-west-1", "AKIA123", "secret"),
        TIMEOUT,
        INTERVAL,
        None,
    )
    .await
    .unwrap();

    assert_eq!(stored.region, "eu-west-1");
    assert!(stored.secret_key.is_none());
}
