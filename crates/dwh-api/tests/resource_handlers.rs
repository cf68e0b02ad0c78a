//! Tests for the synchronous resource operations and the user/S3
//! asynchronous flows.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dwh_api::models::{
    PageRequest, S3Credentials, Warehouse, WarehouseUser, WarehouseUserCreateRequest,
};
use dwh_api::{
    ApiError, S3CredentialsHandler, SchemaHandler, UserHandler, WarehouseClient, WarehouseHandler,
};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn client_for(server: &MockServer) -> WarehouseClient {
    WarehouseClient::builder()
        .base_url(server.uri())
        .api_token("test-token")
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Warehouses, synchronous
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_missing_warehouse_is_a_named_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/warehouses/wh-404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let handler = WarehouseHandler::new(client_for(&server));
    let err = handler.get("wh-404").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("/warehouses/wh-404"));
}

#[tokio::test]
async fn list_returns_empty_page_when_no_instances() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/warehouses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let handler = WarehouseHandler::new(client_for(&server));
    let list = handler.list().await.unwrap();
    assert!(list.items.is_empty());
}

#[tokio::test]
async fn list_page_sends_offset_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/warehouses"))
        .and(query_param("offset", "100"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"name": "analytics"}],
            "paging": {"next": "/warehouses?offset=150&limit=50"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handler = WarehouseHandler::new(client_for(&server));
    let list = handler.list_page(PageRequest::new(100, 50)).await.unwrap();
    assert_eq!(list.items.len(), 1);
    assert!(list.paging.unwrap().next.is_some());
}

#[tokio::test]
async fn update_puts_then_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/warehouses/wh-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/warehouses/wh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "wh-1",
            "name": "analytics-renamed",
            "status": "ENABLED",
            "selfUri": "/warehouses/wh-1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let warehouse: Warehouse = serde_json::from_value(json!({
        "id": "wh-1",
        "name": "analytics-renamed",
        "selfUri": "/warehouses/wh-1",
    }))
    .unwrap();

    let handler = WarehouseHandler::new(client_for(&server));
    let updated = handler.update(&warehouse).await.unwrap();
    assert_eq!(updated.name, "analytics-renamed");
}

#[tokio::test]
async fn update_without_self_uri_is_rejected() {
    let server = MockServer::start().await;
    let warehouse: Warehouse =
        serde_json::from_value(json!({"name": "detached"})).unwrap();

    let handler = WarehouseHandler::new(client_for(&server));
    let err = handler.update(&warehouse).await.unwrap_err();
    assert!(err.is_bad_request());
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_user_polls_then_fetches_user() {
    let server = MockServer::start().await;
    let request = WarehouseUserCreateRequest::new("ada@example.com", "dataAdmin");

    Mock::given(method("POST"))
        .and(path("/warehouses/wh-1/users"))
        .and(body_json(json!({"login": "ada@example.com", "role": "dataAdmin"})))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({"pollUri": "/poll/u1"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/poll/u1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "pollUri": "/poll/u1",
            "resourceUri": "/warehouses/wh-1/users/u-9",
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/warehouses/wh-1/users/u-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-9",
            "login": "ada@example.com",
            "role": "dataAdmin",
            "selfUri": "/warehouses/wh-1/users/u-9",
        })))
        .mount(&server)
        .await;

    let handler = UserHandler::new(client_for(&server));
    let pending = handler.add("wh-1", &request).await.unwrap().with_interval(POLL_INTERVAL);
    let user = pending.get().await.unwrap();
    assert_eq!(user.login, "ada@example.com");
    assert_eq!(user.uri(), Some("/warehouses/wh-1/users/u-9"));
}

#[tokio::test]
async fn remove_user_resolves_to_unit() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/warehouses/wh-1/users/u-9"))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({"pollUri": "/poll/u2"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/poll/u2"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"pollUri": "/poll/u2"})))
        .mount(&server)
        .await;

    let user: WarehouseUser = serde_json::from_value(json!({
        "login": "ada@example.com",
        "role": "dataAdmin",
        "selfUri": "/warehouses/wh-1/users/u-9",
    }))
    .unwrap();

    let handler = UserHandler::new(client_for(&server));
    let pending = handler.remove(&user).await.unwrap().with_interval(POLL_INTERVAL);
    pending.get().await.unwrap();
}

#[tokio::test]
async fn remove_missing_user_fails_submit_with_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/warehouses/wh-1/users/u-9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let user: WarehouseUser = serde_json::from_value(json!({
        "login": "ada@example.com",
        "role": "dataAdmin",
        "selfUri": "/warehouses/wh-1/users/u-9",
    }))
    .unwrap();

    let handler = UserHandler::new(client_for(&server));
    let err = handler.remove(&user).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("/warehouses/wh-1/users/u-9"));
}

// ---------------------------------------------------------------------------
// Schemas
// ---------------------------------------------------------------------------

#[tokio::test]
async fn default_schema_is_fetched_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/warehouses/wh-1/schemas/default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "default",
            "selfUri": "/warehouses/wh-1/schemas/default",
        })))
        .mount(&server)
        .await;

    let handler = SchemaHandler::new(client_for(&server));
    let schema = handler.default("wh-1").await.unwrap();
    assert_eq!(schema.name, "default");
}

#[tokio::test]
async fn missing_schema_is_a_named_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/warehouses/wh-1/schemas/reporting"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let handler = SchemaHandler::new(client_for(&server));
    let err = handler.get_by_name("wh-1", "reporting").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("schemas/reporting"));
}

// ---------------------------------------------------------------------------
// S3 credentials
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_s3_credentials_polls_then_fetches_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/warehouses/wh-1/s3Credentials"))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({"pollUri": "/poll/s1"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/poll/s1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "pollUri": "/poll/s1",
            "resourceUri": "/warehouses/wh-1/s3Credentials/eu-west-1/AKIA123",
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/warehouses/wh-1/s3Credentials/eu-west-1/AKIA123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "region": "eu-west-1",
            "accessKey": "AKIA123",
            "selfUri": "/warehouses/wh-1/s3Credentials/eu-west-1/AKIA123",
        })))
        .mount(&server)
        .await;

    let handler = S3CredentialsHandler::new(client_for(&server));
    let credentials = S3Credentials::new("eu-west-1", "AKIA123", "secret");
    let pending = handler
        .add("wh-1", &credentials)
        .await
        .unwrap()
        .with_interval(POLL_INTERVAL);

    let stored = pending.get().await.unwrap();
    assert_eq!(stored.region, "eu-west-1");
    // The API never returns the secret
    assert!(stored.secret_key.is_none());
}

#[tokio::test]
async fn add_s3_credentials_empty_submit_body_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/warehouses/wh-1/s3Credentials"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let handler = S3CredentialsHandler::new(client_for(&server));
    let credentials = S3Credentials::new("eu-west-1", "AKIA123", "secret");
    let err = handler.add("wh-1", &credentials).await.unwrap_err();
    assert!(matches!(err, ApiError::EmptyResponse(_)));
}
