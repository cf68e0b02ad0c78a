//! Mock server and fixtures for testing against the DWH API
//!
//! Enabled with the `testing` feature. Wraps `wiremock` with helpers for
//! the API's task-envelope conventions so downstream tests can script a
//! submit/poll/fetch exchange in a few lines:
//!
//! ```rust,ignore
//! let server = MockWarehouseServer::start().await;
//! server.mock_submit_task("POST", "/warehouses", "/tasks/1").await;
//! server.mock_poll_in_progress("/tasks/1", 1).await;
//! server
//!     .mock_poll_created("/tasks/1", "/warehouses/wh-1")
//!     .await;
//! server
//!     .mock_resource("/warehouses/wh-1", WarehouseFixture::new("wh-1", "analytics").build())
//!     .await;
//! let client = server.client();
//! ```

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::WarehouseClient;

/// Wiremock server preconfigured for DWH API conventions
pub struct MockWarehouseServer {
    server: MockServer,
}

impl MockWarehouseServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URI of the mock server
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Client pointed at this server
    pub fn client(&self) -> WarehouseClient {
        WarehouseClient::builder()
            .base_url(self.server.uri())
            .api_token("test-token")
            .build()
            .expect("mock server URI is valid")
    }

    /// The underlying server, for mocks these helpers don't cover
    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Mock an asynchronous submit: `202 Accepted` with a task envelope
    pub async fn mock_submit_task(&self, http_method: &str, submit_path: &str, poll_uri: &str) {
        Mock::given(method(http_method))
            .and(path(submit_path))
            .respond_with(
                ResponseTemplate::new(202).set_body_json(task_envelope(poll_uri, None, None)),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock `times` in-progress poll responses (`202` + running state),
    /// after which later mounts for the same path take over
    pub async fn mock_poll_in_progress(&self, poll_uri: &str, times: u64) {
        Mock::given(method("GET"))
            .and(path(poll_uri))
            .respond_with(ResponseTemplate::new(202).set_body_json(task_envelope(
                poll_uri,
                None,
                Some("PROVISIONING"),
            )))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Mock a terminal poll response: `201 Created` with a resource URI
    pub async fn mock_poll_created(&self, poll_uri: &str, resource_uri: &str) {
        Mock::given(method("GET"))
            .and(path(poll_uri))
            .respond_with(ResponseTemplate::new(201).set_body_json(task_envelope(
                poll_uri,
                Some(resource_uri),
                Some("COMPLETED"),
            )))
            .mount(&self.server)
            .await;
    }

    /// Mock a terminal poll failure reported in the body under `202`
    pub async fn mock_poll_failed(&self, poll_uri: &str, description: &str) {
        Mock::given(method("GET"))
            .and(path(poll_uri))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "pollUri": poll_uri,
                "state": {"status": "ERROR", "description": description},
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a plain GET resource
    pub async fn mock_resource(&self, resource_path: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(resource_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}

/// Build a task envelope body
pub fn task_envelope(poll_uri: &str, resource_uri: Option<&str>, status: Option<&str>) -> Value {
    let mut envelope = json!({"pollUri": poll_uri});
    if let Some(resource_uri) = resource_uri {
        envelope["resourceUri"] = json!(resource_uri);
    }
    if let Some(status) = status {
        envelope["state"] = json!({"status": status});
    }
    envelope
}

/// Builder for warehouse response bodies
pub struct WarehouseFixture {
    body: Value,
}

impl WarehouseFixture {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            body: json!({
                "id": id,
                "name": name,
                "status": "ENABLED",
                "selfUri": format!("/warehouses/{id}"),
            }),
        }
    }

    pub fn status(mut self, status: &str) -> Self {
        self.body["status"] = json!(status);
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.body["description"] = json!(description);
        self
    }

    pub fn connection_url(mut self, connection_url: &str) -> Self {
        self.body["connectionUrl"] = json!(connection_url);
        self
    }

    pub fn build(self) -> Value {
        self.body
    }
}

/// Builder for warehouse user response bodies
pub struct UserFixture {
    body: Value,
}

impl UserFixture {
    pub fn new(warehouse_id: &str, user_id: &str, login: &str) -> Self {
        Self {
            body: json!({
                "id": user_id,
                "login": login,
                "role": "dataAdmin",
                "selfUri": format!("/warehouses/{warehouse_id}/users/{user_id}"),
            }),
        }
    }

    pub fn role(mut self, role: &str) -> Self {
        self.body["role"] = json!(role);
        self
    }

    pub fn build(self) -> Value {
        self.body
    }
}
