//! HTTP client for the DWH provisioning API
//!
//! [`WarehouseClient`] is a thin wrapper around `reqwest` that knows the
//! API conventions: bearer-token auth, JSON bodies, `{"error": ...}` error
//! envelopes, and task envelopes on asynchronous submits. It is cheap to
//! clone and is shared by the resource handlers and the poll driver.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::{ApiError, Result};
use crate::models::TaskEnvelope;
use crate::poll::PollObservation;

/// Default user agent for DWH API requests
const DWH_USER_AGENT: &str = concat!("dwh-api/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated client for the DWH provisioning API
#[derive(Clone)]
pub struct WarehouseClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl std::fmt::Debug for WarehouseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token deliberately omitted
        f.debug_struct("WarehouseClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Builder for [`WarehouseClient`]
#[derive(Debug, Default)]
pub struct WarehouseClientBuilder {
    base_url: Option<String>,
    api_token: Option<String>,
    user_agent: Option<String>,
    request_timeout: Option<Duration>,
}

impl WarehouseClientBuilder {
    /// Base URL of the API, e.g. `https://api.dwh.example.com/v2`
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Bearer token used for every request
    pub fn api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    /// Override the default `dwh-api/<version>` user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Per-request timeout (default 30s)
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the client, validating the base URL
    pub fn build(self) -> Result<WarehouseClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::BadRequest {
                message: "base_url is required".to_string(),
            })?
            .trim_end_matches('/')
            .to_string();
        Url::parse(&base_url).map_err(|e| ApiError::BadRequest {
            message: format!("invalid base_url '{base_url}': {e}"),
        })?;
        let api_token = self.api_token.ok_or_else(|| ApiError::BadRequest {
            message: "api_token is required".to_string(),
        })?;

        let http = reqwest::Client::builder()
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| DWH_USER_AGENT.to_string()),
            )
            .timeout(self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
            .build()
            .map_err(|e| ApiError::ConnectionError(e.to_string()))?;

        Ok(WarehouseClient {
            http,
            base_url,
            api_token,
        })
    }
}

impl WarehouseClient {
    /// Start building a client
    pub fn builder() -> WarehouseClientBuilder {
        WarehouseClientBuilder::default()
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a path against the base URL. Absolute URLs are used as-is;
    /// the API hands out both absolute and relative poll/resource URIs.
    fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let url = self.endpoint(path);
        debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(&self.api_token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        trace!("response status: {}", response.status());
        Ok(response)
    }

    /// Consume a response, mapping non-success statuses to [`ApiError`].
    async fn check(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::from_status(status, extract_error_message(status, &body)))
        }
    }

    fn decode<T: DeserializeOwned>(&self, path: &str, body: &[u8]) -> Result<T> {
        if body.is_empty() {
            return Err(ApiError::InvalidResponse(format!(
                "empty body from {path}"
            )));
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::InvalidResponse(format!("{path}: {e}")))
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, None).await?;
        let body = self.check(response).await?;
        self.decode(path, &body)
    }

    /// POST a JSON body, expecting a JSON resource back
    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::POST, path, Some(body)).await?;
        let body = self.check(response).await?;
        self.decode(path, &body)
    }

    /// PUT a JSON body; the API returns no usable body on updates
    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::PUT, path, Some(body)).await?;
        self.check(response).await?;
        Ok(())
    }

    /// DELETE a resource synchronously
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.send(Method::DELETE, path, None).await?;
        self.check(response).await?;
        Ok(())
    }

    /// Submit an asynchronous operation via POST. The API must answer with
    /// a task envelope; an empty body is a fatal submit error and no
    /// polling is attempted.
    pub async fn post_task<B: Serialize>(&self, path: &str, body: &B) -> Result<TaskEnvelope> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::POST, path, Some(body)).await?;
        let body = self.check(response).await?;
        self.task_envelope(path, &body)
    }

    /// Submit an asynchronous delete. Same empty-body rule as [`post_task`].
    ///
    /// [`post_task`]: WarehouseClient::post_task
    pub async fn delete_task(&self, path: &str) -> Result<TaskEnvelope> {
        let response = self.send(Method::DELETE, path, None).await?;
        let body = self.check(response).await?;
        self.task_envelope(path, &body)
    }

    fn task_envelope(&self, path: &str, body: &[u8]) -> Result<TaskEnvelope> {
        if body.is_empty() {
            return Err(ApiError::EmptyResponse(format!(
                "no task envelope returned from {path}"
            )));
        }
        self.decode(path, body)
    }

    /// Perform one poll GET, returning the raw status and body without any
    /// status mapping. The poll handler decides what the observation means.
    pub async fn get_observation(&self, path: &str) -> Result<PollObservation> {
        let response = self.send(Method::GET, path, None).await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(PollObservation { status, body })
    }
}

/// Pull a human-readable message out of an error response body.
pub(crate) fn extract_error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        let message = value
            .get("error")
            .and_then(|e| e.get("message"))
            .or_else(|| value.get("message"))
            .and_then(|m| m.as_str());
        if let Some(message) = message {
            return message.to_string();
        }
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        text.to_string()
    }
}
