//! Shared HTTP client for the EKOS backend.
//!
//! Provides a client with bearer auth drawn from the process-wide [`Session`],
//! generic request helpers with the read-path retry policy, and domain methods
//! for every backend endpoint (reports, attachments, reference data, stats,
//! scaffold components). The CLI and the orchestration managers use this
//! client directly; nothing above this crate builds URLs or headers.
//!
//! A 401 response anywhere is the sole signal that invalidates local identity:
//! the session is cleared (idempotently) and the error surfaces as terminal,
//! never retried.

pub mod api;
pub mod session;

use bytes::Bytes;
use ekos_core::{AppError, ClientConfig};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

pub use api::{MessageResponse, ReportListQuery};
pub use session::Session;

/// API path prefix; the backend mounts every route under it.
pub const API_PREFIX: &str = "/api";

/// HTTP client for the EKOS backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Session) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
            config,
        })
    }

    /// Create client from environment (EKOS_API_URL or API_URL) with a fresh
    /// session. Call [`ApiClient::login`] or install a token via
    /// [`Session::install_token`] before issuing authenticated requests.
    pub fn from_env() -> Result<Self, AppError> {
        Self::new(ClientConfig::from_env(), Session::new())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Map a non-success response to the error taxonomy. 401 clears the
    /// session before surfacing.
    async fn handle_response(&self, response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = error_detail(response).await;
        if status == StatusCode::UNAUTHORIZED {
            self.session.clear();
            return Err(AppError::Unauthorized(detail));
        }

        Err(match status {
            StatusCode::FORBIDDEN => AppError::Forbidden(detail),
            StatusCode::NOT_FOUND => AppError::NotFound(detail),
            s if s.is_client_error() => AppError::Rejected {
                status: s.as_u16(),
                message: detail,
            },
            s => AppError::Transient(format!("server error {}: {}", s.as_u16(), detail)),
        })
    }

    async fn send_get(&self, url: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let mut request = self.client.get(url).timeout(self.config.read_timeout);
        request = self.apply_auth(request);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Transient(format!("request failed: {}", e)))?;
        self.handle_response(response).await
    }

    /// GET with the read retry policy: failures other than 401 are retried
    /// up to the configured limit with a fixed delay, then surfaced.
    async fn get_with_retry(&self, path: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let url = self.build_url(path);
        let mut attempt: u32 = 0;
        loop {
            match self.send_get(&url, query).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_unauthorized() => return Err(err),
                Err(err) => {
                    if attempt >= self.config.retry_limit {
                        return Err(err);
                    }
                    attempt += 1;
                    tracing::warn!(error = %err, attempt, path, "read request failed, retrying");
                    tokio::time::sleep(self.config.retry_delay).await;
                }
            }
        }
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self.get_with_retry(path, query).await?;
        parse_json(response).await
    }

    /// GET raw bytes (attachment download, Excel export).
    pub async fn get_bytes(&self, path: &str) -> Result<Bytes, AppError> {
        let response = self.get_with_retry(path, &[]).await?;
        response
            .bytes()
            .await
            .map_err(|e| AppError::Transient(format!("failed to read response body: {}", e)))
    }

    /// POST JSON body and deserialize response. Mutations are never retried.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let request = self.client.post(self.build_url(path)).json(body);
        self.execute(request).await
    }

    /// POST with no body (verification-code resend and similar).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let request = self.client.post(self.build_url(path));
        self.execute(request).await
    }

    /// PUT JSON body and deserialize response.
    pub async fn put_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let request = self.client.put(self.build_url(path)).json(body);
        self.execute(request).await
    }

    /// PATCH with an empty JSON body (status toggle).
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let request = self
            .client
            .patch(self.build_url(path))
            .json(&serde_json::json!({}));
        self.execute(request).await
    }

    /// DELETE request, deserializing the confirmation body.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let request = self.client.delete(self.build_url(path));
        self.execute(request).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, AppError> {
        let request = self.client.post(self.build_url(path)).multipart(form);
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, AppError> {
        let request = self.apply_auth(request);
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Transient(format!("request failed: {}", e)))?;
        let response = self.handle_response(response).await?;
        parse_json(response).await
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    response
        .json()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to parse response as JSON: {}", e)))
}

/// Extract the backend's `{"detail": "..."}` message; fall back to the raw
/// body. The message is surfaced verbatim, never reinterpreted.
async fn error_detail(response: Response) -> String {
    match response.text().await {
        Ok(text) => serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                if text.trim().is_empty() {
                    "Unknown error".to_string()
                } else {
                    text
                }
            }),
        Err(_) => "Unknown error".to_string(),
    }
}
