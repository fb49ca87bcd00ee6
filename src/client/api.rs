use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;

use crate::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::{NewTask, Task, TaskPatch, TaskStats};
use crate::routes::health::HealthResponse;
use crate::routes::todos::DeleteResponse;

/// Failures surfaced by the client.
#[derive(Debug)]
pub enum ClientError {
    /// The server answered with an error status; carries the decoded
    /// `{"error": …}` message.
    Api { status: StatusCode, message: String },
    /// Transport-level failure (connection refused, timeout, bad body).
    Http(reqwest::Error),
    /// Durable session storage could not be read or written.
    Storage(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientError::Api { status, message } => write!(f, "{} ({})", message, status),
            ClientError::Http(e) => write!(f, "request failed: {}", e),
            ClientError::Storage(e) => write!(f, "session storage failed: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Http(error)
    }
}

impl From<std::io::Error> for ClientError {
    fn from(error: std::io::Error) -> Self {
        ClientError::Storage(error)
    }
}

impl ClientError {
    /// True when the server refused the bearer token (missing or invalid).
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Api { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin typed wrapper over the HTTP API.
///
/// Holds the base URL and, once signed in, the bearer token attached to
/// every request.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api{}", self.base_url, endpoint)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "Something went wrong".to_string());
            return Err(ClientError::Api { status, message });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let payload = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(self.http.post(self.url("/register")).json(&payload))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(self.http.post(self.url("/login")).json(&payload))
            .await
    }

    pub async fn list_todos(&self) -> Result<Vec<Task>, ClientError> {
        self.execute(self.http.get(self.url("/todos"))).await
    }

    pub async fn create_todo(&self, input: &NewTask) -> Result<Task, ClientError> {
        self.execute(self.http.post(self.url("/todos")).json(input))
            .await
    }

    pub async fn update_todo(&self, id: i64, patch: &TaskPatch) -> Result<Task, ClientError> {
        self.execute(
            self.http
                .put(self.url(&format!("/todos/{}", id)))
                .json(patch),
        )
        .await
    }

    pub async fn delete_todo(&self, id: i64) -> Result<DeleteResponse, ClientError> {
        self.execute(self.http.delete(self.url(&format!("/todos/{}", id))))
            .await
    }

    pub async fn stats(&self) -> Result<TaskStats, ClientError> {
        self.execute(self.http.get(self.url("/stats"))).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.execute(self.http.get(self.url("/health"))).await
    }
}
