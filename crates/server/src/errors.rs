use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use service::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"error": <title>, "detail": <message>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }

    /// Caller error: malformed id or body. Never reaches the repository.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(detail.into()))
    }

    pub fn invalid_id() -> Self {
        Self::bad_request("invalid id format")
    }

    pub fn invalid_json(err: &serde_json::Error) -> Self {
        Self::bad_request(format!("invalid json: {err}"))
    }

    /// Any store failure, with the operation name in front of the store's message.
    pub fn store(title: &'static str, op: &str, err: &ServiceError) -> Self {
        error!(op, err = %err, "store operation failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, title, Some(format!("{op} error: {err}")))
    }
}

impl From<ModelError> for JsonApiError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::InvalidId(_) => Self::invalid_id(),
            other => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", Some(other.to_string())),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.title, "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

/// Failures before the listener is serving. All of them abort the process.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("store unreachable: {0}")]
    Store(#[from] ModelError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl From<std::io::Error> for StartupError {
    fn from(e: std::io::Error) -> Self { Self::Any(e.into()) }
}
