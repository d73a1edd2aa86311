use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

/// Every way a session request can fail, and the JSON the browser gets for it.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Server missing OPENAI_API_KEY or WORKFLOW_ID.")]
    MissingCredentials,

    /// Upstream answered with a non-200 status; its body is passed through.
    #[error("upstream rejected session request with status {status}")]
    Rejected { status: StatusCode, body: Value },

    #[error("chatkit/sessions response missing client_secret.")]
    MissingClientSecret,

    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Transport(String),

    #[error("invalid JSON in upstream response: {0}")]
    MalformedBody(String),
}

impl SessionError {
    pub fn status(&self) -> StatusCode {
        match self {
            SessionError::Rejected { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The full JSON body returned to the caller: `{"error": ...}`.
    pub fn body(&self) -> Value {
        json!({ "error": self.error_value() })
    }

    /// The `error` field of the response body.
    pub fn error_value(&self) -> Value {
        match self {
            SessionError::MissingCredentials | SessionError::MissingClientSecret => {
                Value::String(self.to_string())
            }
            SessionError::Rejected { body, .. } => body.clone(),
            SessionError::Timeout
            | SessionError::Transport(_)
            | SessionError::MalformedBody(_) => {
                Value::String(format!("Failed to create ChatKit session: {}", self))
            }
        }
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SessionError::Timeout
        } else if e.is_decode() {
            SessionError::MalformedBody(e.to_string())
        } else {
            SessionError::Transport(e.to_string())
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
