//! HTTP client for the upstream ChatKit sessions API.
//! One request per call: no retries, no caching.

use std::time::Duration;

use axum::http::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

use crate::config::ChatKitCredentials;
use crate::errors::SessionError;

/// The fixed end-user identifier sent with every session.
pub const SESSION_USER: &str = "web-user";

const BETA_HEADER: HeaderName = HeaderName::from_static("openai-beta");
const BETA_VALUE: &str = "chatkit_beta=v1";

#[derive(Debug, Serialize)]
struct SessionRequest<'a> {
    workflow: WorkflowRef<'a>,
    user: &'a str,
}

#[derive(Debug, Serialize)]
struct WorkflowRef<'a> {
    id: &'a str,
}

/// A freshly created upstream session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatKitSession {
    pub client_secret: String,
}

pub struct ChatKitClient {
    client: reqwest::Client,
    sessions_url: String,
}

impl ChatKitClient {
    pub fn new(sessions_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .pool_max_idle_per_host(8)
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            sessions_url: sessions_url.into(),
        })
    }

    pub fn sessions_url(&self) -> &str {
        &self.sessions_url
    }

    /// Open one ChatKit session bound to the configured workflow.
    ///
    /// The body is parsed as JSON before the status is inspected, so a
    /// non-JSON body is a [`SessionError::MalformedBody`] whatever the status.
    pub async fn create_session(
        &self,
        creds: &ChatKitCredentials,
    ) -> Result<ChatKitSession, SessionError> {
        let payload = SessionRequest {
            workflow: WorkflowRef {
                id: &creds.workflow_id,
            },
            user: SESSION_USER,
        };

        let resp = self
            .client
            .post(&self.sessions_url)
            .headers(session_headers(&creds.api_key)?)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| SessionError::MalformedBody(e.to_string()))?;

        if status != StatusCode::OK {
            return Err(SessionError::Rejected { status, body });
        }

        extract_client_secret(&body)
            .map(|client_secret| ChatKitSession { client_secret })
            .ok_or(SessionError::MissingClientSecret)
    }
}

fn session_headers(api_key: &str) -> Result<HeaderMap, SessionError> {
    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
        .map_err(|_| SessionError::Transport("API key is not a valid header value".into()))?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(BETA_HEADER, HeaderValue::from_static(BETA_VALUE));
    Ok(headers)
}

/// `client_secret` must be a non-empty string to count.
fn extract_client_secret(body: &Value) -> Option<String> {
    body.get("client_secret")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
