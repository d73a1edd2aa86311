use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::errors::SessionError;
use crate::proxy::upstream::ChatKitSession;
use crate::AppState;

/// `POST /api/chatkit/session/` — hands the browser a ChatKit `client_secret`.
///
/// Runs inside the request span opened by the request-id middleware, so its
/// log lines carry the same `req_id` as the `x-request-id` response header.
#[tracing::instrument(skip_all)]
pub async fn create_session_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, SessionError> {
    let session = open_session(&state).await?;
    Ok(Json(success_body(&session)))
}

/// Status and JSON body for one session request, as the endpoint returns them.
pub async fn session_outcome(state: &AppState) -> (StatusCode, Value) {
    match open_session(state).await {
        Ok(session) => (StatusCode::OK, success_body(&session)),
        Err(e) => (e.status(), e.body()),
    }
}

fn success_body(session: &ChatKitSession) -> Value {
    json!({ "client_secret": session.client_secret })
}

/// Run one session request and write its status and body to `out`.
/// Fails when the status is not 200.
pub async fn report_session<W: Write>(state: &AppState, out: &mut W) -> anyhow::Result<()> {
    let (status, body) = session_outcome(state).await;

    writeln!(out, "Status: {}", status.as_u16())?;
    writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;

    if status != StatusCode::OK {
        anyhow::bail!("session request failed with status {}", status.as_u16());
    }
    Ok(())
}

/// Resolve credentials and make the single upstream call.
pub async fn open_session(state: &AppState) -> Result<ChatKitSession, SessionError> {
    let start = Instant::now();

    let Some(creds) = state.credentials.credentials() else {
        tracing::error!("session request refused: OPENAI_API_KEY or WORKFLOW_ID not set");
        return Err(SessionError::MissingCredentials);
    };

    let result = state.chatkit.create_session(&creds).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => tracing::info!(
            workflow_id = %creds.workflow_id,
            latency_ms,
            "chatkit session created"
        ),
        Err(SessionError::Rejected { status, .. }) => tracing::warn!(
            workflow_id = %creds.workflow_id,
            status = %status,
            latency_ms,
            "upstream rejected chatkit session"
        ),
        Err(e) => tracing::warn!(
            workflow_id = %creds.workflow_id,
            error = %e,
            latency_ms,
            "chatkit session request failed"
        ),
    }

    result
}
