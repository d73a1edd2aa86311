//! ChatKit Portal — serves the widget homepage and mints ChatKit sessions.
//!
//! The binary in `main.rs` wires these modules to a TCP listener; integration
//! tests in `tests/` drive [`api::router`] directly.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod proxy;

use config::{Config, CredentialSource};
use proxy::upstream::ChatKitClient;

/// Shared application state passed to handlers.
pub struct AppState {
    pub config: Config,
    pub credentials: Arc<dyn CredentialSource>,
    pub chatkit: ChatKitClient,
}

impl AppState {
    pub fn new(config: Config, credentials: Arc<dyn CredentialSource>) -> anyhow::Result<Self> {
        let chatkit = ChatKitClient::new(config.sessions_url(), config.upstream_timeout)?;
        Ok(Self {
            config,
            credentials,
            chatkit,
        })
    }
}
