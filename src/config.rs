use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use anyhow::Context;

/// Default base URL of the upstream ChatKit API.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Env var holding the upstream bearer credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Env var holding the workflow identifier sessions are bound to.
pub const WORKFLOW_ID_VAR: &str = "WORKFLOW_ID";

/// Server configuration, read once at startup.
///
/// The ChatKit credentials are deliberately not part of this struct: they are
/// resolved per request through a [`CredentialSource`].
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Base URL of the upstream API. The session endpoint is `<base>/chatkit/sessions`.
    pub api_base: String,
    pub upstream_timeout: Duration,
    /// Origins allowed to call the session endpoint cross-site. Empty = no CORS layer.
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn sessions_url(&self) -> String {
        format!("{}/chatkit/sessions", self.api_base.trim_end_matches('/'))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            api_base: DEFAULT_API_BASE.to_string(),
            upstream_timeout: Duration::from_secs(30),
            allowed_origins: Vec::new(),
        }
    }
}

/// Load config from the process environment, after pulling in `.env` if present.
pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();
    load_from(|name| std::env::var(name).ok())
}

/// Build a [`Config`] from an arbitrary variable lookup.
pub fn load_from<F>(lookup: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = Config::default();
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let host = match var("HOST") {
        Some(v) => v
            .trim()
            .parse::<IpAddr>()
            .with_context(|| format!("invalid HOST: {}", v))?,
        None => defaults.host,
    };

    let port = match var("PORT") {
        Some(v) => v
            .trim()
            .parse::<u16>()
            .with_context(|| format!("invalid PORT: {}", v))?,
        None => defaults.port,
    };

    let upstream_timeout = match var("CHATKIT_TIMEOUT_SECS") {
        Some(v) => {
            let secs: u64 = v
                .trim()
                .parse()
                .with_context(|| format!("invalid CHATKIT_TIMEOUT_SECS: {}", v))?;
            if secs == 0 {
                anyhow::bail!("CHATKIT_TIMEOUT_SECS must be greater than zero");
            }
            Duration::from_secs(secs)
        }
        None => defaults.upstream_timeout,
    };

    Ok(Config {
        host,
        port,
        api_base: var("CHATKIT_API_BASE")
            .map(|v| v.trim().to_string())
            .unwrap_or(defaults.api_base),
        upstream_timeout,
        allowed_origins: var("CHATKIT_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    })
}

// ── Per-request credentials ───────────────────────────────────

/// The secret pair needed to open a ChatKit session.
#[derive(Clone, PartialEq, Eq)]
pub struct ChatKitCredentials {
    pub api_key: String,
    pub workflow_id: String,
}

impl fmt::Debug for ChatKitCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatKitCredentials")
            .field("api_key", &mask(&self.api_key))
            .field("workflow_id", &self.workflow_id)
            .finish()
    }
}

/// Mask a secret for logs: keep the first and last four characters of long values.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 12 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}…{}", head, tail)
    } else {
        "****".to_string()
    }
}

/// Where the session handler gets its credentials from.
///
/// Returns `None` when either value is missing or empty.
pub trait CredentialSource: Send + Sync {
    fn credentials(&self) -> Option<ChatKitCredentials>;
}

/// Reads the credentials from the process environment on every call.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    api_key_var: String,
    workflow_id_var: String,
}

impl EnvCredentials {
    pub fn new() -> Self {
        Self::with_vars(API_KEY_VAR, WORKFLOW_ID_VAR)
    }

    pub fn with_vars(api_key_var: impl Into<String>, workflow_id_var: impl Into<String>) -> Self {
        Self {
            api_key_var: api_key_var.into(),
            workflow_id_var: workflow_id_var.into(),
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for EnvCredentials {
    fn credentials(&self) -> Option<ChatKitCredentials> {
        let api_key = std::env::var(&self.api_key_var).ok()?;
        let workflow_id = std::env::var(&self.workflow_id_var).ok()?;
        StaticCredentials::new(api_key, workflow_id).credentials()
    }
}

/// A fixed credential pair, useful for tests and embedding.
#[derive(Debug, Clone)]
pub struct StaticCredentials(Option<ChatKitCredentials>);

impl StaticCredentials {
    pub fn new(api_key: impl Into<String>, workflow_id: impl Into<String>) -> Self {
        Self(Some(ChatKitCredentials {
            api_key: api_key.into(),
            workflow_id: workflow_id.into(),
        }))
    }

    /// A source that never yields credentials.
    pub fn missing() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredentials {
    fn credentials(&self) -> Option<ChatKitCredentials> {
        self.0
            .as_ref()
            .filter(|c| !c.api_key.is_empty() && !c.workflow_id.is_empty())
            .cloned()
    }
}
