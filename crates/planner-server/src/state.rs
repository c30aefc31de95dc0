use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use planner_core::config::Config;

use crate::session::SessionSigner;

/// Overrides the key in `.planner/session.key` when set.
pub const SESSION_SECRET_ENV: &str = "PLANNER_SESSION_SECRET";

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub sessions: SessionSigner,
    /// Serializes read-modify-write cycles on the YAML store.
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(root: PathBuf, config: Config, key: Vec<u8>) -> Self {
        let sessions = SessionSigner::new(key, config.session_ttl_secs());
        Self {
            root,
            config: Arc::new(config),
            sessions,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load config and session key for an initialized workspace.
    pub fn load(root: PathBuf) -> planner_core::Result<Self> {
        let config = Config::load(&root)?;
        for warning in config.validate() {
            tracing::warn!("config: {}", warning.message);
        }
        let key = match std::env::var(SESSION_SECRET_ENV) {
            Ok(secret) if !secret.is_empty() => secret.into_bytes(),
            _ => planner_core::workspace::session_key(&root)?,
        };
        Ok(Self::new(root, config, key))
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.session.cookie_name
    }
}
