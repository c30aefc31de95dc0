//! Creating a planner workspace and reading its session key.

use crate::config::Config;
use crate::error::{PlannerError, Result};
use crate::io;
use crate::paths;
use crate::state::State;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde::Serialize;
use std::path::Path;

const SESSION_KEY_LEN: usize = 32;

#[derive(Debug, Clone, Serialize)]
pub struct InitReport {
    pub created_config: bool,
    pub created_state: bool,
    pub created_session_key: bool,
}

/// Create `.planner/` under `root`. Idempotent: existing files are kept.
pub fn init(root: &Path, name: &str) -> Result<InitReport> {
    io::ensure_dir(&paths::planner_dir(root))?;
    io::ensure_dir(&paths::posts_dir(root))?;

    let config = serde_yaml::to_string(&Config::new(name))?;
    let created_config = io::write_if_missing(&paths::config_path(root), config.as_bytes())?;

    let state = serde_yaml::to_string(&State::new())?;
    let created_state = io::write_if_missing(&paths::state_path(root), state.as_bytes())?;

    let mut key = [0u8; SESSION_KEY_LEN];
    rand::thread_rng().fill_bytes(&mut key);
    let created_session_key = io::write_if_missing(
        &paths::session_key_path(root),
        STANDARD_NO_PAD.encode(key).as_bytes(),
    )?;

    Ok(InitReport {
        created_config,
        created_state,
        created_session_key,
    })
}

pub fn is_initialized(root: &Path) -> bool {
    paths::config_path(root).exists()
}

/// The secret used to sign session tokens.
pub fn session_key(root: &Path) -> Result<Vec<u8>> {
    let path = paths::session_key_path(root);
    if !path.exists() {
        return Err(PlannerError::NotInitialized);
    }
    let encoded = std::fs::read_to_string(&path)?;
    STANDARD_NO_PAD.decode(encoded.trim()).map_err(|e| {
        PlannerError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{}: {e}", path.display()),
        ))
    })
}
