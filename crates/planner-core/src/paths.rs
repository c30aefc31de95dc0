use crate::error::{PlannerError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PLANNER_DIR: &str = ".planner";
pub const POSTS_DIR: &str = ".planner/posts";

pub const CONFIG_FILE: &str = ".planner/config.yaml";
pub const STATE_FILE: &str = ".planner/state.yaml";
pub const USERS_FILE: &str = ".planner/users.yaml";
pub const SESSION_KEY_FILE: &str = ".planner/session.key";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn planner_dir(root: &Path) -> PathBuf {
    root.join(PLANNER_DIR)
}

pub fn posts_dir(root: &Path) -> PathBuf {
    root.join(POSTS_DIR)
}

pub fn post_file(root: &Path, id: u64) -> PathBuf {
    posts_dir(root).join(format!("{id}.yaml"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE)
}

pub fn users_path(root: &Path) -> PathBuf {
    root.join(USERS_FILE)
}

pub fn session_key_path(root: &Path) -> PathBuf {
    root.join(SESSION_KEY_FILE)
}

// ---------------------------------------------------------------------------
// Login validation
// ---------------------------------------------------------------------------

static LOGIN_RE: OnceLock<Regex> = OnceLock::new();

fn login_re() -> &'static Regex {
    LOGIN_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9._-]{2,32}$").expect("infallible: login pattern is valid")
    })
}

pub fn validate_login(login: &str) -> Result<()> {
    if !login_re().is_match(login) {
        return Err(PlannerError::InvalidLogin(login.to_string()));
    }
    Ok(())
}
