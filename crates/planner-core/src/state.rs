use crate::error::{PlannerError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Id counters for posts and users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "first_id")]
    pub next_post_id: u64,
    #[serde(default = "first_id")]
    pub next_user_id: u64,
    pub last_updated: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

fn first_id() -> u64 {
    1
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub fn new() -> Self {
        Self {
            version: 1,
            next_post_id: 1,
            next_user_id: 1,
            last_updated: Utc::now(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::state_path(root);
        if !path.exists() {
            return Err(PlannerError::NotInitialized);
        }
        crate::io::read_yaml(&path)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        crate::io::write_yaml(&paths::state_path(root), self)
    }

    // ---------------------------------------------------------------------------
    // Id allocation
    // ---------------------------------------------------------------------------

    pub fn allocate_post_id(&mut self) -> u64 {
        let id = self.next_post_id;
        self.next_post_id += 1;
        self.last_updated = Utc::now();
        id
    }

    pub fn allocate_user_id(&mut self) -> u64 {
        let id = self.next_user_id;
        self.next_user_id += 1;
        self.last_updated = Utc::now();
        id
    }
}
