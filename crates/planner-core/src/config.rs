use crate::error::{PlannerError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u32,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_ttl_days() -> u32 {
    30
}

fn default_cookie_name() -> String {
    "planner_session".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_days: default_ttl_days(),
            cookie_name: default_cookie_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig / ListingConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3141
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    10
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub workspace: WorkspaceInfo,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: 1,
            workspace: WorkspaceInfo { name: name.into() },
            session: SessionConfig::default(),
            server: ServerConfig::default(),
            listing: ListingConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(PlannerError::NotInitialized);
        }
        crate::io::read_yaml(&path)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        crate::io::write_yaml(&paths::config_path(root), self)
    }

    /// Session lifetime in seconds.
    pub fn session_ttl_secs(&self) -> i64 {
        i64::from(self.session.ttl_days.max(1)) * 24 * 60 * 60
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        if self.workspace.name.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "workspace.name is empty".to_string(),
            });
        }
        if self.session.ttl_days == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "session.ttl_days is 0; sessions will last one day".to_string(),
            });
        }
        if self.session.cookie_name.is_empty()
            || !self
                .session
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "session.cookie_name '{}' must be non-empty ASCII letters, digits, '_' or '-'",
                    self.session.cookie_name
                ),
            });
        }
        if self.listing.page_size == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "listing.page_size must be at least 1".to_string(),
            });
        }
        warnings
    }
}
