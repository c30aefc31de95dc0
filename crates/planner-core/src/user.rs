use crate::error::{PlannerError, Result};
use crate::paths;
use crate::password;
use crate::roles::RoleSet;
use crate::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A staff account as stored in `.planner/users.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub password_hash: String,
    #[serde(default)]
    pub roles: RoleSet,
    pub created_at: DateTime<Utc>,
}

/// The part of a user that is safe to hand to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: u64,
    pub login: String,
    pub roles: RoleSet,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<User>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            login: self.login.clone(),
            roles: self.roles.clone(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Create and persist a new user. `password_hash` comes from
    /// [`password::hash_password`].
    pub fn create(
        root: &Path,
        login: impl Into<String>,
        password_hash: String,
        roles: RoleSet,
    ) -> Result<Self> {
        let login = login.into();
        paths::validate_login(&login)?;

        let mut file = load_file(root)?;
        if file.users.iter().any(|u| u.login == login) {
            return Err(PlannerError::UserExists(login));
        }

        let mut state = State::load(root)?;
        let user = User {
            id: state.allocate_user_id(),
            login,
            password_hash,
            roles,
            created_at: Utc::now(),
        };
        // Counter first: a failed write leaves a gap, never a reused id.
        state.save(root)?;
        file.users.push(user.clone());
        save_file(root, &file)?;
        Ok(user)
    }

    /// All users ordered by login.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut users = load_file(root)?.users;
        users.sort_by(|a, b| a.login.cmp(&b.login));
        Ok(users)
    }

    pub fn load(root: &Path, id: u64) -> Result<Self> {
        load_file(root)?
            .users
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| PlannerError::UserNotFound(id.to_string()))
    }

    pub fn find_by_login(root: &Path, login: &str) -> Result<Self> {
        load_file(root)?
            .users
            .into_iter()
            .find(|u| u.login == login)
            .ok_or_else(|| PlannerError::UserNotFound(login.to_string()))
    }

    /// Replace the stored record with the same id.
    pub fn save(&self, root: &Path) -> Result<()> {
        let mut file = load_file(root)?;
        let slot = file
            .users
            .iter_mut()
            .find(|u| u.id == self.id)
            .ok_or_else(|| PlannerError::UserNotFound(self.login.clone()))?;
        *slot = self.clone();
        save_file(root, &file)
    }

    // ---------------------------------------------------------------------------
    // Credentials
    // ---------------------------------------------------------------------------

    /// Check a login/password pair. Unknown logins and wrong passwords give
    /// the same error.
    pub fn authenticate(root: &Path, login: &str, password: &str) -> Result<Self> {
        let login = login.trim();
        if login.is_empty() {
            return Err(PlannerError::MissingField("login"));
        }
        if password.is_empty() {
            return Err(PlannerError::MissingField("password"));
        }
        let user = match Self::find_by_login(root, login) {
            Ok(u) => u,
            Err(PlannerError::UserNotFound(_)) => {
                // Same cost as a real check, so timing does not reveal logins.
                password::verify_unknown(password);
                return Err(PlannerError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };
        if password::verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(PlannerError::InvalidCredentials)
        }
    }

    pub fn set_password(&mut self, password_hash: String) {
        self.password_hash = password_hash;
    }
}

fn load_file(root: &Path) -> Result<UsersFile> {
    let path = paths::users_path(root);
    if !path.exists() {
        if !paths::planner_dir(root).exists() {
            return Err(PlannerError::NotInitialized);
        }
        return Ok(UsersFile::default());
    }
    crate::io::read_yaml(&path)
}

fn save_file(root: &Path, file: &UsersFile) -> Result<()> {
    crate::io::write_yaml(&paths::users_path(root), file)
}
