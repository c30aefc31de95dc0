//! Role sets and the static task → owning-role registry.

use crate::types::{Role, TaskKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Roles that may edit every task of every post.
pub const ELEVATED_ROLES: [Role; 3] = [Role::Admin, Role::Coordinator, Role::Smm];

/// Roles that see every post in the "my tasks" filter.
pub const OVERSEER_ROLES: [Role; 2] = [Role::Admin, Role::Coordinator];

/// The role that owns a task kind by default. `Text` has no owner: any
/// authenticated user may edit it.
pub const fn owning_role(kind: TaskKind) -> Option<Role> {
    match kind {
        TaskKind::VideoSmm => Some(Role::Smm),
        TaskKind::VideoMaker => Some(Role::Videomaker),
        TaskKind::Photogallery => Some(Role::Photographer),
        TaskKind::CoverPhoto => Some(Role::Designer),
        TaskKind::PhotoCards => Some(Role::Designer),
        TaskKind::Text => None,
    }
}

/// The task kinds owned by `role`.
pub fn owned_tasks(role: Role) -> impl Iterator<Item = TaskKind> {
    TaskKind::all()
        .iter()
        .copied()
        .filter(move |&k| owning_role(k) == Some(role))
}

// ---------------------------------------------------------------------------
// RoleSet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn insert(&mut self, role: Role) -> bool {
        self.0.insert(role)
    }

    pub fn remove(&mut self, role: Role) -> bool {
        self.0.remove(&role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn holds_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.0.contains(r))
    }

    pub fn is_elevated(&self) -> bool {
        self.holds_any(&ELEVATED_ROLES)
    }

    pub fn is_overseer(&self) -> bool {
        self.holds_any(&OVERSEER_ROLES)
    }

    /// Whether this set holds the owning role of `kind`. Always false for
    /// unowned kinds.
    pub fn owns(&self, kind: TaskKind) -> bool {
        owning_role(kind).is_some_and(|r| self.contains(r))
    }

    /// Comma-separated role names, or `-` for an empty set.
    pub fn describe(&self) -> String {
        if self.0.is_empty() {
            return "-".to_string();
        }
        self.iter().map(Role::as_str).collect::<Vec<_>>().join(",")
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Role; N]> for RoleSet {
    fn from(roles: [Role; N]) -> Self {
        roles.into_iter().collect()
    }
}
