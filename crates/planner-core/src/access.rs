//! Edit rights and "my tasks" relevance, computed from role sets alone.
//!
//! Every predicate takes the viewer as `Option<&RoleSet>`; `None` is an
//! anonymous viewer. All of them fail closed: anything unknown yields `false`.

use crate::roles::RoleSet;
use crate::status::TaskSheet;
use crate::types::TaskKind;

/// Whether `viewer` may edit the link of a `kind` task.
///
/// Evaluated in order: anonymous viewers never edit; elevated roles edit
/// everything; text is open to any authenticated user; otherwise the viewer
/// must hold the owning role.
pub fn can_edit_task(viewer: Option<&RoleSet>, kind: TaskKind) -> bool {
    let Some(roles) = viewer else {
        return false;
    };
    if roles.is_elevated() {
        return true;
    }
    if kind == TaskKind::Text {
        return true;
    }
    roles.owns(kind)
}

/// Same as [`can_edit_task`] for a kind given by name. Unknown names are
/// never editable.
pub fn can_edit_task_named(viewer: Option<&RoleSet>, kind: &str) -> bool {
    match kind.parse::<TaskKind>() {
        Ok(kind) => can_edit_task(viewer, kind),
        Err(_) => false,
    }
}

/// Whether a post belongs in the viewer's "my tasks" list.
///
/// Admins and coordinators see every post. Anyone else sees posts that
/// require a task whose owning role they hold; `text` has no owner and so
/// never makes a post relevant. SMM is elevated for editing but not here.
pub fn is_relevant_to_user(sheet: &TaskSheet, viewer: Option<&RoleSet>) -> bool {
    let Some(roles) = viewer else {
        return false;
    };
    if roles.is_overseer() {
        return true;
    }
    sheet.required_tasks.iter().any(|&k| roles.owns(k))
}

/// Whether `viewer` may create posts, edit their descriptive fields and task
/// sets, or delete them.
pub fn can_edit_post(viewer: Option<&RoleSet>) -> bool {
    viewer.is_some_and(RoleSet::is_elevated)
}

/// The required tasks of `sheet` whose links `viewer` may edit.
pub fn editable_tasks(sheet: &TaskSheet, viewer: Option<&RoleSet>) -> Vec<TaskKind> {
    sheet
        .required_tasks
        .iter()
        .copied()
        .filter(|&k| can_edit_task(viewer, k))
        .collect()
}

/// Public per-task filter: does the post require `kind` at all.
pub fn matches_task_filter(sheet: &TaskSheet, kind: TaskKind) -> bool {
    sheet.requires(kind)
}
