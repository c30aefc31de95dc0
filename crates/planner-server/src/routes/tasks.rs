use axum::Json;
use planner_core::post::{preset_tasks, POST_TYPES};
use planner_core::roles::owning_role;
use planner_core::types::{Role, TaskKind};
use serde::Serialize;

#[derive(Serialize)]
pub struct TaskInfo {
    pub kind: TaskKind,
    pub label: &'static str,
    pub label_en: &'static str,
    pub owning_role: Option<Role>,
}

#[derive(Serialize)]
pub struct PostTypeInfo {
    pub name: &'static str,
    pub preset: Vec<TaskKind>,
}

#[derive(Serialize)]
pub struct Registry {
    pub tasks: Vec<TaskInfo>,
    pub post_types: Vec<PostTypeInfo>,
}

fn registry() -> Registry {
    let tasks = TaskKind::all()
        .iter()
        .map(|&kind| TaskInfo {
            kind,
            label: kind.label(),
            label_en: kind.label_en(),
            owning_role: owning_role(kind),
        })
        .collect();
    let post_types = POST_TYPES
        .iter()
        .map(|&name| PostTypeInfo {
            name,
            preset: preset_tasks(name).into_iter().collect(),
        })
        .collect();
    Registry { tasks, post_types }
}

/// GET /api/tasks: task kinds with their owners, and post types with their
/// default task sets.
pub async fn get_registry() -> Json<Registry> {
    Json(registry())
}
