use axum::extract::State;
use axum::{Extension, Json};
use planner_core::user::{User, UserSummary};

use crate::auth::Viewer;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/users: every account with its roles. Password hashes never leave
/// the store.
pub async fn list_users(
    State(app): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    viewer.require()?;
    let root = app.root.clone();
    let users = tokio::task::spawn_blocking(move || User::list(&root))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(users.iter().map(User::summary).collect()))
}
