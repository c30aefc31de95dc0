use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::{Extension, Json};
use chrono::Datelike;
use planner_core::post::{Post, PostView};
use planner_core::query::calendar_month;

use crate::auth::Viewer;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, serde::Deserialize)]
pub struct CalendarParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// GET /api/calendar: posts of one month grouped by deadline day. Defaults
/// to the current month.
pub async fn get_calendar(
    State(app): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Query(params): Query<CalendarParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let today = chrono::Utc::now();
    let year = params.year.unwrap_or(today.year());
    let month = params.month.unwrap_or(today.month());
    let root = app.root.clone();
    let days = tokio::task::spawn_blocking(move || {
        let posts = Post::list(&root)?;
        let grouped = calendar_month(&posts, year, month)?;
        let days: BTreeMap<u32, Vec<PostView>> = grouped
            .into_iter()
            .map(|(day, posts)| (day, posts.iter().map(|p| p.view(viewer.roles())).collect()))
            .collect();
        Ok::<_, planner_core::PlannerError>(days)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({
        "year": year,
        "month": month,
        "days": days,
    })))
}
