use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use planner_core::post::{Post, PostDraft, PostView};
use planner_core::query::PostQuery;
use planner_core::types::TaskKind;

use crate::auth::Viewer;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, serde::Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub task: Option<String>,
    #[serde(default)]
    pub mine: bool,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl ListParams {
    fn into_query(self, default_per_page: usize) -> Result<PostQuery, AppError> {
        let task = self
            .task
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::parse::<TaskKind>)
            .transpose()?;
        let month = match (self.year, self.month) {
            (Some(y), Some(m)) => Some((y, m)),
            (None, None) => None,
            _ => return Err(AppError::bad_request("year and month must be given together")),
        };
        Ok(PostQuery {
            task,
            mine: self.mine,
            month,
            page: self.page.unwrap_or(1),
            per_page: self.per_page.unwrap_or(default_per_page),
        })
    }
}

/// GET /api/posts: filtered, paged list, latest deadline first.
pub async fn list_posts(
    State(app): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let query = params.into_query(app.config.listing.page_size)?;
    if query.mine && viewer.0.is_none() {
        return Err(AppError::unauthenticated());
    }
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let posts = Post::list(&root)?;
        let page = query.run(posts, viewer.roles())?;
        let views: Vec<PostView> = page.items.iter().map(|p| p.view(viewer.roles())).collect();
        Ok::<_, planner_core::PlannerError>(serde_json::json!({
            "posts": views,
            "page": page.page,
            "per_page": page.per_page,
            "total": page.total,
            "pages": page.pages,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/posts/:id: one post with status and the viewer's edit rights.
pub async fn get_post(
    State(app): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<u64>,
) -> Result<Json<PostView>, AppError> {
    let root = app.root.clone();
    let post = tokio::task::spawn_blocking(move || Post::load(&root, id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(post.view(viewer.roles())))
}

/// POST /api/posts: create a post (elevated roles only).
pub async fn create_post(
    State(app): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Json(draft): Json<PostDraft>,
) -> Result<(StatusCode, Json<PostView>), AppError> {
    let author = viewer.require_post_editor()?.login.clone();
    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    let post = tokio::task::spawn_blocking(move || Post::create(&root, draft))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    tracing::info!("post {} '{}' created by {author}", post.id, post.title);
    Ok((StatusCode::CREATED, Json(post.view(viewer.roles()))))
}

/// PUT /api/posts/:id: replace descriptive fields and task set (elevated roles only).
pub async fn update_post(
    State(app): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<u64>,
    Json(draft): Json<PostDraft>,
) -> Result<Json<PostView>, AppError> {
    let editor = viewer.require_post_editor()?.login.clone();
    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    let post = tokio::task::spawn_blocking(move || {
        let mut post = Post::load(&root, id)?;
        planner_core::post::check_responsible(&root, draft.responsible_user_id)?;
        post.update_details(draft)?;
        post.save(&root)?;
        Ok::<_, planner_core::PlannerError>(post)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    tracing::info!("post {id} updated by {editor}");
    Ok(Json(post.view(viewer.roles())))
}

#[derive(serde::Deserialize)]
pub struct LinksBody {
    pub links: BTreeMap<String, Option<String>>,
}

/// PUT /api/posts/:id/links: submit task links. Every key must be a task the
/// viewer may edit, otherwise the whole request is refused.
pub async fn update_links(
    State(app): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<u64>,
    Json(body): Json<LinksBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    viewer.require()?;
    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    let v = viewer.clone();
    let (post, updated) = tokio::task::spawn_blocking(move || {
        let mut post = Post::load(&root, id)?;
        let updated = post.apply_links(v.roles(), &body.links)?;
        if !updated.is_empty() {
            post.save(&root)?;
        }
        Ok::<_, planner_core::PlannerError>((post, updated))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?
    .inspect_err(|e| {
        if matches!(e, planner_core::PlannerError::Forbidden(_)) {
            tracing::warn!("{} denied on post {id}: {e}", viewer.login());
        }
    })?;

    tracing::info!(
        "post {id}: {} updated link(s) {:?}",
        viewer.login(),
        updated.iter().map(|k| k.as_str()).collect::<Vec<_>>()
    );
    Ok(Json(serde_json::json!({
        "updated": updated,
        "post": post.view(viewer.roles()),
    })))
}

/// DELETE /api/posts/:id: remove a post (elevated roles only).
pub async fn delete_post(
    State(app): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let editor = viewer.require_post_editor()?.login.clone();
    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    tokio::task::spawn_blocking(move || Post::delete(&root, id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    tracing::info!("post {id} deleted by {editor}");
    Ok(Json(serde_json::json!({ "deleted": id })))
}
