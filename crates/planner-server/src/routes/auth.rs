use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use planner_core::user::User;

use crate::auth::{clear_cookie, session_cookie, Viewer};
use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/login: check credentials and start a session.
pub async fn login(
    State(app): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Response, AppError> {
    let root = app.root.clone();
    let attempted = body.login.trim().to_string();
    let user = tokio::task::spawn_blocking(move || {
        User::authenticate(&root, &body.login, &body.password)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?
    .inspect_err(|e| tracing::info!("login failed for '{attempted}': {e}"))?;

    let (token, expires_at) = app.sessions.issue(user.id)?;
    tracing::info!("user '{}' logged in", user.login);

    let cookie = session_cookie(app.cookie_name(), &token, app.sessions.ttl_secs());
    let body = serde_json::json!({
        "user": user.summary(),
        "token": token,
        "expires_at": expires_at,
    });
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// POST /api/auth/logout: drop the session cookie.
pub async fn logout(State(app): State<AppState>, Extension(viewer): Extension<Viewer>) -> Response {
    if viewer.0.is_some() {
        tracing::info!("user '{}' logged out", viewer.login());
    }
    (
        [(header::SET_COOKIE, clear_cookie(app.cookie_name()))],
        Json(serde_json::json!({ "ok": true })),
    )
        .into_response()
}

/// GET /api/auth/session: the current user, or `null`.
pub async fn session(Extension(viewer): Extension<Viewer>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "user": viewer.0.as_ref().map(User::summary),
    }))
}
