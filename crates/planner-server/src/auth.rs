use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use planner_core::roles::RoleSet;
use planner_core::user::User;

use crate::error::AppError;
use crate::state::AppState;

/// The user behind the current request, if any. Inserted into request
/// extensions by [`session_middleware`] for every route.
#[derive(Clone, Debug, Default)]
pub struct Viewer(pub Option<User>);

impl Viewer {
    pub fn roles(&self) -> Option<&RoleSet> {
        self.0.as_ref().map(|u| &u.roles)
    }

    /// The authenticated user, or 401.
    pub fn require(&self) -> Result<&User, AppError> {
        self.0.as_ref().ok_or_else(AppError::unauthenticated)
    }

    /// The authenticated user if they hold an elevated role; 401 or 403
    /// otherwise.
    pub fn require_post_editor(&self) -> Result<&User, AppError> {
        let user = self.require()?;
        if !planner_core::access::can_edit_post(Some(&user.roles)) {
            return Err(AppError::forbidden(
                "only admin, coordinator or smm may change posts",
            ));
        }
        Ok(user)
    }

    pub fn login(&self) -> &str {
        self.0.as_ref().map(|u| u.login.as_str()).unwrap_or("anonymous")
    }
}

/// Resolve the session token (cookie first, then `Authorization: Bearer`)
/// into a [`Viewer`]. Missing, invalid or expired tokens and deleted users
/// all yield an anonymous viewer; individual handlers decide whether that is
/// acceptable.
pub async fn session_middleware(
    State(app): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let user_id = session_token(req.headers(), app.cookie_name())
        .and_then(|token| app.sessions.verify(token));

    let user = match user_id {
        Some(id) => {
            let root = app.root.clone();
            match tokio::task::spawn_blocking(move || User::load(&root, id)).await {
                Ok(Ok(user)) => Some(user),
                Ok(Err(e)) => {
                    tracing::debug!("session for user {id} ignored: {e}");
                    None
                }
                Err(e) => {
                    tracing::error!("session lookup join error: {e}");
                    None
                }
            }
        }
        None => None,
    };

    req.extensions_mut().insert(Viewer(user));
    next.run(req).await
}

fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    let from_cookie = headers
        .get_all("cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|part| {
            part.trim()
                .strip_prefix(cookie_name)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|v| !v.is_empty());
    if from_cookie.is_some() {
        return from_cookie;
    }

    let auth = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// `Set-Cookie` value carrying `token`.
pub fn session_cookie(name: &str, token: &str, max_age_secs: i64) -> String {
    format!("{name}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}")
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
