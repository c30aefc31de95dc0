use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use planner_core::error::PlannerError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// 400 Bad Request with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(PlannerError::InvalidQuery(msg.into()).into())
    }

    /// 401 Unauthorized.
    pub fn unauthenticated() -> Self {
        Self(PlannerError::Unauthenticated.into())
    }

    /// 403 Forbidden with the given reason.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self(PlannerError::Forbidden(msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        let Some(e) = self.0.downcast_ref::<PlannerError>() else {
            return StatusCode::INTERNAL_SERVER_ERROR;
        };
        match e {
            PlannerError::NotInitialized => StatusCode::BAD_REQUEST,
            PlannerError::PostNotFound(_) | PlannerError::UserNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            PlannerError::UserExists(_) => StatusCode::CONFLICT,
            PlannerError::InvalidLogin(_)
            | PlannerError::InvalidRole(_)
            | PlannerError::InvalidTaskKind(_)
            | PlannerError::MissingField(_)
            | PlannerError::InvalidDate(_)
            | PlannerError::InvalidQuery(_)
            | PlannerError::UnknownResponsible(_) => StatusCode::BAD_REQUEST,
            PlannerError::InvalidCredentials | PlannerError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            PlannerError::Forbidden(_) => StatusCode::FORBIDDEN,
            PlannerError::MalformedPasswordHash
            | PlannerError::Io(_)
            | PlannerError::Yaml(_)
            | PlannerError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {:#}", self.0);
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
