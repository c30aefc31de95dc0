use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("not initialized: run 'planner init'")]
    NotInitialized,

    #[error("post not found: {0}")]
    PostNotFound(u64),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user already exists: {0}")]
    UserExists(String),

    #[error("invalid login '{0}': must be 2-32 lowercase letters, digits, '.', '_' or '-'")]
    InvalidLogin(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("invalid task kind: {0}")]
    InvalidTaskKind(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid date '{0}': expected RFC 3339 (e.g. 2025-03-01T12:00:00Z)")]
    InvalidDate(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("responsible user {0} does not exist")]
    UnknownResponsible(u64),

    #[error("invalid login or password")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("malformed password hash")]
    MalformedPasswordHash,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
