pub mod auth;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Auth
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/auth/session", get(routes::auth::session))
        // Posts
        .route(
            "/api/posts",
            get(routes::posts::list_posts).post(routes::posts::create_post),
        )
        .route(
            "/api/posts/{id}",
            get(routes::posts::get_post)
                .put(routes::posts::update_post)
                .delete(routes::posts::delete_post),
        )
        .route("/api/posts/{id}/links", put(routes::posts::update_links))
        // Calendar
        .route("/api/calendar", get(routes::calendar::get_calendar))
        // Users
        .route("/api/users", get(routes::users::list_users))
        // Task registry
        .route("/api/tasks", get(routes::tasks::get_registry))
        .layer(from_fn_with_state(app_state.clone(), auth::session_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the planner API server on the given port.
pub async fn serve(app_state: AppState, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener, open_browser).await
}

/// Start the planner API server on a pre-bound listener.
///
/// Lets the caller bind port 0 and read the actual port before starting.
pub async fn serve_on(
    app_state: AppState,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let workspace = app_state.config.workspace.name.clone();
    let app = build_router(app_state);

    tracing::info!("planner '{workspace}' listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        if let Err(e) = open::that(&url) {
            tracing::warn!("could not open browser: {e}");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
