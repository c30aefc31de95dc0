use axum::http::StatusCode;
use http_body_util::BodyExt;
use planner_core::password::hash_password_with;
use planner_core::post::{Post, PostDraft};
use planner_core::roles::RoleSet;
use planner_core::types::{Role, TaskKind};
use planner_core::user::User;
use planner_server::{build_router, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Initialize a workspace and return state signed with a fixed key.
fn init_workspace(dir: &TempDir) -> AppState {
    planner_core::workspace::init(dir.path(), "newsroom").unwrap();
    let config = planner_core::config::Config::load(dir.path()).unwrap();
    AppState::new(dir.path().to_path_buf(), config, b"integration-test-key".to_vec())
}

fn add_user(dir: &TempDir, login: &str, roles: &[Role]) -> User {
    User::create(
        dir.path(),
        login,
        hash_password_with("secret", 1_000),
        roles.iter().copied().collect::<RoleSet>(),
    )
    .unwrap()
}

fn add_post(dir: &TempDir, title: &str, post_type: &str, deadline: &str) -> Post {
    Post::create(
        dir.path(),
        PostDraft {
            title: title.into(),
            post_type: post_type.into(),
            deadline: deadline.into(),
            ..Default::default()
        },
    )
    .unwrap()
}

fn bearer(state: &AppState, user: &User) -> String {
    format!("Bearer {}", state.sessions.issue(user.id).unwrap().0)
}

/// Send a request via `oneshot` and return (status, headers, parsed JSON body).
async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, headers, json)
}

async fn get(app: axum::Router, uri: &str, auth: Option<&str>) -> (StatusCode, serde_json::Value) {
    let (status, _, json) = send(app, "GET", uri, auth, None).await;
    (status, json)
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_sets_cookie_and_session_resolves_it() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    add_user(&dir, "anna", &[Role::Designer]);

    let (status, headers, body) = send(
        build_router(state.clone()),
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({"login": "anna", "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["login"], "anna");
    assert!(body["user"].get("password_hash").is_none());

    let cookie = headers
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("planner_session="));
    assert!(cookie.contains("HttpOnly"));
    let pair = cookie.split(';').next().unwrap().to_string();

    let req = axum::http::Request::builder()
        .uri("/api/auth/session")
        .header("cookie", pair)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = build_router(state).oneshot(req).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["user"]["login"], "anna");
    assert_eq!(json["user"]["roles"], serde_json::json!(["designer"]));
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    add_user(&dir, "anna", &[Role::Designer]);

    let (status, headers, body) = send(
        build_router(state),
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({"login": "anna", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(headers.get("set-cookie").is_none());
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn anonymous_session_is_null() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let (status, body) = get(build_router(state), "/api/auth/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn tampered_token_is_treated_as_anonymous() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let anna = add_user(&dir, "anna", &[Role::Admin]);
    let token = format!("{}x", bearer(&state, &anna));

    let (_, body) = get(build_router(state), "/api/auth/session", Some(&token)).await;
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn logout_clears_cookie() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let (status, headers, _) = send(build_router(state), "POST", "/api/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let cookie = headers.get("set-cookie").unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_post_includes_status_and_editable_tasks() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let designer = add_user(&dir, "dasha", &[Role::Designer]);
    let post = add_post(&dir, "Poster", "Афиша", "2025-03-14");

    let (status, body) = get(
        build_router(state.clone()),
        &format!("/api/posts/{}", post.id),
        Some(&bearer(&state, &designer)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Poster");
    assert_eq!(body["status"]["status"], "incomplete");
    assert_eq!(body["status"]["label"], "В работе");
    assert_eq!(body["editable_tasks"], serde_json::json!(["cover_photo"]));
    assert_eq!(body["can_edit_post"], false);
}

#[tokio::test]
async fn anonymous_can_view_but_not_edit() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let post = add_post(&dir, "Poster", "Афиша", "2025-03-14");

    let (status, body) = get(build_router(state.clone()), &format!("/api/posts/{}", post.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["editable_tasks"], serde_json::json!([]));

    let (status, _, _) = send(
        build_router(state),
        "PUT",
        &format!("/api/posts/{}/links", post.id),
        None,
        Some(serde_json::json!({"links": {"text": "https://docs/1"}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_post_is_404() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let (status, body) = get(build_router(state), "/api/posts/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("42"));
}

#[tokio::test]
async fn create_post_requires_elevated_role() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let designer = add_user(&dir, "dasha", &[Role::Designer]);
    let smm = add_user(&dir, "sveta", &[Role::Smm]);
    let draft = serde_json::json!({
        "title": "Gallery",
        "post_type": "Фотопост",
        "deadline": "2025-04-01T12:00",
    });

    let (status, _, _) = send(build_router(state.clone()), "POST", "/api/posts", None, Some(draft.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(
        build_router(state.clone()),
        "POST",
        "/api/posts",
        Some(&bearer(&state, &designer)),
        Some(draft.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = send(
        build_router(state.clone()),
        "POST",
        "/api/posts",
        Some(&bearer(&state, &smm)),
        Some(draft),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(
        body["tasks"]["required_tasks"],
        serde_json::json!(["photogallery", "cover_photo", "photo_cards"])
    );
    assert_eq!(body["can_edit_post"], true);
}

#[tokio::test]
async fn create_post_validates_fields() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let admin = add_user(&dir, "boss", &[Role::Admin]);

    let (status, _, body) = send(
        build_router(state.clone()),
        "POST",
        "/api/posts",
        Some(&bearer(&state, &admin)),
        Some(serde_json::json!({"title": "", "post_type": "Видео", "deadline": "2025-04-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("title"));

    let (status, _, _) = send(
        build_router(state.clone()),
        "POST",
        "/api/posts",
        Some(&bearer(&state, &admin)),
        Some(serde_json::json!({"title": "T", "post_type": "Видео", "deadline": "next week"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn links_update_completes_post() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let maker = add_user(&dir, "vova", &[Role::Videomaker]);
    let post = add_post(&dir, "Clip", "Видео", "2025-05-01");

    let (status, _, body) = send(
        build_router(state.clone()),
        "PUT",
        &format!("/api/posts/{}/links", post.id),
        Some(&bearer(&state, &maker)),
        Some(serde_json::json!({"links": {"video_maker": "  https://video/1  "}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], serde_json::json!(["video_maker"]));
    assert_eq!(body["post"]["status"]["complete"], true);
    assert_eq!(
        body["post"]["tasks"]["task_links"]["video_maker"],
        "https://video/1"
    );

    let stored = Post::load(dir.path(), post.id).unwrap();
    assert_eq!(stored.tasks.link(TaskKind::VideoMaker), Some("https://video/1"));
}

#[tokio::test]
async fn links_for_foreign_task_are_refused_without_writing() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let designer = add_user(&dir, "dasha", &[Role::Designer]);
    let post = add_post(&dir, "Poster", "Афиша", "2025-03-14");

    let (status, _, body) = send(
        build_router(state.clone()),
        "PUT",
        &format!("/api/posts/{}/links", post.id),
        Some(&bearer(&state, &designer)),
        Some(serde_json::json!({"links": {
            "cover_photo": "https://img/1",
            "video_smm": "https://video/2",
        }})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("video_smm"));

    let stored = Post::load(dir.path(), post.id).unwrap();
    assert!(stored.tasks.task_links.is_empty());
}

#[tokio::test]
async fn link_for_task_the_post_does_not_require_is_refused() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let designer = add_user(&dir, "dasha", &[Role::Designer]);
    let post = add_post(&dir, "Clip", "Видео", "2025-05-01");

    let (status, _, body) = send(
        build_router(state.clone()),
        "PUT",
        &format!("/api/posts/{}/links", post.id),
        Some(&bearer(&state, &designer)),
        Some(serde_json::json!({"links": {"cover_photo": "https://c"}})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("cover_photo"));

    let stored = Post::load(dir.path(), post.id).unwrap();
    assert_eq!(stored.tasks.link(TaskKind::CoverPhoto), None);
}

#[tokio::test]
async fn unknown_link_key_is_refused() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let admin = add_user(&dir, "boss", &[Role::Admin]);
    let post = add_post(&dir, "Poster", "Афиша", "2025-03-14");

    let (status, _, _) = send(
        build_router(state.clone()),
        "PUT",
        &format!("/api/posts/{}/links", post.id),
        Some(&bearer(&state, &admin)),
        Some(serde_json::json!({"links": {"podcast": "https://x"}})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn text_link_is_open_to_any_user() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let photographer = add_user(&dir, "petya", &[Role::Photographer]);
    let post = add_post(&dir, "Column", "Рубрика", "2025-03-14");

    let (status, _, body) = send(
        build_router(state.clone()),
        "PUT",
        &format!("/api/posts/{}/links", post.id),
        Some(&bearer(&state, &photographer)),
        Some(serde_json::json!({"links": {"text": "https://docs/7"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["status"]["status"], "complete");
}

#[tokio::test]
async fn update_rejects_unknown_responsible_user() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let admin = add_user(&dir, "boss", &[Role::Admin]);
    let post = add_post(&dir, "Clip", "Видео", "2025-05-01");

    let (status, _, body) = send(
        build_router(state.clone()),
        "PUT",
        &format!("/api/posts/{}", post.id),
        Some(&bearer(&state, &admin)),
        Some(serde_json::json!({
            "title": "Clip",
            "post_type": "Видео",
            "deadline": "2025-05-01",
            "responsible_user_id": 99,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("99"));

    let (status, _, body) = send(
        build_router(state.clone()),
        "PUT",
        &format!("/api/posts/{}", post.id),
        Some(&bearer(&state, &admin)),
        Some(serde_json::json!({
            "title": "Clip",
            "post_type": "Видео",
            "deadline": "2025-05-01",
            "responsible_user_id": admin.id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["responsible_user_id"], admin.id);
}

#[tokio::test]
async fn update_and_delete_post() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let coordinator = add_user(&dir, "olga", &[Role::Coordinator]);
    let auth = bearer(&state, &coordinator);
    let post = add_post(&dir, "Clip", "Видео", "2025-05-01");

    let (status, _, body) = send(
        build_router(state.clone()),
        "PUT",
        &format!("/api/posts/{}", post.id),
        Some(&auth),
        Some(serde_json::json!({
            "title": "Clip v2",
            "post_type": "Видео",
            "deadline": "2025-05-02",
            "required_tasks": ["video_maker", "text"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Clip v2");
    assert_eq!(body["missing_tasks"], serde_json::json!(["video_maker", "text"]));

    let (status, _, body) = send(
        build_router(state.clone()),
        "DELETE",
        &format!("/api/posts/{}", post.id),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], post.id);

    let (status, _) = get(build_router(state), &format!("/api/posts/{}", post.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_task_and_mine() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let designer = add_user(&dir, "dasha", &[Role::Designer]);
    let admin = add_user(&dir, "boss", &[Role::Admin]);
    add_post(&dir, "Clip", "Видео", "2025-05-01");
    add_post(&dir, "Poster", "Афиша", "2025-05-03");
    add_post(&dir, "Column", "Рубрика", "2025-05-02");

    let (status, body) = get(build_router(state.clone()), "/api/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    let titles: Vec<&str> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Poster", "Column", "Clip"]);

    let (_, body) = get(build_router(state.clone()), "/api/posts?task=video_maker", None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["posts"][0]["title"], "Clip");

    let (_, body) = get(
        build_router(state.clone()),
        "/api/posts?mine=true",
        Some(&bearer(&state, &designer)),
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["posts"][0]["title"], "Poster");

    let (_, body) = get(
        build_router(state.clone()),
        "/api/posts?mine=true",
        Some(&bearer(&state, &admin)),
    )
    .await;
    assert_eq!(body["total"], 3);

    let (status, _) = get(build_router(state.clone()), "/api/posts?mine=true", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(build_router(state), "/api/posts?task=podcast", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_pages_results() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    for day in 1..=5 {
        add_post(&dir, &format!("Post {day}"), "Рубрика", &format!("2025-06-0{day}"));
    }

    let (_, body) = get(build_router(state.clone()), "/api/posts?per_page=2&page=3", None).await;
    assert_eq!(body["total"], 5);
    assert_eq!(body["pages"], 3);
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);
    assert_eq!(body["posts"][0]["title"], "Post 1");

    let (status, _) = get(build_router(state), "/api/posts?per_page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Calendar, users, registry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn calendar_groups_by_day() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    add_post(&dir, "Early", "Видео", "2025-03-03T09:00");
    add_post(&dir, "Late", "Видео", "2025-03-03T18:00");
    add_post(&dir, "Other", "Видео", "2025-03-20");
    add_post(&dir, "April", "Видео", "2025-04-01");

    let (status, body) = get(build_router(state.clone()), "/api/calendar?year=2025&month=3", None).await;
    assert_eq!(status, StatusCode::OK);
    let days = body["days"].as_object().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days["3"][0]["title"], "Early");
    assert_eq!(days["3"][1]["title"], "Late");
    assert_eq!(days["20"][0]["title"], "Other");

    let (status, _) = get(build_router(state), "/api/calendar?year=2025&month=13", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn users_require_login_and_hide_hashes() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let anna = add_user(&dir, "anna", &[Role::Designer, Role::Smm]);
    add_user(&dir, "boss", &[Role::Admin]);

    let (status, _) = get(build_router(state.clone()), "/api/users", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = get(build_router(state.clone()), "/api/users", Some(&bearer(&state, &anna))).await;
    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["login"], "anna");
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[tokio::test]
async fn task_registry_lists_kinds_and_presets() {
    let dir = TempDir::new().unwrap();
    let state = init_workspace(&dir);
    let (status, body) = get(build_router(state), "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tasks"].as_array().unwrap().len(), 6);
    let text = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["kind"] == "text")
        .unwrap();
    assert!(text["owning_role"].is_null());
    assert_eq!(body["post_types"].as_array().unwrap().len(), 6);
}
