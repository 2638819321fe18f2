use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

use numgen::auth::{password, session::SessionStore};
use numgen::db::Storage;
use numgen::router::{AppState, numgen_router};

fn temp_db_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("numgen-{tag}-{}-{}.sqlite", std::process::id(), nanos));
    path
}

async fn test_app_with_ttl(tag: &str, ttl: chrono::Duration) -> (Router, PathBuf) {
    let db_path = temp_db_path(tag);
    let database_url = format!("sqlite:{}", db_path.display());
    let storage = Storage::connect(&database_url)
        .await
        .expect("failed to open test database");

    let hash = password::hash("admin123").expect("failed to hash test password");
    storage
        .seed_admin("admin", &hash)
        .await
        .expect("failed to seed test admin");

    let sessions = Arc::new(SessionStore::new(ttl));
    let app = numgen_router(AppState::new(storage, sessions));
    (app, db_path)
}

async fn test_app(tag: &str) -> (Router, PathBuf) {
    test_app_with_ttl(tag, chrono::Duration::hours(24)).await
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let resp = app
        .clone()
        .oneshot(builder.body(body).expect("failed to build request"))
        .await
        .expect("request failed");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = serde_json::from_slice(&bytes).expect("response body was not JSON");
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/admin/login",
        None,
        Some(r#"{"username":"admin","password":"admin123"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["username"], "admin");
    body["token"].as_str().expect("login returned no token").to_string()
}

#[tokio::test]
async fn full_admin_flow() {
    let (app, db_path) = test_app("full-flow").await;

    // fresh database: no active value yet
    let (status, body) = request(&app, "GET", "/api/active", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], Value::Null);

    let token = login(&app).await;

    // the admin frontend sends the value as a string
    let (status, body) = request(
        &app,
        "POST",
        "/api/admin/active",
        Some(&token),
        Some(r#"{"value":"42"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["value"], 42);
    assert!(body["updatedAt"].is_string());

    let (status, body) = request(&app, "GET", "/api/active", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], 42);

    let (status, body) = request(&app, "POST", "/api/generate", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], 42);
    assert!(body["generatedAt"].is_string());

    let (status, body) = request(&app, "GET", "/api/history?limit=1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().expect("history was not an array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["value"], 42);
    assert_eq!(entries[0]["actor"], "user");
    assert!(entries[0]["timestamp"].is_string());

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn generate_before_any_set_returns_400() {
    let (app, db_path) = test_app("generate-unset").await;

    let (status, body) = request(&app, "POST", "/api/generate", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Active value not set");

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn set_active_requires_a_session() {
    let (app, db_path) = test_app("set-unauthed").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/admin/active",
        None,
        Some(r#"{"value":1}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = request(
        &app,
        "POST",
        "/api/admin/active",
        Some("deadbeef"),
        Some(r#"{"value":1}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // the rejected mutation must not have touched the config row
    let (_, body) = request(&app, "GET", "/api/active", None, None).await;
    assert_eq!(body["value"], Value::Null);

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (app, db_path) = test_app("login-fail").await;

    let (wrong_pw_status, wrong_pw_body) = request(
        &app,
        "POST",
        "/api/admin/login",
        None,
        Some(r#"{"username":"admin","password":"wrong"}"#),
    )
    .await;
    let (no_user_status, no_user_body) = request(
        &app,
        "POST",
        "/api/admin/login",
        None,
        Some(r#"{"username":"nosuchuser","password":"x"}"#),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(no_user_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body, no_user_body);

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn login_with_missing_fields_returns_400() {
    let (app, db_path) = test_app("login-missing").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/admin/login",
        None,
        Some(r#"{"username":"admin"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username and password required");

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn set_active_rejects_non_integer_values() {
    let (app, db_path) = test_app("set-invalid").await;
    let token = login(&app).await;

    for payload in [r#"{"value":"abc"}"#, r#"{"value":4.2}"#, r#"{}"#] {
        let (status, body) = request(
            &app,
            "POST",
            "/api/admin/active",
            Some(&token),
            Some(payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {payload}");
        assert_eq!(body["error"], "Value must be an integer");
    }

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let (app, db_path) = test_app("logout").await;
    let token = login(&app).await;

    let (status, body) = request(&app, "POST", "/api/admin/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, _) = request(
        &app,
        "POST",
        "/api/admin/active",
        Some(&token),
        Some(r#"{"value":1}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = request(&app, "GET", "/api/admin/check", Some(&token), None).await;
    assert_eq!(body["authenticated"], false);

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn check_reports_authentication_state() {
    let (app, db_path) = test_app("check").await;

    let (status, body) = request(&app, "GET", "/api/admin/check", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);

    let token = login(&app).await;
    let (status, body) = request(&app, "GET", "/api/admin/check", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["username"], "admin");

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn history_limit_bounds_and_orders_entries() {
    let (app, db_path) = test_app("history-limit").await;
    let token = login(&app).await;

    for v in 1..=5 {
        let (status, _) = request(
            &app,
            "POST",
            "/api/admin/active",
            Some(&token),
            Some(&format!(r#"{{"value":{v}}}"#)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = request(&app, "GET", "/api/history?limit=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().expect("history was not an array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["value"], 5);
    assert_eq!(entries[1]["value"], 4);
    assert_eq!(entries[0]["actor"], "admin");

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn expired_sessions_are_rejected() {
    // sessions are born expired with a negative TTL
    let (app, db_path) = test_app_with_ttl("expired", chrono::Duration::seconds(-1)).await;
    let token = login(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/admin/active",
        Some(&token),
        Some(r#"{"value":1}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = request(&app, "GET", "/api/admin/check", Some(&token), None).await;
    assert_eq!(body["authenticated"], false);

    let _ = fs::remove_file(&db_path);
}
