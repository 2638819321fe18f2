use crate::auth::guard::{AdminSession, bearer_from_headers};
use crate::auth::password;
use crate::db::models::ActiveValue;
use crate::error::NumgenError;
use crate::router::AppState;
use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/admin/login -> `{ok, username, token}`.
///
/// Unknown user and wrong password take the same path out: identical status,
/// identical body, and the unknown-user branch burns an argon2 hash so the
/// two are not separable by timing either.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, NumgenError> {
    let (Some(username), Some(password)) = (body.username, body.password) else {
        return Err(NumgenError::Validation(
            "Username and password required".to_string(),
        ));
    };

    let Some(admin) = state.storage.admin_by_username(&username).await? else {
        let _ = password::hash(&password);
        warn!("login failed");
        return Err(NumgenError::InvalidCredentials);
    };

    if !password::verify(&password, &admin.password_hash)? {
        warn!("login failed");
        return Err(NumgenError::InvalidCredentials);
    }

    let token = state.sessions.create(admin.id, &admin.username);
    info!(username = %admin.username, "admin logged in");

    Ok(Json(json!({
        "ok": true,
        "username": admin.username,
        "token": token,
    })))
}

/// POST /api/admin/logout -> `{ok:true}`. Removing the session twice is fine;
/// the second call just finds nothing to delete.
pub async fn logout(State(state): State<AppState>, auth: AdminSession) -> Json<Value> {
    state.sessions.remove(&auth.token);
    info!(username = %auth.session.username, "admin logged out");
    Json(json!({ "ok": true }))
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub value: Option<Value>,
}

/// POST /api/admin/active -> `{ok, value, updatedAt}`. The guard has already
/// authenticated; a 401 can never leave a partial write behind because the
/// handler body is never entered.
pub async fn set_active(
    State(state): State<AppState>,
    auth: AdminSession,
    Json(body): Json<SetActiveRequest>,
) -> Result<Json<Value>, NumgenError> {
    let value = parse_integer(body.value.as_ref())?;
    let ActiveValue { value, updated_at } = state.storage.set_active(value).await?;
    info!(username = %auth.session.username, value = value.unwrap_or_default(), "active value updated");

    Ok(Json(json!({
        "ok": true,
        "value": value,
        "updatedAt": updated_at,
    })))
}

/// GET /api/admin/check -> `{authenticated, username?}`. Reports rather than
/// requires: an anonymous caller gets `authenticated: false`, not a 401.
pub async fn check(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let session = bearer_from_headers(&headers).and_then(|token| state.sessions.get(&token));
    match session {
        Some(session) => Json(json!({
            "authenticated": true,
            "username": session.username,
        })),
        None => Json(json!({ "authenticated": false })),
    }
}

/// The admin frontend submits `value` as either a JSON number or a numeric
/// string; anything else is malformed input.
fn parse_integer(value: Option<&Value>) -> Result<i64, NumgenError> {
    let malformed = || NumgenError::Validation("Value must be an integer".to_string());
    match value {
        Some(Value::Number(n)) => n.as_i64().ok_or_else(malformed),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| malformed()),
        _ => Err(malformed()),
    }
}
