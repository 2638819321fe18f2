use crate::auth::session::SessionStore;
use crate::db::sqlite::Storage;
use crate::handlers::{active, admin};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(storage: Storage, sessions: Arc<SessionStore>) -> Self {
        Self { storage, sessions }
    }
}

pub fn numgen_router(state: AppState) -> Router {
    Router::new()
        .route("/api/test", get(active::test))
        .route("/api/active", get(active::get_active))
        .route("/api/generate", post(active::generate))
        .route("/api/history", get(active::history))
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/logout", post(admin::logout))
        .route("/api/admin/active", post(admin::set_active))
        .route("/api/admin/check", get(admin::check))
        .with_state(state)
}
