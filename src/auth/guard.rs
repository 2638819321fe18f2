use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};

use crate::auth::session::Session;
use crate::error::NumgenError;
use crate::router::AppState;

/// Extractor guarding admin routes: a handler taking `AdminSession` never
/// runs without a live session, so a failed authentication can never leave a
/// mutation half-done.
///
/// Credential transport is the `Authorization: Bearer <token>` header, and
/// only that header, on every admin route.
pub struct AdminSession {
    pub token: String,
    pub session: Session,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = NumgenError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| NumgenError::Unauthorized)?;

        let session = state
            .sessions
            .get(bearer.token())
            .ok_or(NumgenError::Unauthorized)?;

        Ok(Self {
            token: bearer.token().to_string(),
            session,
        })
    }
}

/// Best-effort bearer extraction for routes that report auth state instead
/// of requiring it (`/api/admin/check`).
pub fn bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    let auth = headers.get("authorization")?.to_str().ok()?.trim();
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .map(|token| token.to_string())
}
