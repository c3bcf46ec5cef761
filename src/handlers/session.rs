//! Session-cookie extractors used at the request boundary.

use crate::{errors::AppError, state::AppState};
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Authenticated caller. Rejects with 401 when the cookie is missing or the
/// session is unknown or expired.
#[derive(Debug)]
pub struct CurrentUser {
    pub user_id: Uuid,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts).ok_or_else(|| AppError::unauthorized("login required"))?;
        let user_id = state
            .auth
            .verify(&token)
            .await?
            .ok_or_else(|| AppError::unauthorized("session is invalid or expired"))?;
        Ok(Self { user_id })
    }
}

/// Like [`CurrentUser`] but anonymous callers pass through as `None`.
#[derive(Debug)]
pub struct MaybeUser(pub Option<Uuid>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match session_token(parts) {
            Some(token) => Ok(Self(state.auth.verify(&token).await?)),
            None => Ok(Self(None)),
        }
    }
}

fn session_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}
