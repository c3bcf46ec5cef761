//! Registration and cookie login/logout.

use crate::{
    errors::AppError, handlers::session::SESSION_COOKIE, models::user::User, state::AppState,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CredentialsReq {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
}

/// POST `/account/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsReq>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state.auth.register(&req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST `/account/login`: sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<CredentialsReq>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let session = state.auth.login(&req.email, &req.password).await?;
    let cookie = Cookie::build((SESSION_COOKIE, session.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            user_id: session.user_id,
        }),
    ))
}

/// POST `/account/logout`: always succeeds, even without a live session.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.auth.logout(cookie.value()).await?;
    }
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    Ok((jar, StatusCode::NO_CONTENT))
}
