//! HTTP handlers for auth routes.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use eventboard_core::auth::{Session, SessionToken};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::extractors::session_token_from_headers;
use crate::AuthState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Session details returned to API clients.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Session,
}

/// Creates the auth router.
///
/// Routes:
/// - `POST /api/auth/login` - Sign in with email and password
/// - `POST /api/auth/logout` - End the current session
/// - `POST /api/auth/refresh` - Exchange a refresh token for a new session
/// - `GET /api/auth/session` - Get the current session
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/session", get(current_session))
}

/// Builds the HTTP-only session cookie for `token`.
pub fn session_cookie(config: &AuthConfig, token: &SessionToken) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token.to_string()))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(config.cookie_max_age())
        .build()
}

/// Builds a cookie that removes the session cookie when added to a jar.
pub fn removal_cookie(config: &AuthConfig) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone()).path("/").build()
}

async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), AuthError> {
    let session = state
        .facade
        .sign_in(&request.email, &request.password)
        .await?;

    let jar = jar.add(session_cookie(&state.config, &session.access_token));
    Ok((jar, Json(SessionResponse { session })))
}

async fn logout(
    State(state): State<AuthState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AuthError> {
    if let Some(token) = session_token_from_headers(&headers, &state.config.cookie_name) {
        state.facade.sign_out(&token).await?;
        state.mirror.remove(&token);
    }

    let jar = jar.remove(removal_cookie(&state.config));
    Ok((jar, StatusCode::NO_CONTENT))
}

async fn refresh(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(request): Json<RefreshRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), AuthError> {
    let session = state.facade.refresh_session(&request.refresh_token).await?;

    let jar = jar.add(session_cookie(&state.config, &session.access_token));
    Ok((jar, Json(SessionResponse { session })))
}

async fn current_session(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, (StatusCode, &'static str)> {
    let token = session_token_from_headers(&headers, &state.config.cookie_name)
        .ok_or((StatusCode::UNAUTHORIZED, "Not authenticated"))?;

    let session = state
        .resolve_session(&token)
        .await
        .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Session lookup failed"))?
        .ok_or((StatusCode::UNAUTHORIZED, "Session expired or not found"))?;

    Ok(Json(SessionResponse { session }))
}
