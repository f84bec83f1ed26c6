//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
};
use axum_extra::extract::CookieJar;
use eventboard_core::auth::{SessionToken, User};

use crate::AuthState;

/// Reads the session token from the `Authorization: Bearer` header, falling
/// back to the session cookie.
pub fn session_token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<SessionToken> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(SessionToken::new(token));
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
        .map(SessionToken::new)
}

/// Extractor for authenticated user. Returns 401 if not authenticated.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let token = session_token_from_headers(&parts.headers, &auth_state.config.cookie_name)
            .ok_or((StatusCode::UNAUTHORIZED, "Not authenticated"))?;

        let session = auth_state
            .resolve_session(&token)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Session lookup failed"))?
            .ok_or((StatusCode::UNAUTHORIZED, "Session expired or not found"))?;

        Ok(CurrentUser(session.user))
    }
}

/// Extractor for optionally authenticated user. Returns None if not authenticated.
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let Some(token) =
            session_token_from_headers(&parts.headers, &auth_state.config.cookie_name)
        else {
            return Ok(OptionalUser(None));
        };

        match auth_state.resolve_session(&token).await {
            Ok(session) => Ok(OptionalUser(session.map(|s| s.user))),
            Err(err) => {
                tracing::warn!("Session lookup failed: {}", err);
                Ok(OptionalUser(None))
            }
        }
    }
}
