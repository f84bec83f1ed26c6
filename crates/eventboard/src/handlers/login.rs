//! Login page and sign-out.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use eventboard_auth::{removal_cookie, session_cookie, session_token_from_headers, OptionalUser};
use eventboard_core::auth::{safe_return_path, validate_login};

use super::flash::{redirect_with_flash, take_flash, FlashMessage};
use super::pages::HtmlTemplate;
use crate::state::AppState;

/// Where an authenticated user lands when no return path was requested.
pub const ADMIN_HOME: &str = "/admin";

#[derive(Deserialize, Default)]
pub struct LoginQuery {
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub return_to: Option<String>,
}

#[derive(Template, Default)]
#[template(path = "login.html")]
struct LoginTemplate {
    flash: Option<FlashMessage>,
    email: String,
    email_error: Option<String>,
    password_error: Option<String>,
    general_error: Option<String>,
    return_to: String,
}

fn destination(return_to: Option<&str>) -> &str {
    return_to.and_then(safe_return_path).unwrap_or(ADMIN_HOME)
}

/// Handler for GET /login
///
/// - Unauthenticated: renders the login form
/// - Authenticated: redirects to the requested page or the admin panel
pub async fn login_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<LoginQuery>,
    jar: CookieJar,
) -> Response {
    if user.is_some() {
        return Redirect::to(destination(query.return_to.as_deref())).into_response();
    }

    let (jar, flash) = take_flash(jar);
    let template = LoginTemplate {
        flash,
        return_to: query.return_to.unwrap_or_default(),
        ..LoginTemplate::default()
    };

    (jar, HtmlTemplate(template)).into_response()
}

/// Handler for POST /login
///
/// Validates the form locally before asking the identity provider. Provider
/// rejections are shown verbatim above the form.
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let return_to = form.return_to.clone().unwrap_or_default();

    let errors = validate_login(&form.email, &form.password);
    if !errors.is_empty() {
        let template = LoginTemplate {
            flash: None,
            email: form.email,
            email_error: errors.email,
            password_error: errors.password,
            general_error: None,
            return_to,
        };
        return (StatusCode::UNPROCESSABLE_ENTITY, HtmlTemplate(template)).into_response();
    }

    match state.auth.facade.sign_in(&form.email, &form.password).await {
        Ok(session) => {
            let jar = jar.add(session_cookie(&state.auth.config, &session.access_token));
            let target = destination(form.return_to.as_deref()).to_string();
            (jar, Redirect::to(&target)).into_response()
        }
        Err(err) => {
            tracing::warn!(error = %err, "Login rejected");
            let template = LoginTemplate {
                flash: None,
                email: form.email,
                email_error: None,
                password_error: None,
                general_error: Some(err.to_string()),
                return_to,
            };
            (err.status_code(), HtmlTemplate(template)).into_response()
        }
    }
}

/// Handler for POST /logout
///
/// Ends the session behind the request's token and clears the cookie. A
/// provider failure keeps the session and reports back on the admin panel.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap, jar: CookieJar) -> Response {
    if let Some(token) = session_token_from_headers(&headers, &state.auth.config.cookie_name) {
        if let Err(err) = state.auth.facade.sign_out(&token).await {
            tracing::error!(error = %err, "Sign out failed");
            return redirect_with_flash(ADMIN_HOME, FlashMessage::error("Failed to sign out"));
        }
        state.auth.mirror.remove(&token);
    }

    let jar = jar.remove(removal_cookie(&state.auth.config));
    (
        jar,
        redirect_with_flash("/login", FlashMessage::info("You have been signed out")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_defaults_to_admin() {
        assert_eq!(destination(None), "/admin");
        assert_eq!(destination(Some("")), "/admin");
    }

    #[test]
    fn test_destination_rejects_external_targets() {
        assert_eq!(destination(Some("/admin/events/new")), "/admin/events/new");
        assert_eq!(destination(Some("//evil.example")), "/admin");
        assert_eq!(destination(Some("https://evil.example")), "/admin");
    }
}
