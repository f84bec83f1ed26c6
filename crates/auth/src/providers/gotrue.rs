//! Hosted identity provider speaking the GoTrue REST protocol.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header::AUTHORIZATION, StatusCode};
use serde::Deserialize;
use url::Url;

use eventboard_core::auth::{IdentityError, IdentityProvider, Result, Session, SessionToken, User};

use crate::config::HostedIdentityConfig;

/// Client for a GoTrue-compatible `/auth/v1` API.
#[derive(Debug, Clone)]
pub struct GoTrueProvider {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<GoTrueUser> for User {
    fn from(user: GoTrueUser) -> Self {
        User {
            id: user.id,
            email: user.email.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    user: Option<GoTrueUser>,
}

impl TokenResponse {
    fn into_session(self) -> Result<Session> {
        let (Some(access_token), Some(user)) = (self.access_token, self.user) else {
            return Err(IdentityError::MissingSession);
        };

        Ok(Session {
            access_token: SessionToken::new(access_token),
            refresh_token: self.refresh_token,
            user: user.into(),
            expires_at: self
                .expires_at
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> String {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
            .unwrap_or_default()
    }
}

fn transport_error(err: reqwest::Error) -> IdentityError {
    if err.is_connect() || err.is_timeout() {
        IdentityError::Connection(err.to_string())
    } else {
        IdentityError::Provider(err.to_string())
    }
}

impl GoTrueProvider {
    pub fn new(config: &HostedIdentityConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| IdentityError::Provider(format!("invalid identity URL: {e}")))
    }

    /// Reads the provider's error message from a failed response.
    async fn error_message(response: reqwest::Response) -> String {
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorBody>(&text)
            .map(ErrorBody::into_message)
            .unwrap_or(text)
    }

    async fn token_grant(&self, grant_type: &str, body: serde_json::Value) -> Result<Session> {
        let response = self
            .client
            .post(self.url("auth/v1/token")?)
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<TokenResponse>()
                .await
                .map_err(|e| IdentityError::Serialization(e.to_string()))?
                .into_session()
        } else if status.is_client_error() {
            Err(IdentityError::InvalidCredentials(
                Self::error_message(response).await,
            ))
        } else {
            Err(IdentityError::Provider(Self::error_message(response).await))
        }
    }
}

#[async_trait]
impl IdentityProvider for GoTrueProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        self.token_grant(
            "password",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<()> {
        let response = self
            .client
            .post(self.url("auth/v1/logout")?)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success()
            || status == StatusCode::UNAUTHORIZED
            || status == StatusCode::NOT_FOUND
        {
            Ok(())
        } else {
            Err(IdentityError::Provider(Self::error_message(response).await))
        }
    }

    async fn get_session(&self, token: &SessionToken) -> Result<Option<Session>> {
        let response = self
            .client
            .get(self.url("auth/v1/user")?)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            let user = response
                .json::<GoTrueUser>()
                .await
                .map_err(|e| IdentityError::Serialization(e.to_string()))?;
            Ok(Some(Session {
                access_token: token.clone(),
                refresh_token: None,
                user: user.into(),
                expires_at: None,
            }))
        } else if [
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
        ]
        .contains(&status)
        {
            Ok(None)
        } else {
            Err(IdentityError::Provider(Self::error_message(response).await))
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session> {
        self.token_grant(
            "refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }
}
