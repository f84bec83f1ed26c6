use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque access token identifying a session with the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an authenticated administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// Session issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: SessionToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: User,
    /// Absent when the provider does not report an expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Kind of authentication-state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthChangeKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

impl std::fmt::Display for AuthChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignedIn => write!(f, "signed_in"),
            Self::SignedOut => write!(f, "signed_out"),
            Self::TokenRefreshed => write!(f, "token_refreshed"),
        }
    }
}

/// Notification published whenever the authentication state changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthChange {
    pub kind: AuthChangeKind,
    /// Token the transition applies to. For a refresh this is the new token.
    pub token: SessionToken,
    pub session: Option<Session>,
    /// Refresh token spent to obtain `session`, for token_refreshed changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_refresh_token: Option<String>,
}

impl AuthChange {
    pub fn signed_in(session: Session) -> Self {
        Self {
            kind: AuthChangeKind::SignedIn,
            token: session.access_token.clone(),
            session: Some(session),
            consumed_refresh_token: None,
        }
    }

    pub fn signed_out(token: SessionToken) -> Self {
        Self {
            kind: AuthChangeKind::SignedOut,
            token,
            session: None,
            consumed_refresh_token: None,
        }
    }

    pub fn token_refreshed(session: Session, consumed_refresh_token: impl Into<String>) -> Self {
        Self {
            kind: AuthChangeKind::TokenRefreshed,
            token: session.access_token.clone(),
            session: Some(session),
            consumed_refresh_token: Some(consumed_refresh_token.into()),
        }
    }
}
