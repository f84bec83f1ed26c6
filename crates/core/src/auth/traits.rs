use async_trait::async_trait;

use super::{IdentityError, Session, SessionToken};

/// Result type for identity provider operations.
pub type Result<T> = std::result::Result<T, IdentityError>;

/// Abstraction over the hosted identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges an email/password pair for a session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    /// Invalidates a session. Unknown tokens are not an error.
    async fn sign_out(&self, token: &SessionToken) -> Result<()>;

    /// Looks up the session for an access token, if it is still live.
    async fn get_session(&self, token: &SessionToken) -> Result<Option<Session>>;

    /// Issues a new session from a refresh token.
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session>;
}
