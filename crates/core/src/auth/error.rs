use thiserror::Error;

/// Failures reported by an identity provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Credentials were rejected. The message is shown to the user as-is.
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("session not found")]
    SessionNotFound,

    /// The provider accepted the request but returned no user or session.
    #[error("Authentication failed: No user or session returned")]
    MissingSession,

    #[error("provider error: {0}")]
    Provider(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl IdentityError {
    /// The provider's own message, without a category prefix.
    pub fn detail(&self) -> String {
        match self {
            IdentityError::SessionNotFound | IdentityError::MissingSession => self.to_string(),
            IdentityError::InvalidCredentials(msg)
            | IdentityError::Provider(msg)
            | IdentityError::Connection(msg)
            | IdentityError::Serialization(msg) => msg.trim().to_string(),
        }
    }
}
