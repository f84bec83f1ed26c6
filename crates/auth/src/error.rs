use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eventboard_core::auth::IdentityError;
use thiserror::Error;

/// Session operations, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    SignIn,
    SignOut,
    GetSession,
    RefreshSession,
}

impl AuthOperation {
    fn verb(&self) -> &'static str {
        match self {
            AuthOperation::SignIn => "sign in",
            AuthOperation::SignOut => "sign out",
            AuthOperation::GetSession => "get session",
            AuthOperation::RefreshSession => "refresh session",
        }
    }

    fn context(&self) -> &'static str {
        match self {
            AuthOperation::SignIn => "during sign in",
            AuthOperation::SignOut => "during sign out",
            AuthOperation::GetSession => "while getting session",
            AuthOperation::RefreshSession => "while refreshing session",
        }
    }
}

impl std::fmt::Display for AuthOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// Auth errors for the eventboard_auth crate.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credentials rejected by the provider; the message is shown verbatim.
    #[error("{0}")]
    Authentication(String),

    #[error("Failed to {operation}: {message}")]
    Failed {
        operation: AuthOperation,
        message: String,
    },

    #[error("An unexpected error occurred {}", .0.context())]
    Unexpected(AuthOperation),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// Normalizes a provider failure for the given operation.
    pub fn from_identity(operation: AuthOperation, error: IdentityError) -> Self {
        let message = error.detail();
        match error {
            IdentityError::InvalidCredentials(_) | IdentityError::MissingSession
                if !message.is_empty() =>
            {
                AuthError::Authentication(message)
            }
            _ if message.is_empty() => AuthError::Unexpected(operation),
            _ => AuthError::Failed { operation, message },
        }
    }

    /// HTTP status used when the error reaches a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AuthError::Failed { .. } => StatusCode::BAD_GATEWAY,
            AuthError::Unexpected(_) | AuthError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AuthError::Authentication(_) => {
                tracing::warn!("Authentication rejected: {}", self);
                self.to_string()
            }
            AuthError::Failed { .. } | AuthError::Unexpected(_) => {
                tracing::error!("Auth error: {}", self);
                self.to_string()
            }
            AuthError::Config(_) => {
                tracing::error!("Config error: {}", self);
                "Server configuration error".to_string()
            }
        };

        (status, message).into_response()
    }
}
