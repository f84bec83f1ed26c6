//! In-memory identity provider for development and testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use eventboard_core::auth::{
    calculate_expiry, generate_refresh_token, generate_session_token, is_session_expired,
    IdentityError, IdentityProvider, Result, Session, SessionToken, User,
};

use crate::config::AuthConfig;

const INVALID_CREDENTIALS: &str = "Invalid login credentials";
const INVALID_REFRESH_TOKEN: &str = "Invalid Refresh Token: Refresh Token Not Found";

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

/// Identity provider backed by a fixed set of accounts.
///
/// Sessions live in `Arc<RwLock<_>>` maps and are lost when the provider is dropped.
#[derive(Debug, Clone)]
pub struct MemoryIdentityProvider {
    accounts: Arc<HashMap<String, Account>>,
    sessions: Arc<RwLock<HashMap<SessionToken, Session>>>,
    refresh_tokens: Arc<RwLock<HashMap<String, SessionToken>>>,
    ttl: Duration,
}

impl MemoryIdentityProvider {
    /// Creates a provider with no accounts.
    pub fn new(ttl: Duration) -> Self {
        Self {
            accounts: Arc::new(HashMap::new()),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            refresh_tokens: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Creates a provider holding the accounts listed in the configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        let ttl = Duration::seconds(config.session_ttl.as_secs() as i64);
        config
            .accounts
            .iter()
            .fold(Self::new(ttl), |provider, account| {
                provider.with_account(&account.email, &account.password)
            })
    }

    /// Registers an account. Emails are matched case-insensitively.
    pub fn with_account(mut self, email: &str, password: &str) -> Self {
        let email = email.trim().to_lowercase();
        let account = Account {
            user: User {
                id: uuid::Uuid::new_v4().to_string(),
                email: email.clone(),
            },
            password: password.to_string(),
        };
        Arc::make_mut(&mut self.accounts).insert(email, account);
        self
    }

    async fn issue_session(&self, user: User) -> Session {
        let session = Session {
            access_token: generate_session_token(),
            refresh_token: Some(generate_refresh_token()),
            user,
            expires_at: Some(calculate_expiry(Utc::now(), self.ttl)),
        };

        self.sessions
            .write()
            .await
            .insert(session.access_token.clone(), session.clone());
        if let Some(refresh_token) = &session.refresh_token {
            self.refresh_tokens
                .write()
                .await
                .insert(refresh_token.clone(), session.access_token.clone());
        }

        session
    }

    async fn remove_session(&self, token: &SessionToken) -> Option<Session> {
        let removed = self.sessions.write().await.remove(token);
        if let Some(refresh_token) = removed.as_ref().and_then(|s| s.refresh_token.as_ref()) {
            self.refresh_tokens.write().await.remove(refresh_token);
        }
        removed
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let account = self
            .accounts
            .get(&email.trim().to_lowercase())
            .filter(|account| account.password == password)
            .ok_or_else(|| IdentityError::InvalidCredentials(INVALID_CREDENTIALS.to_string()))?;

        Ok(self.issue_session(account.user.clone()).await)
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<()> {
        self.remove_session(token).await;
        Ok(())
    }

    async fn get_session(&self, token: &SessionToken) -> Result<Option<Session>> {
        let session = self.sessions.read().await.get(token).cloned();
        match session {
            Some(session) if is_session_expired(&session, Utc::now()) => {
                self.remove_session(token).await;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session> {
        let previous = self
            .refresh_tokens
            .write()
            .await
            .remove(refresh_token)
            .ok_or_else(|| IdentityError::InvalidCredentials(INVALID_REFRESH_TOKEN.to_string()))?;

        let session = self
            .sessions
            .write()
            .await
            .remove(&previous)
            .ok_or(IdentityError::SessionNotFound)?;

        Ok(self.issue_session(session.user).await)
    }
}
