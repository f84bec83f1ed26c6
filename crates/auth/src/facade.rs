//! Session façade over an [`IdentityProvider`].
//!
//! Every operation is a single pass-through call to the provider. Failures
//! are normalized into [`AuthError`] and every authentication-state
//! transition is published on a broadcast channel so that listeners (the
//! session mirror, loggers) can follow along.

use std::sync::Arc;

use eventboard_core::auth::{AuthChange, IdentityProvider, Session, SessionToken};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::error::{AuthError, AuthOperation};

/// Default channel capacity for session-change notifications.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

#[derive(Clone)]
pub struct SessionFacade {
    provider: Arc<dyn IdentityProvider>,
    changes: broadcast::Sender<AuthChange>,
}

impl SessionFacade {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (changes, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self { provider, changes }
    }

    fn publish(&self, change: AuthChange) {
        tracing::debug!(kind = %change.kind, "Publishing session change");
        // No receivers is not an error.
        let _ = self.changes.send(change);
    }

    /// Signs in with email and password.
    ///
    /// Credential rejections surface the provider's message unchanged.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self
            .provider
            .sign_in_with_password(email.trim(), password)
            .await
            .map_err(|e| AuthError::from_identity(AuthOperation::SignIn, e))?;

        tracing::info!(user = %session.user.email, "Signed in");
        self.publish(AuthChange::signed_in(session.clone()));
        Ok(session)
    }

    /// Invalidates the session identified by `token`.
    pub async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError> {
        self.provider
            .sign_out(token)
            .await
            .map_err(|e| AuthError::from_identity(AuthOperation::SignOut, e))?;

        tracing::info!("Signed out");
        self.publish(AuthChange::signed_out(token.clone()));
        Ok(())
    }

    /// Asks the provider for the session behind `token`.
    ///
    /// A token the provider no longer recognizes is published as signed out.
    pub async fn get_current_session(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Session>, AuthError> {
        let session = self
            .provider
            .get_session(token)
            .await
            .map_err(|e| AuthError::from_identity(AuthOperation::GetSession, e))?;

        if session.is_none() {
            self.publish(AuthChange::signed_out(token.clone()));
        }
        Ok(session)
    }

    /// Exchanges a refresh token for a new session.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let session = self
            .provider
            .refresh_session(refresh_token)
            .await
            .map_err(|e| AuthError::from_identity(AuthOperation::RefreshSession, e))?;

        tracing::info!(user = %session.user.email, "Session refreshed");
        self.publish(AuthChange::token_refreshed(session.clone(), refresh_token));
        Ok(session)
    }

    /// Raw receiver of session changes published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.changes.subscribe()
    }

    /// Invokes `listener` for every session change until the returned
    /// [`Subscription`] is unsubscribed or dropped.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn on_session_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AuthChange) + Send + Sync + 'static,
    {
        let mut receiver = self.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(change) => listener(&change),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Session listener lagged behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        Subscription { handle }
    }
}

/// Handle for a listener registered with [`SessionFacade::on_session_change`].
#[derive(Debug)]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Stops delivering changes to the listener.
    pub fn unsubscribe(self) {
        drop(self);
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Duration as ChronoDuration;
    use eventboard_core::auth::AuthChangeKind;
    use tokio::sync::mpsc;

    use super::*;
    use crate::providers::MemoryIdentityProvider;

    fn facade() -> SessionFacade {
        let provider = MemoryIdentityProvider::new(ChronoDuration::hours(1))
            .with_account("admin@example.com", "secret");
        SessionFacade::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_sign_in_publishes_signed_in() {
        let facade = facade();
        let mut changes = facade.subscribe();

        let session = facade
            .sign_in(" admin@example.com ", "secret")
            .await
            .unwrap();

        let change = changes.recv().await.unwrap();
        assert_eq!(change.kind, AuthChangeKind::SignedIn);
        assert_eq!(change.token, session.access_token);
        assert_eq!(change.session, Some(session));
    }

    #[tokio::test]
    async fn test_rejected_sign_in_is_verbatim_and_silent() {
        let facade = facade();
        let mut changes = facade.subscribe();

        let err = facade
            .sign_in("admin@example.com", "nope")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid login credentials");
        assert!(changes.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sign_out_publishes_signed_out() {
        let facade = facade();
        let session = facade.sign_in("admin@example.com", "secret").await.unwrap();
        let mut changes = facade.subscribe();

        facade.sign_out(&session.access_token).await.unwrap();

        let change = changes.recv().await.unwrap();
        assert_eq!(change.kind, AuthChangeKind::SignedOut);
        assert_eq!(change.token, session.access_token);
        assert!(facade
            .get_current_session(&session.access_token)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_refresh_publishes_token_refreshed() {
        let facade = facade();
        let session = facade.sign_in("admin@example.com", "secret").await.unwrap();
        let refresh_token = session.refresh_token.clone().unwrap();
        let mut changes = facade.subscribe();

        let refreshed = facade.refresh_session(&refresh_token).await.unwrap();

        let change = changes.recv().await.unwrap();
        assert_eq!(change.kind, AuthChangeKind::TokenRefreshed);
        assert_eq!(change.token, refreshed.access_token);
        assert_eq!(change.consumed_refresh_token, Some(refresh_token));
    }

    #[tokio::test]
    async fn test_listener_receives_changes_until_unsubscribed() {
        let facade = facade();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscription = facade.on_session_change(move |change| {
            let _ = tx.send(change.kind);
        });
        assert!(subscription.is_active());

        let session = facade.sign_in("admin@example.com", "secret").await.unwrap();
        assert_eq!(rx.recv().await, Some(AuthChangeKind::SignedIn));

        subscription.unsubscribe();
        facade.sign_out(&session.access_token).await.unwrap();

        // The listener task is gone, so its sender is dropped without a second delivery.
        let next = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await;
        assert_eq!(next.unwrap(), None);
    }
}
