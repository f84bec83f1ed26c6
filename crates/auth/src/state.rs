//! Application state for auth.

use std::sync::Arc;

use axum::extract::FromRef;
use chrono::Utc;
use eventboard_core::auth::{is_session_expired, IdentityProvider, Session, SessionToken};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::facade::{SessionFacade, Subscription};
use crate::mirror::SessionMirror;

/// Shared state for auth handlers and extractors.
#[derive(Clone)]
pub struct AuthState {
    pub facade: SessionFacade,
    pub mirror: SessionMirror,
    pub config: Arc<AuthConfig>,
    _subscription: Arc<Subscription>,
}

impl AuthState {
    /// Wires a façade over `provider` and keeps a session mirror in sync with it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(provider: Arc<dyn IdentityProvider>, config: AuthConfig) -> Self {
        let facade = SessionFacade::new(provider);
        let mirror = SessionMirror::new();

        let listener_mirror = mirror.clone();
        let subscription = facade.on_session_change(move |change| {
            listener_mirror.apply(change);
            tracing::debug!(
                kind = %change.kind,
                mirrored = listener_mirror.len(),
                "Session mirror updated"
            );
        });

        Self {
            facade,
            mirror,
            config: Arc::new(config),
            _subscription: Arc::new(subscription),
        }
    }

    /// Resolves a token to a live session, consulting the mirror first.
    ///
    /// Expired sessions are dropped from the mirror and reported as absent.
    pub async fn resolve_session(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Session>, AuthError> {
        let now = Utc::now();

        if let Some(session) = self.mirror.get(token) {
            if is_session_expired(&session, now) {
                self.mirror.remove(token);
                return Ok(None);
            }
            return Ok(Some(session));
        }

        match self.facade.get_current_session(token).await? {
            Some(session) if !is_session_expired(&session, now) => {
                self.mirror.insert(session.clone());
                Ok(Some(session))
            }
            _ => Ok(None),
        }
    }
}

/// Allows AuthState to be extracted from a parent state.
impl<S> FromRef<S> for AuthState
where
    S: AsRef<AuthState>,
{
    fn from_ref(state: &S) -> Self {
        state.as_ref().clone()
    }
}
