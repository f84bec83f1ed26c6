use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use eventboard_core::auth::{
    is_session_expired, AuthChange, AuthChangeKind, Session, SessionToken,
};

/// Local copy of the sessions the façade has announced, keyed by access token.
///
/// Kept current by a session-change listener; request extractors consult it
/// before asking the identity provider. Only sessions with a known expiry are
/// kept, so a session the provider cannot date is re-checked on every request.
/// Expired entries are pruned whenever a session is stored.
#[derive(Debug, Clone, Default)]
pub struct SessionMirror {
    sessions: Arc<RwLock<HashMap<SessionToken, Session>>>,
}

impl SessionMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a published session change.
    pub fn apply(&self, change: &AuthChange) {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match change.kind {
            AuthChangeKind::SignedIn | AuthChangeKind::TokenRefreshed => {
                if let Some(consumed) = &change.consumed_refresh_token {
                    sessions.retain(|_, s| s.refresh_token.as_ref() != Some(consumed));
                }
                if let Some(session) = &change.session {
                    store(&mut sessions, session.clone(), Utc::now());
                }
            }
            AuthChangeKind::SignedOut => {
                sessions.remove(&change.token);
            }
        }
    }

    pub fn get(&self, token: &SessionToken) -> Option<Session> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }

    /// Stores `session` if it carries an expiry and returns whether it was kept.
    pub fn insert(&self, session: Session) -> bool {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        store(&mut sessions, session, Utc::now())
    }

    pub fn remove(&self, token: &SessionToken) -> Option<Session> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn store(
    sessions: &mut HashMap<SessionToken, Session>,
    session: Session,
    now: DateTime<Utc>,
) -> bool {
    sessions.retain(|_, s| !is_session_expired(s, now));

    if session.expires_at.is_none() || is_session_expired(&session, now) {
        return false;
    }
    sessions.insert(session.access_token.clone(), session);
    true
}
