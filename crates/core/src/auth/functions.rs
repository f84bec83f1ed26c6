use chrono::{DateTime, Duration, Utc};
use rand::{distr::Alphanumeric, Rng};

use super::{Session, SessionToken};

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a random 32 character access token.
pub fn generate_session_token() -> SessionToken {
    SessionToken::new(random_alphanumeric(32))
}

/// Generate a random 48 character refresh token.
pub fn generate_refresh_token() -> String {
    random_alphanumeric(48)
}

/// Check if a session has expired. Sessions without an expiry never do.
pub fn is_session_expired(session: &Session, now: DateTime<Utc>) -> bool {
    session.expires_at.is_some_and(|expires_at| expires_at <= now)
}

/// Calculate session expiry from creation time and TTL.
pub fn calculate_expiry(created_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    created_at + ttl
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::User;

    fn session(expires_at: Option<DateTime<Utc>>) -> Session {
        Session {
            access_token: generate_session_token(),
            refresh_token: None,
            user: User {
                id: "user-1".to_string(),
                email: "admin@example.com".to_string(),
            },
            expires_at,
        }
    }

    #[test]
    fn generate_session_token_produces_32_char_alphanumeric() {
        let token = generate_session_token();
        assert_eq!(token.as_str().len(), 32);
        assert!(token.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_tokens_are_unique() {
        assert_ne!(generate_session_token(), generate_session_token());
        assert_ne!(generate_refresh_token(), generate_refresh_token());
    }

    #[test]
    fn is_session_expired_returns_false_for_future_expiry() {
        let now = Utc::now();
        assert!(!is_session_expired(&session(Some(now + Duration::hours(1))), now));
    }

    #[test]
    fn is_session_expired_returns_true_at_exact_expiry() {
        let now = Utc::now();
        assert!(is_session_expired(&session(Some(now)), now));
    }

    #[test]
    fn session_without_expiry_never_expires() {
        assert!(!is_session_expired(&session(None), Utc::now()));
    }

    #[test]
    fn calculate_expiry_adds_ttl_to_created_at() {
        let created = Utc::now();
        let ttl = Duration::hours(24);
        assert_eq!(calculate_expiry(created, ttl), created + ttl);
    }
}
