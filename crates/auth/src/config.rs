use std::time::Duration;

use url::Url;

use crate::error::AuthError;

/// Credentials accepted by the in-memory identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
}

/// Connection details for a hosted GoTrue-compatible identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedIdentityConfig {
    pub url: Url,
    pub api_key: String,
}

/// Complete auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub accounts: Vec<AdminAccount>,
    pub hosted: Option<HostedIdentityConfig>,
    pub session_ttl: Duration,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            hosted: None,
            session_ttl: Duration::from_secs(24 * 60 * 60),
            cookie_name: "session".to_string(),
            cookie_secure: true,
        }
    }
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ADMIN_EMAIL` / `ADMIN_PASSWORD`: account for the in-memory provider (both or neither)
    /// - `IDENTITY_URL` / `IDENTITY_API_KEY`: hosted identity service (both or neither)
    /// - `SESSION_TTL_HOURS`: Session TTL in hours (default: 24)
    /// - `COOKIE_SECURE`: Whether to set secure flag on cookies (default: true)
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Config` if a pair is only half set or `IDENTITY_URL`
    /// is not a valid URL.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuthError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let accounts = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => vec![AdminAccount {
                email: email.trim().to_string(),
                password,
            }],
            (None, None) => Vec::new(),
            _ => {
                return Err(AuthError::Config(
                    "ADMIN_EMAIL and ADMIN_PASSWORD must be set together".to_string(),
                ))
            }
        };

        let hosted = match (get("IDENTITY_URL"), get("IDENTITY_API_KEY")) {
            (Some(url), Some(api_key)) => Some(HostedIdentityConfig {
                url: url
                    .parse()
                    .map_err(|e| AuthError::Config(format!("IDENTITY_URL: {e}")))?,
                api_key,
            }),
            (None, None) => None,
            _ => {
                return Err(AuthError::Config(
                    "IDENTITY_URL and IDENTITY_API_KEY must be set together".to_string(),
                ))
            }
        };

        let session_ttl = get("SESSION_TTL_HOURS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|hours| *hours > 0)
            .map(|hours| Duration::from_secs(hours * 60 * 60))
            .unwrap_or(defaults.session_ttl);

        let cookie_secure = get("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(defaults.cookie_secure);

        Ok(Self {
            accounts,
            hosted,
            session_ttl,
            cookie_name: defaults.cookie_name,
            cookie_secure,
        })
    }

    /// Session lifetime as a cookie max-age.
    pub fn cookie_max_age(&self) -> time::Duration {
        time::Duration::seconds(self.session_ttl.as_secs() as i64)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AuthConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.accounts.is_empty());
        assert!(config.hosted.is_none());
        assert_eq!(config.session_ttl, Duration::from_secs(86_400));
        assert_eq!(config.cookie_name, "session");
        assert!(config.cookie_secure);
    }

    #[test]
    fn test_admin_account_and_overrides() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("ADMIN_EMAIL", " admin@example.com "),
            ("ADMIN_PASSWORD", "hunter2"),
            ("SESSION_TTL_HOURS", "2"),
            ("COOKIE_SECURE", "false"),
        ]))
        .unwrap();

        assert_eq!(
            config.accounts,
            vec![AdminAccount {
                email: "admin@example.com".to_string(),
                password: "hunter2".to_string(),
            }]
        );
        assert_eq!(config.session_ttl, Duration::from_secs(7_200));
        assert!(!config.cookie_secure);
        assert_eq!(config.cookie_max_age(), time::Duration::hours(2));
    }

    #[test]
    fn test_hosted_identity() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("IDENTITY_URL", "https://project.example.co"),
            ("IDENTITY_API_KEY", "anon-key"),
        ]))
        .unwrap();

        let hosted = config.hosted.unwrap();
        assert_eq!(hosted.url.as_str(), "https://project.example.co/");
        assert_eq!(hosted.api_key, "anon-key");
    }

    #[test]
    fn test_half_configured_pairs_are_rejected() {
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[("ADMIN_EMAIL", "a@b.c")])),
            Err(AuthError::Config(_))
        ));
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[("IDENTITY_API_KEY", "key")])),
            Err(AuthError::Config(_))
        ));
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[
                ("IDENTITY_URL", "not a url"),
                ("IDENTITY_API_KEY", "key")
            ])),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_ttl_falls_back_to_default() {
        let config =
            AuthConfig::from_lookup(lookup(&[("SESSION_TTL_HOURS", "forever")])).unwrap();
        assert_eq!(config.session_ttl, Duration::from_secs(86_400));
    }
}
