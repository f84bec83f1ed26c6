use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to SQLite database file (default: "eventboard.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    pub sqlite_path: String,
    /// Base URL of the hosted data store.
    /// Note: Only used when the `postgrest` feature is enabled.
    pub store_url: Option<String>,
    /// API key sent to the hosted data store.
    pub store_api_key: Option<String>,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "eventboard.db")
    /// - `STORE_URL` - Hosted data store base URL
    /// - `STORE_API_KEY` - Hosted data store API key
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            sqlite_path: get("SQLITE_PATH").unwrap_or_else(|| "eventboard.db".to_string()),
            store_url: get("STORE_URL"),
            store_api_key: get("STORE_API_KEY"),
            request_timeout_seconds: get("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(10),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.sqlite_path, "eventboard.db");
        assert_eq!(config.store_url, None);
        assert_eq!(config.store_api_key, None);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_values_from_variables() {
        let config = config(&[
            ("SQLITE_PATH", "/tmp/events.db"),
            ("STORE_URL", "https://project.example.co"),
            ("STORE_API_KEY", "anon"),
            ("REQUEST_TIMEOUT_SECONDS", "30"),
        ]);

        assert_eq!(config.sqlite_path, "/tmp/events.db");
        assert_eq!(config.store_url.as_deref(), Some("https://project.example.co"));
        assert_eq!(config.store_api_key.as_deref(), Some("anon"));
        assert_eq!(config.request_timeout_seconds, 30);
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        assert_eq!(config(&[("REQUEST_TIMEOUT_SECONDS", "soon")]).request_timeout_seconds, 10);
        assert_eq!(config(&[("REQUEST_TIMEOUT_SECONDS", "0")]).request_timeout_seconds, 10);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config(&[("STORE_URL", "  "), ("SQLITE_PATH", "")]);

        assert_eq!(config.store_url, None);
        assert_eq!(config.sqlite_path, "eventboard.db");
    }
}
