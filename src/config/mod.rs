use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub debug: bool,
    pub http: HttpConfig,
    pub focus: FocusConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

/// Knobs for the best-effort focus poller (bounded retries, see context::focus)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusConfig {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("SCRIBE_API_BASE_URL") {
            if !v.trim().is_empty() {
                self.api_base_url = v.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(v) = env::var("SCRIBE_DEBUG") {
            self.debug = v.trim().eq_ignore_ascii_case("true") || v.trim() == "1";
        }
        if let Ok(v) = env::var("SCRIBE_REQUEST_TIMEOUT_SECS") {
            self.http.request_timeout_secs = v.parse().unwrap_or(self.http.request_timeout_secs);
        }
        if let Ok(v) = env::var("SCRIBE_FOCUS_MAX_ATTEMPTS") {
            self.focus.max_attempts = v.parse().unwrap_or(self.focus.max_attempts);
        }
        if let Ok(v) = env::var("SCRIBE_FOCUS_INTERVAL_MS") {
            self.focus.interval_ms = v.parse().unwrap_or(self.focus.interval_ms);
        }
        self
    }

    fn defaults() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            debug: false,
            http: HttpConfig {
                request_timeout_secs: 30,
                user_agent: format!("scribe-admin/{}", env!("CARGO_PKG_VERSION")),
            },
            focus: FocusConfig {
                max_attempts: 4,
                interval_ms: 500,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<ClientConfig> = Lazy::new(ClientConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static ClientConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::defaults();
        assert!(!config.debug);
        assert_eq!(config.focus.max_attempts, 4);
        assert_eq!(config.focus.interval_ms, 500);
        assert_eq!(config.http.request_timeout_secs, 30);
    }

    #[test]
    fn test_base_url_has_no_trailing_slash() {
        let config = ClientConfig::defaults();
        assert!(!config.api_base_url.ends_with('/'));
    }
}
