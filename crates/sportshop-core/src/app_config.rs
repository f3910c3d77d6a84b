use std::path::PathBuf;
use std::time::Duration;

use crate::search::RelevanceWeights;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    /// Absolute URL or a path resolved against `api_base_url`.
    pub translate_api_url: String,
    pub translate_api_key: Option<String>,
    pub translate_flush_delay_ms: u64,
    pub price_debounce_ms: u64,
    pub notice_dismiss_ms: u64,
    pub state_dir: PathBuf,
    pub relevance_weights: RelevanceWeights,
}

impl AppConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn translate_flush_delay(&self) -> Duration {
        Duration::from_millis(self.translate_flush_delay_ms)
    }

    #[must_use]
    pub fn price_debounce(&self) -> Duration {
        Duration::from_millis(self.price_debounce_ms)
    }

    #[must_use]
    pub fn notice_dismiss(&self) -> Duration {
        Duration::from_millis(self.notice_dismiss_ms)
    }

    /// File backing local storage (language, translation caches).
    #[must_use]
    pub fn local_store_path(&self) -> PathBuf {
        self.state_dir.join("local.json")
    }

    /// File backing session storage (signed-in user, one-shot notice).
    #[must_use]
    pub fn session_store_path(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("translate_api_url", &self.translate_api_url)
            .field(
                "translate_api_key",
                &self.translate_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("translate_flush_delay_ms", &self.translate_flush_delay_ms)
            .field("price_debounce_ms", &self.price_debounce_ms)
            .field("notice_dismiss_ms", &self.notice_dismiss_ms)
            .field("state_dir", &self.state_dir)
            .field("relevance_weights", &self.relevance_weights)
            .finish()
    }
}
