pub mod account;
pub mod app_config;
pub mod browse;
pub mod config;
pub mod filter;
pub mod infer;
pub mod platform;
pub mod products;
pub mod retry;
pub mod search;
pub mod seed;
pub mod session;
pub mod share;
pub mod text;
pub mod timer;
pub mod url_state;

use thiserror::Error;

pub use account::{
    LoginForm, LoginIssue, RegistrationForm, RegistrationIssue, REGISTERED_NOTICE,
};
pub use app_config::{AppConfig, Environment};
pub use browse::BrowseSession;
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{FilterSelection, SortMode, PRICE_DOMAIN_MAX, PRICE_DOMAIN_MIN};
pub use infer::{infer_facets, InferredFacets};
pub use platform::{
    Clipboard, FileStore, History, KeyValueStore, MemoryClipboard, MemoryHistory, MemoryStore,
    UnavailableClipboard,
};
pub use products::{
    format_price, Availability, Category, Level, Product, SportLabels, SportOption,
};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use search::{search, RelevanceWeights, SearchContext};
pub use seed::{ProductDetails, SeedCatalog, SeedEntry};
pub use session::{AuthSession, SessionUser};
pub use share::{ShareFeedback, ShareNotice};
pub use text::Language;
pub use timer::{Debouncer, ScopedTimer};
pub use url_state::{parse_query_string, to_query_string, UrlSync};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown level: {0}")]
    UnknownLevel(String),

    #[error("unknown sort mode: {0}")]
    UnknownSortMode(String),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("storage error for {path}: {reason}")]
    Storage { path: String, reason: String },

    #[error("clipboard unavailable")]
    ClipboardUnavailable,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
