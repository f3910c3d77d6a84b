use crate::app_config::{AppConfig, Environment};
use crate::search::RelevanceWeights;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("SPORTSHOP_ENV", "development"))?;
    let log_level = or_default("SPORTSHOP_LOG_LEVEL", "info");

    let api_base_url = or_default("SPORTSHOP_API_BASE_URL", "http://localhost:8000")
        .trim_end_matches('/')
        .to_string();
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(invalid(
            "SPORTSHOP_API_BASE_URL",
            format!("expected an http(s) URL, got {api_base_url:?}"),
        ));
    }

    let request_timeout_secs = parse_u64("SPORTSHOP_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("SPORTSHOP_USER_AGENT", "sportshop/0.1 (storefront-client)");
    let max_retries = parse_u32("SPORTSHOP_MAX_RETRIES", "0")?;
    let retry_backoff_base_ms = parse_u64("SPORTSHOP_RETRY_BACKOFF_BASE_MS", "500")?;

    let translate_api_url = or_default("SPORTSHOP_TRANSLATE_API_URL", "/api/deepl");
    let translate_api_key = lookup("SPORTSHOP_TRANSLATE_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let translate_flush_delay_ms = parse_u64("SPORTSHOP_TRANSLATE_FLUSH_DELAY_MS", "140")?;

    let price_debounce_ms = parse_u64("SPORTSHOP_PRICE_DEBOUNCE_MS", "250")?;
    let notice_dismiss_ms = parse_u64("SPORTSHOP_NOTICE_DISMISS_MS", "2000")?;
    let state_dir = PathBuf::from(or_default("SPORTSHOP_STATE_DIR", "./.sportshop"));

    let raw_weights = or_default("SPORTSHOP_RELEVANCE_WEIGHTS", "6,4,2,3,2");
    let relevance_weights = RelevanceWeights::parse_list(&raw_weights).ok_or_else(|| {
        invalid(
            "SPORTSHOP_RELEVANCE_WEIGHTS",
            format!("expected five comma-separated integers, got {raw_weights:?}"),
        )
    })?;

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        translate_api_url,
        translate_api_key,
        translate_flush_delay_ms,
        price_debounce_ms,
        notice_dismiss_ms,
        state_dir,
        relevance_weights,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything but `development`,
/// `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SPORTSHOP_ENV".to_string(),
            reason: format!("expected development, test or production, got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
