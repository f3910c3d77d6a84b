//! HTTP client for the storefront's catalog and account API.

mod auth;

use std::collections::BTreeSet;
use std::time::Duration;

use futures::future::try_join_all;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use sportshop_core::{retry_with_backoff, AppConfig, Level, RetryPolicy, SportOption};

use crate::error::ClientError;
use crate::normalize::normalize_sports;
use crate::types::{ApiErrorBody, ApiProduct, ApiSport};

/// HTTP client for `/api/sports`, `/api/products` and the account endpoints.
///
/// 404 and other non-2xx responses become typed errors. Transient failures
/// (timeouts, connection errors, 5xx) are retried with jittered exponential
/// backoff up to `max_retries` additional attempts.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    pub(super) client: Client,
    /// API origin without a trailing slash, e.g. `http://localhost:8000`.
    pub(super) base_url: String,
    pub(super) max_retries: u32,
    pub(super) backoff_base_ms: u64,
}

impl CatalogClient {
    /// Creates a client with the given timeout, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidBaseUrl`] if `base_url` is not an absolute
    ///   http(s) URL.
    /// - [`ClientError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ClientError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: trimmed.to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// # Errors
    ///
    /// See [`CatalogClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the sport list, sorted by French display name.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-2xx status or malformed body. An empty body
    /// is malformed.
    pub async fn fetch_sports(&self) -> Result<Vec<SportOption>, ClientError> {
        let url = self.endpoint("/api/sports")?;
        let rows: Vec<ApiSport> = self.get_json(url, "sports list").await?;
        Ok(normalize_sports(&rows))
    }

    /// Fetches one page of products for an optional sport and at most one
    /// level. `None` for either omits the parameter.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-2xx status or malformed body.
    pub async fn fetch_products_page(
        &self,
        sport: Option<&str>,
        level: Option<Level>,
    ) -> Result<Vec<ApiProduct>, ClientError> {
        let url = self.products_url(sport, level)?;
        self.get_json(url, "products list").await
    }

    /// Fetches products for a sport and a set of levels. The API filters on
    /// one level at a time, so each level gets its own request; they run
    /// concurrently and the rows are concatenated in level order. Any failed
    /// request fails the whole call.
    ///
    /// # Errors
    ///
    /// The first error among the level requests.
    pub async fn fetch_products(
        &self,
        sport: Option<&str>,
        levels: &BTreeSet<Level>,
    ) -> Result<Vec<ApiProduct>, ClientError> {
        if levels.is_empty() {
            return self.fetch_products_page(sport, None).await;
        }
        let pages = try_join_all(
            levels
                .iter()
                .map(|&level| self.fetch_products_page(sport, Some(level))),
        )
        .await?;
        Ok(pages.into_iter().flatten().collect())
    }

    /// Fetches a single product record.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] on HTTP 404.
    /// - [`ClientError::Api`] when a non-2xx body carries an `error` message.
    /// - [`ClientError::UnexpectedStatus`], [`ClientError::Http`] or
    ///   [`ClientError::Deserialize`] otherwise.
    pub async fn fetch_product(&self, id: &str) -> Result<ApiProduct, ClientError> {
        let url = self.product_url(id)?;
        self.get_json(url, &format!("product {id}")).await
    }

    pub(super) fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Url::parse(&format!("{}{path}", self.base_url)).map_err(|e| {
            ClientError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// Builds `/api/products` with `sport` and `level` only when set.
    pub(super) fn products_url(
        &self,
        sport: Option<&str>,
        level: Option<Level>,
    ) -> Result<Url, ClientError> {
        let mut url = self.endpoint("/api/products")?;
        if let Some(sport) = sport.map(str::trim).filter(|s| !s.is_empty()) {
            url.query_pairs_mut().append_pair("sport", sport);
        }
        if let Some(level) = level {
            url.query_pairs_mut().append_pair("level", level.key());
        }
        Ok(url)
    }

    /// Builds `/api/products/<id>?product_id=<id>`.
    pub(super) fn product_url(&self, id: &str) -> Result<Url, ClientError> {
        let mut url = self.endpoint("/api/products")?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
                reason: "URL cannot carry a path".to_owned(),
            })?
            .push(id);
        url.query_pairs_mut().append_pair("product_id", id);
        Ok(url)
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff_base_ms: self.backoff_base_ms,
            max_delay_ms: 30_000,
            service: "catalog",
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ClientError> {
        retry_with_backoff(self.retry_policy(), ClientError::is_transient, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ClientError::NotFound {
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                if !status.is_success() {
                    return Err(error_from_body(status.as_u16(), &body, &url));
                }

                serde_json::from_str::<T>(&body).map_err(|e| ClientError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }
}

/// Maps a non-2xx response to [`ClientError::Api`] when the body carries a
/// non-blank `error` message, else to [`ClientError::UnexpectedStatus`].
pub(super) fn error_from_body(status: u16, body: &str, url: &Url) -> ClientError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty());
    match message {
        Some(message) => ClientError::Api { status, message },
        None => ClientError::UnexpectedStatus {
            status,
            url: url.to_string(),
        },
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
