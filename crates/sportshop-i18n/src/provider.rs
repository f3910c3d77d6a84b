//! HTTP client for the machine translation provider.
//!
//! Two wire shapes are supported and picked from the configured endpoint:
//! DeepL (`/api/deepl` proxy paths or a `*.deepl.com` host) and a generic
//! LibreTranslate-style JSON API for everything else.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sportshop_core::{retry_with_backoff, AppConfig, Language, RetryPolicy};

use crate::entities::decode_html_entities;
use crate::error::TranslateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    DeepL,
    Libre,
}

impl ProviderKind {
    /// Picks the wire shape from the configured endpoint, before resolution.
    #[must_use]
    pub fn detect(configured: &str) -> Self {
        let configured = configured.trim();
        if configured.starts_with("/api/deepl") {
            return ProviderKind::DeepL;
        }
        let deepl_host = match Url::parse(configured) {
            Ok(url) => url.host_str().is_some_and(|h| h.ends_with("deepl.com")),
            Err(_) => configured.contains("deepl.com"),
        };
        if deepl_host {
            ProviderKind::DeepL
        } else {
            ProviderKind::Libre
        }
    }
}

/// Client for the translation endpoint.
#[derive(Debug, Clone)]
pub struct TranslateClient {
    client: Client,
    endpoint: Url,
    kind: ProviderKind,
    api_key: Option<String>,
    /// The `Authorization` header is only sent to absolute endpoints; a
    /// same-origin proxy gets the key in the body.
    send_auth_header: bool,
    max_retries: u32,
    backoff_base_ms: u64,
}

#[derive(Debug, Serialize)]
struct LibreRequest<'a> {
    q: &'a [String],
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct DeepLResponse {
    #[serde(default)]
    translations: Vec<DeepLTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    #[serde(default)]
    text: Option<String>,
}

impl TranslateClient {
    /// Creates a client for `configured`, which is either an absolute URL or
    /// a path resolved against `api_base_url`.
    ///
    /// # Errors
    ///
    /// - [`TranslateError::InvalidEndpoint`] if the endpoint does not resolve
    ///   to a valid URL.
    /// - [`TranslateError::Http`] if the underlying `reqwest::Client` cannot
    ///   be constructed.
    pub fn new(
        api_base_url: &str,
        configured: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, TranslateError> {
        let kind = ProviderKind::detect(configured);
        let endpoint = resolve_endpoint(api_base_url, configured, kind)?;
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            kind,
            api_key,
            send_auth_header: !configured.trim().starts_with('/'),
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// # Errors
    ///
    /// See [`TranslateClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, TranslateError> {
        Ok(Self::new(
            &config.api_base_url,
            &config.translate_api_url,
            config.translate_api_key.as_deref(),
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_retries(config.max_retries, config.retry_backoff_base_ms))
    }

    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Translates `texts` and returns a map from each source text to its
    /// translation, HTML entities decoded. Blank and duplicate inputs are
    /// dropped before sending; an empty input or `source == target` sends
    /// nothing.
    ///
    /// # Errors
    ///
    /// - [`TranslateError::CountMismatch`] when the provider returns fewer
    ///   texts than were sent.
    /// - [`TranslateError::UnexpectedStatus`], [`TranslateError::Http`] or
    ///   [`TranslateError::Deserialize`] otherwise.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source: Language,
        target: Language,
    ) -> Result<HashMap<String, String>, TranslateError> {
        if source == target {
            return Ok(HashMap::new());
        }
        let mut unique: Vec<String> = Vec::with_capacity(texts.len());
        for text in texts {
            if !text.trim().is_empty() && !unique.contains(text) {
                unique.push(text.clone());
            }
        }
        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let batch = unique.as_slice();
        let policy = RetryPolicy {
            max_retries: self.max_retries,
            backoff_base_ms: self.backoff_base_ms,
            max_delay_ms: 10_000,
            service: "translation",
        };
        let translated = retry_with_backoff(policy, TranslateError::is_transient, || async move {
            match self.kind {
                ProviderKind::DeepL => self.send_deepl(batch, source, target).await,
                ProviderKind::Libre => self.send_libre(batch, source, target).await,
            }
        })
        .await?;

        tracing::debug!(count = unique.len(), %target, "translated batch");
        Ok(unique
            .into_iter()
            .zip(translated)
            .map(|(source_text, text)| {
                let decoded = decode_html_entities(&text).into_owned();
                (source_text, decoded)
            })
            .collect())
    }

    async fn send_deepl(
        &self,
        texts: &[String],
        source: Language,
        target: Language,
    ) -> Result<Vec<String>, TranslateError> {
        let source_lang = deepl_language(source);
        let target_lang = deepl_language(target);
        let mut form: Vec<(&str, &str)> = texts.iter().map(|t| ("text", t.as_str())).collect();
        form.push(("source_lang", source_lang));
        form.push(("target_lang", target_lang));
        if let Some(key) = &self.api_key {
            form.push(("auth_key", key.as_str()));
        }

        let mut request = self.client.post(self.endpoint.clone()).form(&form);
        if let (Some(key), true) = (&self.api_key, self.send_auth_header) {
            request = request.header(reqwest::header::AUTHORIZATION, format!("DeepL-Auth-Key {key}"));
        }

        let body = self.send(request).await?;
        let parsed: DeepLResponse =
            serde_json::from_str(&body).map_err(|e| TranslateError::Deserialize {
                context: "DeepL translate response".to_owned(),
                source: e,
            })?;
        let values = parsed
            .translations
            .into_iter()
            .map(|t| t.text.unwrap_or_default())
            .collect();
        take_exact(values, texts.len())
    }

    async fn send_libre(
        &self,
        texts: &[String],
        source: Language,
        target: Language,
    ) -> Result<Vec<String>, TranslateError> {
        let payload = LibreRequest {
            q: texts,
            source: source.code(),
            target: target.code(),
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        let request = self.client.post(self.endpoint.clone()).json(&payload);

        let body = self.send(request).await?;
        let parsed: Value =
            serde_json::from_str(&body).map_err(|e| TranslateError::Deserialize {
                context: "translate response".to_owned(),
                source: e,
            })?;
        take_exact(extract_translated_texts(&parsed), texts.len())
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, TranslateError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

fn deepl_language(language: Language) -> &'static str {
    match language {
        Language::Fr => "FR",
        Language::En => "EN",
    }
}

/// Resolves the configured endpoint against the API origin. DeepL endpoints
/// get `/translate` appended unless already present.
pub(crate) fn resolve_endpoint(
    api_base_url: &str,
    configured: &str,
    kind: ProviderKind,
) -> Result<Url, TranslateError> {
    let configured = configured.trim();
    let mut raw = if configured.starts_with('/') {
        format!("{}{configured}", api_base_url.trim().trim_end_matches('/'))
    } else {
        configured.to_owned()
    };
    if kind == ProviderKind::DeepL {
        raw = raw.trim_end_matches('/').to_owned();
        if !raw.ends_with("/translate") {
            raw.push_str("/translate");
        }
    }
    Url::parse(&raw).map_err(|e| TranslateError::InvalidEndpoint {
        endpoint: configured.to_owned(),
        reason: e.to_string(),
    })
}

/// Accepts `{translatedText: string}`, `{translatedText: [string]}`,
/// `[{translatedText}]` and `[string]`. Anything else yields no texts.
pub(crate) fn extract_translated_texts(payload: &Value) -> Vec<String> {
    match payload {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other
                    .get("translatedText")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned(),
            })
            .collect(),
        Value::Object(map) => match map.get("translatedText") {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| v.as_str().unwrap_or_default().to_owned())
                .collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Keeps the first `expected` values; fewer is an error.
fn take_exact(mut values: Vec<String>, expected: usize) -> Result<Vec<String>, TranslateError> {
    if values.len() < expected {
        return Err(TranslateError::CountMismatch {
            sent: expected,
            received: values.len(),
        });
    }
    values.truncate(expected);
    Ok(values)
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
