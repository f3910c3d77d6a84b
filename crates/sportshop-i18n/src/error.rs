use thiserror::Error;

/// Errors returned by the translation provider client.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The provider answered with a different number of texts than sent.
    #[error("translation count mismatch: sent {sent}, received {received}")]
    CountMismatch { sent: usize, received: usize },

    #[error("invalid translation endpoint \"{endpoint}\": {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl TranslateError {
    /// `true` for network failures and 5xx. A count mismatch or a malformed
    /// body is final: the overlay asks again the next time the text is shown.
    pub(crate) fn is_transient(&self) -> bool {
        match self {
            TranslateError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            TranslateError::UnexpectedStatus { status, .. } => *status >= 500,
            TranslateError::Deserialize { .. }
            | TranslateError::CountMismatch { .. }
            | TranslateError::InvalidEndpoint { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_mismatch_is_final() {
        assert!(!TranslateError::CountMismatch {
            sent: 2,
            received: 1
        }
        .is_transient());
    }

    #[test]
    fn server_status_is_transient_client_status_is_not() {
        let url = "http://localhost/api/deepl/translate".to_owned();
        assert!(TranslateError::UnexpectedStatus {
            status: 503,
            url: url.clone()
        }
        .is_transient());
        assert!(!TranslateError::UnexpectedStatus { status: 403, url }.is_transient());
    }
}
