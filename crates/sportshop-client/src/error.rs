use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Non-2xx response whose body carried an `{"error": "..."}` message.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ClientError {
    /// Short French message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http(e) if e.is_timeout() => {
                "Le serveur ne repond pas. Reessayez plus tard.".to_owned()
            }
            ClientError::Http(_) => "Impossible de joindre le serveur.".to_owned(),
            ClientError::Deserialize { .. } => "Reponse du serveur illisible.".to_owned(),
            ClientError::NotFound { .. } => "Ressource introuvable.".to_owned(),
            ClientError::UnexpectedStatus { status, .. } => {
                format!("Le serveur a renvoye une erreur ({status}).")
            }
            ClientError::Api { message, .. } => message.clone(),
            ClientError::InvalidBaseUrl { .. } => "Adresse du serveur invalide.".to_owned(),
        }
    }

    /// `true` for failures worth retrying: timeouts, connection errors and
    /// 5xx. A 404, a 4xx with an API message or a malformed body is final.
    pub(crate) fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            ClientError::UnexpectedStatus { status, .. } | ClientError::Api { status, .. } => {
                *status >= 500
            }
            ClientError::NotFound { .. }
            | ClientError::Deserialize { .. }
            | ClientError::InvalidBaseUrl { .. } => false,
        }
    }

    /// `true` when no HTTP response was received at all.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(e) if e.status().is_none())
    }
}
