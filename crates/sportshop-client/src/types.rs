//! Wire types of the catalog and account API. Fields the backend may omit
//! or send loosely typed are kept loose here and tightened in
//! [`crate::normalize`].

use serde::{Deserialize, Serialize};

/// Row of `GET /api/sports`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiSport {
    pub key: String,
    pub name: String,
}

/// Row of `GET /api/products` and body of `GET /api/products/:id`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ApiProduct {
    pub id: String,
    #[serde(default)]
    pub sports: Vec<String>,
    #[serde(default)]
    pub levels: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Number or numeric string.
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub card_image: Option<String>,
    #[serde(default)]
    pub stock_count: Option<serde_json::Value>,
}

/// Error body of non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub name: &'a str,
    pub password: &'a str,
}

/// Body of a successful login. Backends echo the user under either key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginReply {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl LoginReply {
    /// Echoed display name, if any.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        [self.name.as_deref(), self.username.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub password: &'a str,
    pub sport: &'a str,
    /// Account vocabulary: `DEBUTANT`, `CONFIRME` or `EXPERT`.
    #[serde(rename = "niveauSportif")]
    pub level: &'a str,
}
