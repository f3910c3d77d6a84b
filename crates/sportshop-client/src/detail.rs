//! Product detail lookup with seed fallback.

use sportshop_core::{Product, ProductDetails};

use crate::catalog::RemoteCatalog;
use crate::error::ClientError;
use crate::normalize::normalize_product;

/// Shown when the server fails without a usable message.
pub const DETAIL_LOAD_FAILED: &str = "Impossible de charger le produit.";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    Found {
        product: Product,
        /// Seed-only extras; `None` for products the seed does not know.
        details: Option<ProductDetails>,
        /// `true` when the server could not be reached and the seed record
        /// is shown instead.
        from_seed: bool,
    },
    NotFound,
    Failed {
        message: String,
    },
    /// A later lookup was started before this one answered.
    Stale,
}

impl RemoteCatalog {
    /// Loads one product.
    ///
    /// A 404 is a distinct not-found outcome. When the server cannot be
    /// reached or answers with an unreadable body, the seed record is used if
    /// there is one. Other failures carry the server's `error` message or a
    /// generic one. Only the most recent lookup gets an answer; earlier ones
    /// still in flight come back [`DetailOutcome::Stale`].
    pub async fn product_detail(&self, id: &str) -> DetailOutcome {
        let ticket = self.detail_sequence.issue();
        let result = self.client().fetch_product(id).await;
        if !self.detail_sequence.is_latest(ticket) {
            tracing::debug!(?ticket, %id, "discarding stale product response");
            return DetailOutcome::Stale;
        }

        let details = self.seed().get(id).map(|entry| entry.details.clone());
        match result {
            Ok(row) => DetailOutcome::Found {
                product: normalize_product(&row, self.seed()),
                details,
                from_seed: false,
            },
            Err(ClientError::NotFound { url }) => {
                tracing::debug!(%id, %url, "product not found");
                DetailOutcome::NotFound
            }
            Err(e) => {
                let fallback = self.seed().product(id);
                let degraded = matches!(e, ClientError::Http(_) | ClientError::Deserialize { .. });
                match fallback {
                    Some(product) if degraded => {
                        tracing::warn!(error = %e, %id, "product fetch failed, showing seed record");
                        DetailOutcome::Found {
                            product: product.clone(),
                            details,
                            from_seed: true,
                        }
                    }
                    _ => {
                        tracing::warn!(error = %e, %id, "product fetch failed");
                        let message = match e {
                            ClientError::Api { message, .. } => message,
                            _ => DETAIL_LOAD_FAILED.to_owned(),
                        };
                        DetailOutcome::Failed { message }
                    }
                }
            }
        }
    }
}
