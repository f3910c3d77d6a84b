//! Last-known-good catalog state fed by the [`CatalogClient`].
//!
//! The catalog starts from the seed list. Products, sports and product
//! detail each have their own request sequence, and only the response to the
//! most recent request of a concern is applied. Failures never clear what is
//! shown: the previous products and sports stay in place.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use sportshop_core::{Level, Product, SeedCatalog, SportOption};

use crate::client::CatalogClient;
use crate::error::ClientError;
use crate::normalize::normalize_products;
use crate::sequence::{RequestSequence, Ticket};

/// What happened to one product refresh.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The response was the latest and replaced the product list.
    Applied { count: usize },
    /// A newer request was issued meanwhile; the response was dropped.
    Stale,
    /// The request failed; the previous list is kept.
    Failed(ClientError),
}

#[derive(Debug)]
struct CatalogState {
    products: Vec<Product>,
    /// Size of the unfiltered catalog, as last seen.
    total_count: usize,
    sports: Vec<SportOption>,
}

#[derive(Debug)]
pub struct RemoteCatalog {
    client: CatalogClient,
    seed: SeedCatalog,
    sequence: RequestSequence,
    sports_sequence: RequestSequence,
    pub(crate) detail_sequence: RequestSequence,
    state: Mutex<CatalogState>,
}

impl RemoteCatalog {
    #[must_use]
    pub fn new(client: CatalogClient, seed: SeedCatalog) -> Self {
        let state = CatalogState {
            products: seed.products(),
            total_count: seed.len(),
            sports: seed.sport_options(),
        };
        Self {
            client,
            seed,
            sequence: RequestSequence::new(),
            sports_sequence: RequestSequence::new(),
            detail_sequence: RequestSequence::new(),
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    #[must_use]
    pub fn seed(&self) -> &SeedCatalog {
        &self.seed
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.lock().total_count
    }

    #[must_use]
    pub fn sports(&self) -> Vec<SportOption> {
        self.lock().sports.clone()
    }

    /// Replaces the sport list with the server's. Failures, empty lists and
    /// responses overtaken by a later refresh keep the current one. Returns
    /// `true` when the list was replaced.
    pub async fn refresh_sports(&self) -> bool {
        let ticket = self.sports_sequence.issue();
        let result = self.client.fetch_sports().await;

        let mut state = self.lock();
        if !self.sports_sequence.is_latest(ticket) {
            tracing::debug!(?ticket, "discarding stale sports response");
            return false;
        }
        match result {
            Ok(sports) if sports.is_empty() => {
                tracing::warn!("sports endpoint returned no sports, keeping current list");
                false
            }
            Ok(sports) => {
                tracing::debug!(count = sports.len(), "sports list refreshed");
                state.sports = sports;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "sports refresh failed, keeping current list");
                false
            }
        }
    }

    /// Takes a ticket for a product refresh. Issuing a ticket makes every
    /// earlier ticket stale.
    pub fn issue_ticket(&self) -> Ticket {
        self.sequence.issue()
    }

    /// Fetches products for the given filters and applies them.
    pub async fn refresh_products(
        &self,
        sport: Option<&str>,
        levels: &BTreeSet<Level>,
    ) -> RefreshOutcome {
        let ticket = self.issue_ticket();
        self.refresh_products_with_ticket(ticket, sport, levels)
            .await
    }

    /// Like [`RemoteCatalog::refresh_products`] with a ticket taken earlier.
    /// The response is applied only if `ticket` is still the latest when it
    /// arrives. The unfiltered total is only updated by unfiltered requests.
    pub async fn refresh_products_with_ticket(
        &self,
        ticket: Ticket,
        sport: Option<&str>,
        levels: &BTreeSet<Level>,
    ) -> RefreshOutcome {
        let result = self.client.fetch_products(sport, levels).await;

        let mut state = self.lock();
        if !self.sequence.is_latest(ticket) {
            tracing::debug!(?ticket, "discarding stale products response");
            return RefreshOutcome::Stale;
        }

        match result {
            Ok(rows) => {
                let products = normalize_products(&rows, &self.seed);
                let count = products.len();
                if sport.is_none() && levels.is_empty() {
                    state.total_count = count;
                }
                state.products = products;
                tracing::debug!(count, ?sport, ?levels, "products refreshed");
                RefreshOutcome::Applied { count }
            }
            Err(e) => {
                tracing::warn!(error = %e, "products refresh failed, keeping current list");
                RefreshOutcome::Failed(e)
            }
        }
    }
}
