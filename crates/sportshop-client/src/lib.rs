pub mod account;
pub mod catalog;
pub mod client;
pub mod detail;
pub mod error;
pub mod normalize;
pub mod sequence;
pub mod types;

pub use account::{AccountService, LoginOutcome, RegisterOutcome};
pub use catalog::{RefreshOutcome, RemoteCatalog};
pub use client::CatalogClient;
pub use detail::{DetailOutcome, DETAIL_LOAD_FAILED};
pub use error::ClientError;
pub use normalize::{normalize_product, normalize_products, normalize_sports};
pub use sequence::{RequestSequence, Ticket};
pub use types::{ApiProduct, ApiSport, LoginReply};
