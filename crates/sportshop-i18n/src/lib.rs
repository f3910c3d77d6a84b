pub mod cache;
pub mod entities;
pub mod error;
pub mod overlay;
pub mod provider;

pub use entities::decode_html_entities;
pub use error::TranslateError;
pub use overlay::{TextState, TranslationOverlay};
pub use provider::{ProviderKind, TranslateClient};
