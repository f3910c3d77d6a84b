//! Services shared by every command, built once from `AppConfig`.

use std::sync::Arc;

use sportshop_client::{AccountService, CatalogClient, RemoteCatalog};
use sportshop_core::{AppConfig, AuthSession, FileStore, KeyValueStore, Language, SeedCatalog};
use sportshop_i18n::{TranslateClient, TranslationOverlay};

use crate::render;

pub(crate) struct App {
    pub config: AppConfig,
    pub catalog: RemoteCatalog,
    pub accounts: AccountService,
    pub overlay: TranslationOverlay,
}

impl App {
    /// Builds the HTTP clients and opens the two state files: `local.json`
    /// (language, translations) and `session.json` (signed-in user).
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client cannot be constructed.
    pub(crate) fn build(config: AppConfig) -> anyhow::Result<Self> {
        let client = CatalogClient::from_config(&config)
            .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))?;
        let translator = TranslateClient::from_config(&config)
            .map_err(|e| anyhow::anyhow!("failed to build translation client: {e}"))?;

        let local: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(config.local_store_path()));
        let session: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::open(config.session_store_path()));

        tracing::debug!(
            api = %config.api_base_url,
            provider = ?translator.kind(),
            state_dir = %config.state_dir.display(),
            "services ready"
        );

        Ok(Self {
            catalog: RemoteCatalog::new(client.clone(), SeedCatalog::standard()),
            accounts: AccountService::new(client, AuthSession::new(session)),
            overlay: TranslationOverlay::from_config(translator, local, &config),
            config,
        })
    }

    /// Translates every text in `texts` the overlay has not resolved yet, so
    /// the following render shows them in the display language. Failures
    /// leave the French text in place.
    pub(crate) async fn prime<'a>(&self, texts: impl IntoIterator<Item = &'a str>) {
        if self.overlay.language().is_source() {
            return;
        }
        for text in texts {
            let _ = self.overlay.t(text);
        }
        let resolved = self.overlay.flush_now().await;
        tracing::debug!(resolved, "translations primed");
    }

    /// Display text for a French source string.
    pub(crate) fn t(&self, source: &str) -> String {
        self.overlay.t(source)
    }

    /// # Errors
    ///
    /// Returns an error if the choice cannot be saved.
    pub(crate) fn set_language(&self, language: Language) -> anyhow::Result<()> {
        self.overlay.set_language(language)?;
        println!("{}", render::language_changed(language));
        Ok(())
    }
}
