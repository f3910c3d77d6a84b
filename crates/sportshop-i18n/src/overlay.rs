//! Display-language overlay over French catalog strings.
//!
//! [`TranslationOverlay::t`] answers synchronously: the cached translation
//! when there is one, the source text otherwise. Unknown texts are queued
//! and sent as one batch once no new text arrived for the flush delay. Only
//! one batch is in flight at a time; texts queued meanwhile go in the next
//! one.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use sportshop_core::platform::keys;
use sportshop_core::{AppConfig, CoreError, KeyValueStore, Language, ScopedTimer};
use tokio::sync::Notify;

use crate::cache;
use crate::provider::TranslateClient;

/// Where a source text stands for the current display language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextState {
    Unseen,
    Pending,
    Resolved(String),
}

#[derive(Debug)]
struct OverlayState {
    language: Language,
    /// Resolved translations by target language, loaded lazily.
    resolved: HashMap<Language, HashMap<String, String>>,
    pending: BTreeSet<String>,
    in_flight: bool,
    /// Bumped on every language switch; a flush scheduled or started under
    /// an older generation does nothing.
    generation: u64,
    timer: Option<ScopedTimer>,
}

struct Inner {
    client: TranslateClient,
    store: Arc<dyn KeyValueStore>,
    flush_delay: Duration,
    state: Mutex<OverlayState>,
    idle: Notify,
}

/// Translation overlay for one display surface. Dropping it cancels the
/// scheduled flush.
pub struct TranslationOverlay {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for TranslationOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("TranslationOverlay")
            .field("language", &state.language)
            .field("pending", &state.pending.len())
            .field("in_flight", &state.in_flight)
            .finish_non_exhaustive()
    }
}

impl TranslationOverlay {
    /// Creates an overlay in the stored display language (French when none
    /// or an unknown one is stored).
    #[must_use]
    pub fn new(client: TranslateClient, store: Arc<dyn KeyValueStore>, flush_delay: Duration) -> Self {
        let language = store
            .get(keys::LANGUAGE)
            .and_then(|raw| raw.parse::<Language>().ok())
            .unwrap_or(Language::SOURCE);
        let mut resolved = HashMap::new();
        if !language.is_source() {
            resolved.insert(language, cache::load(store.as_ref(), language));
        }
        let state = OverlayState {
            language,
            resolved,
            pending: BTreeSet::new(),
            in_flight: false,
            generation: 0,
            timer: None,
        };
        Self {
            inner: Arc::new(Inner {
                client,
                store,
                flush_delay,
                state: Mutex::new(state),
                idle: Notify::new(),
            }),
        }
    }

    #[must_use]
    pub fn from_config(
        client: TranslateClient,
        store: Arc<dyn KeyValueStore>,
        config: &AppConfig,
    ) -> Self {
        Self::new(client, store, config.translate_flush_delay())
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.inner.lock().language
    }

    /// Switches the display language and persists the choice. Any queued
    /// texts and the scheduled flush are dropped; resolved translations are
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the choice cannot be persisted. The
    /// switch itself still happens.
    pub fn set_language(&self, language: Language) -> Result<(), CoreError> {
        {
            let mut state = self.inner.lock();
            if state.language != language {
                state.language = language;
                state.generation += 1;
                state.pending.clear();
                state.timer = None;
                if !language.is_source() && !state.resolved.contains_key(&language) {
                    let loaded = cache::load(self.inner.store.as_ref(), language);
                    state.resolved.insert(language, loaded);
                }
                tracing::debug!(%language, generation = state.generation, "display language changed");
            }
        }
        self.inner.store.set(keys::LANGUAGE, language.code())
    }

    /// Text to display for `source`. Blank text and the source language pass
    /// through untouched; unknown text is queued and shown as-is for now.
    ///
    /// Queuing schedules a flush, so this must be called inside a tokio
    /// runtime when the display language is not French.
    #[must_use]
    pub fn t(&self, source: &str) -> String {
        if source.trim().is_empty() {
            return source.to_owned();
        }
        let mut state = self.inner.lock();
        if state.language.is_source() {
            return source.to_owned();
        }
        if let Some(hit) = state
            .resolved
            .get(&state.language)
            .and_then(|cache| cache.get(source))
        {
            return hit.clone();
        }
        state.pending.insert(source.to_owned());
        self.inner.schedule(&mut state);
        source.to_owned()
    }

    #[must_use]
    pub fn state_of(&self, source: &str) -> TextState {
        let state = self.inner.lock();
        if let Some(hit) = state
            .resolved
            .get(&state.language)
            .and_then(|cache| cache.get(source))
        {
            TextState::Resolved(hit.clone())
        } else if state.pending.contains(source) {
            TextState::Pending
        } else {
            TextState::Unseen
        }
    }

    /// `true` while texts are queued or a batch is in flight.
    #[must_use]
    pub fn is_translating(&self) -> bool {
        let state = self.inner.lock();
        state.in_flight || !state.pending.is_empty()
    }

    /// Sends the queued texts now instead of waiting for the timer, after
    /// any batch already in flight. Returns the number of texts resolved.
    pub async fn flush_now(&self) -> usize {
        loop {
            let notified = self.inner.idle.notified();
            let generation = {
                let mut state = self.inner.lock();
                if state.in_flight {
                    None
                } else {
                    state.timer = None;
                    Some(state.generation)
                }
            };
            match generation {
                Some(generation) => return Arc::clone(&self.inner).flush(generation).await,
                None => notified.await,
            }
        }
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, OverlayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arms the flush timer unless one is armed or a batch is in flight.
    fn schedule(self: &Arc<Self>, state: &mut OverlayState) {
        if state.in_flight
            || state.pending.is_empty()
            || state.timer.as_ref().is_some_and(ScopedTimer::is_pending)
        {
            return;
        }
        let weak: Weak<Inner> = Arc::downgrade(self);
        let generation = state.generation;
        // The timer only launches the flush, so replacing or dropping a
        // fired timer never aborts a request in flight.
        state.timer = Some(ScopedTimer::after(self.flush_delay, async move {
            if let Some(inner) = weak.upgrade() {
                tokio::spawn(inner.flush(generation));
            }
        }));
    }

    async fn flush(self: Arc<Self>, generation: u64) -> usize {
        let (batch, target) = {
            let mut state = self.lock();
            if state.generation != generation
                || state.language.is_source()
                || state.in_flight
                || state.pending.is_empty()
            {
                return 0;
            }
            state.in_flight = true;
            let batch: Vec<String> = std::mem::take(&mut state.pending).into_iter().collect();
            (batch, state.language)
        };

        let result = self
            .client
            .translate_batch(&batch, Language::SOURCE, target)
            .await;

        let applied = {
            let mut state = self.lock();
            state.in_flight = false;
            let applied = if state.generation == generation {
                self.apply(&mut state, target, &batch, result)
            } else {
                tracing::debug!(count = batch.len(), "discarding translations for a previous language");
                0
            };
            self.schedule(&mut state);
            applied
        };
        self.idle.notify_waiters();
        applied
    }

    fn apply(
        &self,
        state: &mut OverlayState,
        target: Language,
        batch: &[String],
        result: Result<HashMap<String, String>, crate::TranslateError>,
    ) -> usize {
        let translated = match result {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!(error = %e, count = batch.len(), "translation batch failed, showing source text");
                return 0;
            }
        };
        let entries = state.resolved.entry(target).or_default();
        for source in batch {
            // Empty answers resolve to the source so they are not asked again.
            let text = translated
                .get(source)
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(source);
            entries.insert(source.clone(), text.clone());
        }
        if let Err(e) = cache::save(self.store.as_ref(), target, entries) {
            tracing::warn!(error = %e, "could not persist translation cache");
        }
        batch.len()
    }
}

#[cfg(test)]
mod tests {
    use sportshop_core::MemoryStore;

    use super::*;

    fn offline_overlay(store: Arc<MemoryStore>) -> TranslationOverlay {
        let client = TranslateClient::new("http://127.0.0.1:1", "/api/deepl", None, 1, "test").unwrap();
        TranslationOverlay::new(client, store, Duration::from_millis(20))
    }

    #[test]
    fn french_passes_through_without_queueing() {
        let overlay = offline_overlay(Arc::new(MemoryStore::new()));
        assert_eq!(overlay.language(), Language::Fr);
        assert_eq!(overlay.t("Chaussures"), "Chaussures");
        assert_eq!(overlay.state_of("Chaussures"), TextState::Unseen);
        assert!(!overlay.is_translating());
    }

    #[test]
    fn stored_language_and_cache_are_restored() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::LANGUAGE, "en").unwrap();
        store
            .set("sportshop.translations.en", r#"{"Chaussures":"Shoes"}"#)
            .unwrap();
        let overlay = offline_overlay(store);
        assert_eq!(overlay.language(), Language::En);
        assert_eq!(overlay.t("Chaussures"), "Shoes");
    }

    #[test]
    fn unknown_stored_language_falls_back_to_french() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::LANGUAGE, "de").unwrap();
        assert_eq!(offline_overlay(store).language(), Language::Fr);
    }

    #[tokio::test]
    async fn blank_text_is_never_queued() {
        let overlay = offline_overlay(Arc::new(MemoryStore::new()));
        overlay.set_language(Language::En).unwrap();
        assert_eq!(overlay.t("   "), "   ");
        assert!(!overlay.is_translating());
    }

    #[tokio::test]
    async fn switching_back_to_french_drops_the_queue_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let overlay = offline_overlay(Arc::clone(&store));
        overlay.set_language(Language::En).unwrap();
        assert_eq!(overlay.t("Ballon"), "Ballon");
        assert_eq!(overlay.state_of("Ballon"), TextState::Pending);

        overlay.set_language(Language::Fr).unwrap();
        assert!(!overlay.is_translating());
        assert_eq!(store.get(keys::LANGUAGE).as_deref(), Some("fr"));

        // The cancelled flush never runs, so nothing is sent or resolved.
        tokio::time::sleep(Duration::from_millis(60)).await;
        overlay.set_language(Language::En).unwrap();
        assert_eq!(overlay.state_of("Ballon"), TextState::Unseen);
    }

    #[tokio::test]
    async fn failed_batch_is_not_cached_and_can_be_retried() {
        let overlay = offline_overlay(Arc::new(MemoryStore::new()));
        overlay.set_language(Language::En).unwrap();
        let _ = overlay.t("Raquette");
        assert_eq!(overlay.flush_now().await, 0);
        assert_eq!(overlay.state_of("Raquette"), TextState::Unseen);

        let _ = overlay.t("Raquette");
        assert_eq!(overlay.state_of("Raquette"), TextState::Pending);
    }
}
