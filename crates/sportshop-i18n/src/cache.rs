//! Per-language persistence of resolved translations.

use std::collections::{BTreeMap, HashMap};

use sportshop_core::platform::keys;
use sportshop_core::{CoreError, KeyValueStore, Language};

/// Reads the stored translations for `language`. Missing or malformed
/// entries read as an empty cache.
#[must_use]
pub fn load(store: &dyn KeyValueStore, language: Language) -> HashMap<String, String> {
    let key = keys::translations(language.code());
    let Some(raw) = store.get(&key) else {
        return HashMap::new();
    };
    match serde_json::from_str::<HashMap<String, String>>(&raw) {
        Ok(entries) => {
            tracing::debug!(%language, count = entries.len(), "loaded translation cache");
            entries
        }
        Err(e) => {
            tracing::warn!(error = %e, %key, "ignoring malformed translation cache");
            HashMap::new()
        }
    }
}

/// Writes `entries` for `language`, sorted by source text.
///
/// # Errors
///
/// Returns [`CoreError::Storage`] if the store rejects the write.
pub fn save(
    store: &dyn KeyValueStore,
    language: Language,
    entries: &HashMap<String, String>,
) -> Result<(), CoreError> {
    let sorted: BTreeMap<&str, &str> = entries
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let raw = serde_json::to_string(&sorted).map_err(|e| CoreError::Storage {
        path: keys::translations(language.code()),
        reason: e.to_string(),
    })?;
    store.set(&keys::translations(language.code()), &raw)
}
