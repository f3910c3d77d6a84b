//! Capability traits for the environment the storefront runs in: key-value
//! storage, the clipboard and the URL history. Each comes with an in-memory
//! implementation used by tests and by headless runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::CoreError;

/// Well-known storage keys.
pub mod keys {
    /// Display language code (`fr` / `en`). Local storage.
    pub const LANGUAGE: &str = "sportshop.language";
    /// Prefix of the per-language translation cache. Local storage.
    pub const TRANSLATIONS_PREFIX: &str = "sportshop.translations.";
    /// Signed-in display name. Session storage.
    pub const SESSION_DISPLAY_NAME: &str = "sportshop.session.display_name";
    /// RFC 3339 sign-in time. Session storage.
    pub const SESSION_SIGNED_IN_AT: &str = "sportshop.session.signed_in_at";
    /// Message shown once by the next login view. Session storage.
    pub const SESSION_NOTICE: &str = "sportshop.session.notice";

    /// Cache key for translations into `language`.
    #[must_use]
    pub fn translations(language: &str) -> String {
        format!("{TRANSLATIONS_PREFIX}{language}")
    }
}

/// String key-value storage. Reads never fail: a missing or unreadable value
/// is simply absent.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] when the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] when the removal cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), CoreError>;

    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] when the store cannot be emptied.
    fn clear(&self) -> Result<(), CoreError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        lock(&self.entries).insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        lock(&self.entries).remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        lock(&self.entries).clear();
        Ok(())
    }
}

/// A JSON object on disk, loaded once and written through on every change.
///
/// A missing file starts empty. A malformed file is logged and treated as
/// empty; it is overwritten on the next write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), CoreError> {
        let storage_err = |reason: String| CoreError::Storage {
            path: self.path.display().to_string(),
            reason,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_err(e.to_string()))?;
        }
        let body = serde_json::to_string_pretty(entries).map_err(|e| storage_err(e.to_string()))?;
        fs::write(&self.path, body).map_err(|e| storage_err(e.to_string()))
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, String> {
    let Ok(raw) = fs::read_to_string(path) else {
        return BTreeMap::new();
    };
    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed state file");
            BTreeMap::new()
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }

    fn clear(&self) -> Result<(), CoreError> {
        let mut entries = lock(&self.entries);
        entries.clear();
        self.persist(&entries)
    }
}

/// Write access to the system clipboard.
pub trait Clipboard: Send + Sync {
    /// # Errors
    ///
    /// Returns [`CoreError::ClipboardUnavailable`] when there is no clipboard
    /// or the write is refused.
    fn write_text(&self, text: &str) -> Result<(), CoreError>;
}

/// Clipboard of an environment that has none (headless terminals, CI).
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn write_text(&self, _text: &str) -> Result<(), CoreError> {
        Err(CoreError::ClipboardUnavailable)
    }
}

#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contents(&self) -> Option<String> {
        lock(&self.contents).clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), CoreError> {
        *lock(&self.contents) = Some(text.to_owned());
        Ok(())
    }
}

/// The current page's query string, without the leading `?`.
pub trait History: Send + Sync {
    fn current_query(&self) -> String;

    /// Replaces the current entry; never pushes a new one.
    fn replace_query(&self, query: &str);
}

impl<T: History + ?Sized> History for Arc<T> {
    fn current_query(&self) -> String {
        (**self).current_query()
    }

    fn replace_query(&self, query: &str) {
        (**self).replace_query(query);
    }
}

#[derive(Debug, Default)]
pub struct MemoryHistory {
    query: Mutex<String>,
    replacements: Mutex<usize>,
}

impl MemoryHistory {
    #[must_use]
    pub fn new(initial_query: &str) -> Self {
        Self {
            query: Mutex::new(initial_query.trim_start_matches('?').to_owned()),
            replacements: Mutex::new(0),
        }
    }

    /// Number of times the entry was replaced.
    #[must_use]
    pub fn replacements(&self) -> usize {
        *lock(&self.replacements)
    }
}

impl History for MemoryHistory {
    fn current_query(&self) -> String {
        lock(&self.query).clone()
    }

    fn replace_query(&self, query: &str) {
        query.clone_into(&mut lock(&self.query));
        *lock(&self.replacements) += 1;
    }
}
