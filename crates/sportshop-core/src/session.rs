//! Signed-in user and one-shot notices, kept in session storage.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::platform::{keys, KeyValueStore};
use crate::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub display_name: String,
    /// `None` when the stored timestamp is missing or malformed.
    pub signed_in_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct AuthSession {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession").finish_non_exhaustive()
    }
}

impl AuthSession {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the session cannot be written.
    pub fn sign_in(&self, display_name: &str, at: DateTime<Utc>) -> Result<(), CoreError> {
        self.store
            .set(keys::SESSION_DISPLAY_NAME, display_name.trim())?;
        self.store
            .set(keys::SESSION_SIGNED_IN_AT, &at.to_rfc3339())
    }

    /// The signed-in user, if any. A blank stored name counts as signed out.
    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        let display_name = self
            .store
            .get(keys::SESSION_DISPLAY_NAME)
            .filter(|n| !n.trim().is_empty())?;
        let signed_in_at = self
            .store
            .get(keys::SESSION_SIGNED_IN_AT)
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|t| t.with_timezone(&Utc));
        Some(SessionUser {
            display_name,
            signed_in_at,
        })
    }

    /// Forgets the user and any pending notice.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the session cannot be cleared.
    pub fn sign_out(&self) -> Result<(), CoreError> {
        self.store.clear()
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the notice cannot be written.
    pub fn set_notice(&self, message: &str) -> Result<(), CoreError> {
        self.store.set(keys::SESSION_NOTICE, message)
    }

    /// Returns the pending notice and removes it, so it shows only once.
    #[must_use]
    pub fn take_notice(&self) -> Option<String> {
        let notice = self.store.get(keys::SESSION_NOTICE)?;
        if let Err(e) = self.store.remove(keys::SESSION_NOTICE) {
            tracing::warn!(error = %e, "could not clear session notice");
        }
        Some(notice)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::platform::MemoryStore;

    fn session() -> AuthSession {
        AuthSession::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn nobody_is_signed_in_initially() {
        assert!(session().current_user().is_none());
    }

    #[test]
    fn sign_in_then_out() {
        let session = session();
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap();
        session.sign_in(" camille ", at).unwrap();

        let user = session.current_user().unwrap();
        assert_eq!(user.display_name, "camille");
        assert_eq!(user.signed_in_at, Some(at));

        session.sign_out().unwrap();
        assert!(session.current_user().is_none());
    }

    #[test]
    fn malformed_timestamp_reads_as_unknown() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::SESSION_DISPLAY_NAME, "camille").unwrap();
        store.set(keys::SESSION_SIGNED_IN_AT, "yesterday").unwrap();
        let user = AuthSession::new(store).current_user().unwrap();
        assert!(user.signed_in_at.is_none());
    }

    #[test]
    fn notice_is_consumed_once() {
        let session = session();
        session.set_notice("bienvenue").unwrap();
        assert_eq!(session.take_notice().as_deref(), Some("bienvenue"));
        assert!(session.take_notice().is_none());
    }
}
