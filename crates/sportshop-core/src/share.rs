//! "Copy link" feedback for the products page.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::platform::Clipboard;
use crate::timer::ScopedTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareFeedback {
    Copied,
    Failed,
}

impl ShareFeedback {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ShareFeedback::Copied => "Lien copie dans le presse-papiers.",
            ShareFeedback::Failed => "Impossible de copier le lien.",
        }
    }
}

/// Transient feedback slot, cleared by a scoped timer after `dismiss_after`.
#[derive(Debug)]
pub struct ShareNotice {
    dismiss_after: Duration,
    current: Arc<Mutex<Option<ShareFeedback>>>,
    dismiss: Option<ScopedTimer>,
}

impl ShareNotice {
    #[must_use]
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            dismiss_after,
            current: Arc::new(Mutex::new(None)),
            dismiss: None,
        }
    }

    /// Copies `url` and shows the outcome. A refused or missing clipboard
    /// produces [`ShareFeedback::Failed`].
    pub fn copy_link(&mut self, clipboard: &dyn Clipboard, url: &str) -> ShareFeedback {
        let feedback = match clipboard.write_text(url) {
            Ok(()) => ShareFeedback::Copied,
            Err(e) => {
                tracing::warn!(error = %e, "could not copy share link");
                ShareFeedback::Failed
            }
        };
        self.show(feedback);
        feedback
    }

    fn show(&mut self, feedback: ShareFeedback) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(feedback);
        let slot = Arc::clone(&self.current);
        self.dismiss = Some(ScopedTimer::after(self.dismiss_after, async move {
            *slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        }));
    }

    #[must_use]
    pub fn current(&self) -> Option<ShareFeedback> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
