//! Delayed side effects tied to the lifetime of their owner.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Runs a task after a delay. Cancelling or dropping the timer aborts the
/// task if it has not run yet.
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct ScopedTimer {
    handle: JoinHandle<()>,
}

impl ScopedTimer {
    pub fn after<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        Self { handle }
    }

    /// `true` until the task has completed or been aborted.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Delivers only the last value pushed within `delay` of the previous one.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    timer: Option<ScopedTimer>,
    tx: mpsc::UnboundedSender<T>,
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            delay,
            timer: None,
            tx,
            rx,
        }
    }

    /// Schedules `value`, replacing any value still waiting, delivered or
    /// not.
    pub fn push(&mut self, value: T) {
        self.cancel();
        let tx = self.tx.clone();
        self.timer = Some(ScopedTimer::after(self.delay, async move {
            let _ = tx.send(value);
        }));
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(ScopedTimer::is_pending)
    }

    pub fn cancel(&mut self) {
        self.timer = None;
        while self.rx.try_recv().is_ok() {}
    }

    /// The delivered value, if the delay has elapsed.
    pub fn take_ready(&mut self) -> Option<T> {
        let mut last = None;
        while let Ok(value) = self.rx.try_recv() {
            last = Some(value);
        }
        last
    }

    /// Waits for the pending value, if any.
    pub async fn settled(&mut self) -> Option<T> {
        if let Some(value) = self.take_ready() {
            return Some(value);
        }
        if !self.is_pending() {
            return None;
        }
        self.rx.recv().await
    }
}
