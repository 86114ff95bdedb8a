//! Trailing-edge debounce for search input
//!
//! Rapid keystrokes coalesce into one dispatch: each new input cancels the
//! pending timer and arms a fresh one, so only the last write survives the
//! quiet period. Intermediate values are never queued.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Arm `action` to run after the quiet period, cancelling whatever was
    /// pending. Last call wins.
    pub fn schedule<Fut>(&mut self, action: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
