//! Caller-side debounce for search-as-you-type.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::warn;

use crate::catalog::Catalog;
use crate::feed::FeedController;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Forwards search text to the feed once input has been quiet for `delay`.
///
/// Superseded inputs are dropped before they reach the controller. A search
/// that has already started is left to finish.
pub struct SearchDebouncer<C> {
    feed: Arc<FeedController<C>>,
    delay: Duration,
    latest: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl<C: Catalog + 'static> SearchDebouncer<C> {
    pub fn new(feed: Arc<FeedController<C>>, delay: Duration) -> Self {
        Self {
            feed,
            delay,
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    pub fn input(&mut self, text: impl Into<String>) {
        let text = text.into();
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = self.latest.clone();
        let feed = self.feed.clone();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) == ticket {
                feed.set_search(text).await;
            }
        }));
    }

    /// Waits for the most recent input to be applied.
    pub async fn flush(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "debounced search task failed");
            }
        }
    }
}
