//! Debounced trigger for real-time analysis
//!
//! Converts a burst of change notifications into at most one action per
//! quiet period. Each notification cancels and replaces the pending timer,
//! so only one timer is ever outstanding.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Cancel-and-rearm quiet timer.
pub struct DebouncedTrigger {
    quiet: Duration,
    /// Pending timer, tagged with its arm sequence number
    pending: Arc<Mutex<Option<(u64, CancellationToken)>>>,
    arm_seq: AtomicU64,
}

impl DebouncedTrigger {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: Arc::new(Mutex::new(None)),
            arm_seq: AtomicU64::new(0),
        }
    }

    /// Arm the timer, cancelling any pending one. When the quiet interval
    /// elapses without another notification, `action` runs on the runtime.
    pub fn notify<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let seq = self.arm_seq.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut pending = self.pending.lock();
            if let Some((_, old)) = pending.take() {
                old.cancel();
            }
            *pending = Some((seq, token.clone()));
        }

        let quiet = self.quiet;
        let pending = Arc::clone(&self.pending);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(quiet) => {
                    // guard must be released before the await below
                    {
                        let mut slot = pending.lock();
                        if matches!(*slot, Some((s, _)) if s == seq) {
                            *slot = None;
                        }
                    }
                    action().await;
                }
            }
        });
    }

    /// Cancel any pending timer; no stale action may fire afterwards.
    pub fn cancel(&self) {
        if let Some((_, token)) = self.pending.lock().take() {
            token.cancel();
        }
    }

    /// True while a timer is armed and has not yet fired
    pub fn is_armed(&self) -> bool {
        self.pending.lock().is_some()
    }
}
