//! Delayed "still working" notice for long loads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

/// A one-shot notice logged after a delay unless cancelled first.
/// Dropping the notice cancels it.
#[derive(Debug)]
pub struct ProgressNotice {
    handle: Option<JoinHandle<()>>,
    fired: Arc<AtomicBool>,
}

impl ProgressNotice {
    /// Schedule `message` after `delay`; `None` schedules nothing.
    /// Must be called from within a tokio runtime when `delay` is set.
    pub fn schedule(delay: Option<Duration>, message: &'static str) -> Self {
        let fired = Arc::new(AtomicBool::new(false));

        let handle = delay.map(|delay| {
            let fired = Arc::clone(&fired);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                fired.store(true, Ordering::SeqCst);
                info!("{}", message);
            })
        });

        Self { handle, fired }
    }

    /// Whether the notice was emitted
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Cancel the notice if it has not fired yet
    pub fn cancel(mut self) -> bool {
        self.abort();
        self.has_fired()
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for ProgressNotice {
    fn drop(&mut self) {
        self.abort();
    }
}
