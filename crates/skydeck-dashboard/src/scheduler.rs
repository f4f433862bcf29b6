//! Background refresh timer.
//!
//! One tokio task per armed scheduler; the first tick fires a full
//! period after arming, matching a plain repeating timer. Cancellation
//! aborts the task exactly once, and dropping an armed scheduler
//! cancels it.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

pub struct RefreshScheduler {
    handle: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Arm a timer that runs `tick` every `period` until cancelled.
    /// Ticks run to completion in sequence; a slow tick delays the
    /// next one rather than overlapping it.
    pub fn start<F, Fut>(period: Duration, tick: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The interval's initial tick resolves immediately; swallow
            // it so the first real tick lands one period from now.
            interval.tick().await;
            loop {
                interval.tick().await;
                tick().await;
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the timer. Subsequent calls are no-ops.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::debug!("Cancelling refresh scheduler");
            handle.abort();
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
