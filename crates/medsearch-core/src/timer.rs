//! A single-shot, cancelable timer on the tokio runtime.
//!
//! `arm` schedules a callback after a delay; arming again or calling
//! `cancel` aborts whatever was pending, so at most one callback per timer is
//! ever outstanding. Dropping the timer cancels it as well.

use std::{future::Future, time::Duration};

use tokio::{task::JoinHandle, time::Instant};

/// Owns at most one pending delayed callback.
#[derive(Debug, Default)]
pub struct CancelableTimer {
    pending: Option<JoinHandle<()>>,
}

impl CancelableTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` once `delay` has elapsed, superseding any earlier arm.
    ///
    /// The deadline is fixed at the moment of the call, not when the spawned
    /// task is first polled.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime context.
    pub fn arm<F>(&mut self, delay: Duration, callback: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let deadline = Instant::now() + delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            callback.await;
        }));
    }

    /// Abort the pending callback. Returns true if one was still outstanding.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// True while a callback is scheduled or running.
    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CancelableTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
