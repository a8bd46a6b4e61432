//! Background expiry sweeper for the Hot tier.
//!
//! The sweeper is owned by the store: `start` is called from `connect()`, `stop` from
//! `disconnect()`. Both are idempotent, and dropping the sweeper aborts a running task.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, trace};

use super::hot::HotTier;

pub struct Sweeper {
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Sweeper {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            task: Mutex::new(None),
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawns the sweep loop over `hot`. Returns `false` if a loop is already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<V>(&self, hot: Arc<HotTier<V>>) -> bool
    where
        V: Clone + Send + Sync + 'static,
    {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        let period = self.interval;
        *task = Some(tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = hot.sweep();
                if evicted > 0 {
                    debug!(evicted, remaining = hot.len(), "Hot tier sweep");
                } else {
                    trace!("Hot tier sweep found nothing to evict");
                }
            }
        }));
        true
    }

    /// Stops the sweep loop. Returns `false` if it was not running.
    pub fn stop(&self) -> bool {
        match self.task.lock().take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        if let Some(handle) = self.task.get_mut().take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for Sweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sweeper")
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .finish()
    }
}
