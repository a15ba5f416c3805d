//! Background tick loops with cooperative cancellation.
//!
//! Each state machine that enters the running phase spawns exactly one
//! `TickLoop` at its fixed period. The loop re-checks its run flag before
//! every computation, so cancelling from any thread stops it after at most
//! one more period. A fresh loop is spawned per start/resume; a cancelled
//! loop is never reused.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

// ============================================================================
// TickLoop
// ============================================================================

/// Handle to one background repeating task.
///
/// The task sleeps for its period, checks the run flag, then invokes the
/// tick callback. The callback returns `false` to end the loop from the
/// inside (completion, or a machine that is no longer running).
#[derive(Debug)]
pub struct TickLoop {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl TickLoop {
    /// Spawns a new tick loop on the given runtime.
    ///
    /// The first tick fires one full period after the spawn; missed ticks
    /// are skipped rather than bursted.
    pub fn spawn<F>(runtime: &Handle, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                if !flag.load(Ordering::Acquire) {
                    break;
                }
                if !on_tick() {
                    break;
                }
            }
        });

        Self { running, handle }
    }

    /// Requests cancellation.
    ///
    /// Cooperative: the task observes the flag at the top of its next
    /// iteration, so at most one in-flight period completes after this call.
    pub fn cancel(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Returns true while the background task is still alive.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for TickLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// Tests
// ============================================================================
