//! Stopwatch engine.
//!
//! This module provides the elapsed-time half of the application:
//! - State transitions (Idle → Running → Paused → Idle)
//! - Elapsed time recomputed from monotonic clock readings
//! - A ~100 ms tick loop pushing display refreshes
//! - Lap marking while running

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::Sender;
use thiserror::Error;
use tokio::runtime::Handle;

use crate::clock::{Clock, SystemClock};
use crate::surface::SurfaceUpdate;
use crate::ticker::TickLoop;
use crate::types::StopwatchState;

/// Fixed period of the stopwatch tick loop.
pub const STOPWATCH_TICK_PERIOD: Duration = Duration::from_millis(100);

// ============================================================================
// StopwatchError
// ============================================================================

/// Errors reported for invalid stopwatch operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchError {
    /// Laps can only be marked while the stopwatch is running.
    #[error("laps can only be marked while the stopwatch is running")]
    NotRunning,
}

// ============================================================================
// StopwatchEvent
// ============================================================================

/// Stopwatch events forwarded to the foreground update sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopwatchEvent {
    /// Measurement started or resumed
    Started,
    /// Periodic elapsed-time refresh; no state transition
    Tick {
        /// Elapsed time at this tick
        elapsed: Duration,
    },
    /// Measurement frozen
    Paused {
        /// Elapsed time at the pause
        elapsed: Duration,
    },
    /// A lap was recorded
    LapMarked {
        /// 1-based lap number
        number: usize,
        /// Elapsed time at the lap
        elapsed: Duration,
    },
    /// Stopwatch cleared back to idle, laps discarded
    Reset,
}

// ============================================================================
// StopwatchEngine
// ============================================================================

/// Stopwatch engine owning the elapsed-time state and its tick loop.
///
/// Elapsed time is always derived from the clock source, never from tick
/// counting, so the ~100 ms loop only affects display freshness.
pub struct StopwatchEngine {
    /// Stopwatch state shared with the tick loop
    state: Arc<Mutex<StopwatchState>>,
    /// Clock source for elapsed-time readings
    clock: Arc<dyn Clock>,
    /// Channel toward the foreground update sink
    update_tx: Sender<SurfaceUpdate>,
    /// Runtime the tick loop is spawned on
    runtime: Handle,
    /// The currently spawned tick loop, if any
    tick_loop: Option<TickLoop>,
}

impl StopwatchEngine {
    /// Creates a new idle engine on the system clock.
    pub fn new(update_tx: Sender<SurfaceUpdate>, runtime: Handle) -> Self {
        Self::with_clock(update_tx, runtime, Arc::new(SystemClock))
    }

    /// Creates a new idle engine on the given clock source.
    pub fn with_clock(
        update_tx: Sender<SurfaceUpdate>,
        runtime: Handle,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(StopwatchState::new())),
            clock,
            update_tx,
            runtime,
            tick_loop: None,
        }
    }

    /// Starts measuring, or resumes from a pause.
    ///
    /// Records the current clock reading as the running-since instant and
    /// enables lap marking. Starting while already running is a no-op.
    pub fn start(&mut self) {
        {
            let mut state = self.state.lock().unwrap();
            if state.is_running() {
                return;
            }
            state.start(self.clock.now());
        }

        self.send(StopwatchEvent::Started);
        self.spawn_tick_loop();
        tracing::info!("stopwatch running");
    }

    /// Freezes the elapsed time and disables lap marking.
    ///
    /// Stops the tick loop; a later [`start`](Self::start) spawns a fresh
    /// one. Pausing while not running is a no-op.
    pub fn pause(&mut self) {
        self.halt_tick_loop();

        let elapsed = {
            let mut state = self.state.lock().unwrap();
            if !state.is_running() {
                return;
            }
            state.pause(self.clock.now());
            state.elapsed(self.clock.now())
        };

        self.send(StopwatchEvent::Paused { elapsed });
        tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "stopwatch paused");
    }

    /// Clears elapsed time and laps back to idle from any phase.
    pub fn reset(&mut self) {
        self.halt_tick_loop();

        self.state.lock().unwrap().reset();
        self.send(StopwatchEvent::Reset);
        tracing::info!("stopwatch reset");
    }

    /// Records a lap at the current elapsed time.
    ///
    /// Returns the 1-based lap number and the lap value.
    ///
    /// # Errors
    ///
    /// [`StopwatchError::NotRunning`] outside the running phase.
    pub fn mark_lap(&mut self) -> Result<(usize, Duration), StopwatchError> {
        let (number, elapsed) = {
            let mut state = self.state.lock().unwrap();
            state
                .mark_lap(self.clock.now())
                .ok_or(StopwatchError::NotRunning)?
        };

        self.send(StopwatchEvent::LapMarked { number, elapsed });
        tracing::debug!(number, elapsed_ms = elapsed.as_millis() as u64, "lap marked");
        Ok((number, elapsed))
    }

    /// Halts the tick loop without touching the stopwatch state.
    ///
    /// Used on application quit.
    pub fn shutdown(&mut self) {
        self.halt_tick_loop();
    }

    /// A snapshot of the current stopwatch state.
    pub fn state(&self) -> StopwatchState {
        self.state.lock().unwrap().clone()
    }

    /// Elapsed time at the current clock reading.
    pub fn elapsed(&self) -> Duration {
        self.state.lock().unwrap().elapsed(self.clock.now())
    }

    /// Returns true while a tick loop is alive for this engine.
    pub fn has_active_tick_loop(&self) -> bool {
        self.tick_loop.as_ref().is_some_and(TickLoop::is_active)
    }

    /// Spawns the ~100 ms tick loop unless one is already alive.
    fn spawn_tick_loop(&mut self) {
        if self.has_active_tick_loop() {
            return;
        }

        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let update_tx = self.update_tx.clone();

        let tick_loop = TickLoop::spawn(&self.runtime, STOPWATCH_TICK_PERIOD, move || {
            let mut state = state.lock().unwrap();
            if !state.is_running() {
                return false;
            }

            let now = clock.now();
            let elapsed = state.elapsed(now);

            let tick = SurfaceUpdate::Stopwatch(StopwatchEvent::Tick { elapsed });
            if update_tx.send(tick).is_err() {
                // The sink is gone; freeze rather than measure unseen.
                tracing::warn!("display update channel closed, freezing stopwatch");
                state.pause(now);
                return false;
            }
            true
        });

        self.tick_loop = Some(tick_loop);
    }

    /// Cancels and discards the current tick loop, if any.
    fn halt_tick_loop(&mut self) {
        if let Some(tick_loop) = self.tick_loop.take() {
            tick_loop.cancel();
        }
    }

    fn send(&self, event: StopwatchEvent) {
        if self.update_tx.send(SurfaceUpdate::Stopwatch(event)).is_err() {
            tracing::warn!("display update channel closed, dropping stopwatch event");
        }
    }
}

impl std::fmt::Debug for StopwatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopwatchEngine")
            .field("state", &self.state)
            .field("has_active_tick_loop", &self.has_active_tick_loop())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
