//! Countdown timer engine.
//!
//! This module provides the countdown half of the application:
//! - State transitions (Idle → Running → Paused → Idle)
//! - Duration input parsing and validation
//! - A 1-second tick loop with cooperative cancellation
//! - A one-shot completion event when the countdown reaches zero

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::Sender;
use thiserror::Error;
use tokio::runtime::Handle;

use crate::surface::SurfaceUpdate;
use crate::ticker::TickLoop;
use crate::types::TimerState;

/// Fixed period of the countdown tick loop.
pub const TIMER_TICK_PERIOD: Duration = Duration::from_secs(1);

// ============================================================================
// TimerError
// ============================================================================

/// Errors reported for invalid countdown input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A duration field did not parse as a number.
    #[error("invalid {field} value {value:?}: enter a whole number")]
    InvalidInput {
        /// Which input field was rejected
        field: &'static str,
        /// The raw rejected text
        value: String,
    },

    /// The combined duration was zero or negative.
    #[error("enter a duration greater than zero")]
    InvalidDuration,

    /// The duration can only be changed while the timer is idle.
    #[error("the countdown is already in progress")]
    DurationLocked,
}

impl TimerError {
    /// Returns true if this error came from a non-numeric field.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Returns true if this error came from a non-positive total.
    #[must_use]
    pub fn is_invalid_duration(&self) -> bool {
        matches!(self, Self::InvalidDuration)
    }
}

// ============================================================================
// TimerEvent
// ============================================================================

/// Countdown events forwarded to the foreground update sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started or resumed
    Started {
        /// Seconds on the clock when the run began
        remaining_seconds: u64,
    },
    /// One second elapsed
    Tick {
        /// Seconds left after this tick
        remaining_seconds: u64,
    },
    /// Countdown frozen
    Paused {
        /// Seconds left at the pause
        remaining_seconds: u64,
    },
    /// Countdown reached zero; emitted exactly once per run
    Completed,
    /// Countdown cleared back to idle
    Reset,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Countdown engine owning the timer state and its tick loop.
///
/// Methods are called from the foreground thread; the tick loop runs on the
/// background runtime. Both sides touch the state through a short-lived
/// mutex, so a reset can never race a tick half-way through a decrement.
pub struct TimerEngine {
    /// Timer state shared with the tick loop
    state: Arc<Mutex<TimerState>>,
    /// Channel toward the foreground update sink
    update_tx: Sender<SurfaceUpdate>,
    /// Runtime the tick loop is spawned on
    runtime: Handle,
    /// The currently spawned tick loop, if any
    tick_loop: Option<TickLoop>,
}

impl TimerEngine {
    /// Creates a new idle engine.
    pub fn new(update_tx: Sender<SurfaceUpdate>, runtime: Handle) -> Self {
        Self {
            state: Arc::new(Mutex::new(TimerState::new())),
            update_tx,
            runtime,
            tick_loop: None,
        }
    }

    /// Parses the hours/minutes/seconds input fields and loads the countdown.
    ///
    /// Empty fields count as zero, matching spinbox-style inputs. Returns the
    /// total seconds loaded.
    ///
    /// # Errors
    ///
    /// [`TimerError::InvalidInput`] if a field is non-numeric,
    /// [`TimerError::InvalidDuration`] if the total is not positive, and
    /// [`TimerError::DurationLocked`] outside the idle phase.
    pub fn set_duration(
        &mut self,
        hours: &str,
        minutes: &str,
        seconds: &str,
    ) -> Result<u64, TimerError> {
        let h = parse_field("hours", hours)?;
        let m = parse_field("minutes", minutes)?;
        let s = parse_field("seconds", seconds)?;

        let total = h * 3600 + m * 60 + s;
        if total <= 0 {
            return Err(TimerError::InvalidDuration);
        }

        let mut state = self.state.lock().unwrap();
        if !state.is_idle() {
            return Err(TimerError::DurationLocked);
        }
        state.set_remaining(total as u64);

        tracing::debug!(total_seconds = total, "countdown duration loaded");
        Ok(total as u64)
    }

    /// Starts the countdown, or resumes it from a pause.
    ///
    /// Requires a loaded duration; resuming continues from the preserved
    /// remaining time. Starting while already running is a no-op.
    ///
    /// # Errors
    ///
    /// [`TimerError::InvalidDuration`] if no time is on the clock.
    pub fn start(&mut self) -> Result<(), TimerError> {
        let remaining = {
            let mut state = self.state.lock().unwrap();
            if state.is_running() {
                return Ok(());
            }
            if state.remaining_seconds == 0 {
                return Err(TimerError::InvalidDuration);
            }
            state.start();
            state.remaining_seconds
        };

        self.send(TimerEvent::Started {
            remaining_seconds: remaining,
        });

        self.spawn_tick_loop();
        tracing::info!(remaining_seconds = remaining, "countdown running");
        Ok(())
    }

    /// Freezes the countdown, preserving the remaining time.
    ///
    /// Stops the tick loop; a later [`start`](Self::start) spawns a fresh
    /// one. Pausing while not running is a no-op.
    pub fn pause(&mut self) {
        self.halt_tick_loop();

        let remaining = {
            let mut state = self.state.lock().unwrap();
            if !state.is_running() {
                return;
            }
            state.pause();
            state.remaining_seconds
        };

        self.send(TimerEvent::Paused {
            remaining_seconds: remaining,
        });
        tracing::info!(remaining_seconds = remaining, "countdown paused");
    }

    /// Clears the countdown back to idle from any phase.
    ///
    /// The tick loop is halted before the state is cleared, so no in-flight
    /// tick can write over the reset.
    pub fn reset(&mut self) {
        self.halt_tick_loop();

        self.state.lock().unwrap().reset();
        self.send(TimerEvent::Reset);
        tracing::info!("countdown reset");
    }

    /// Halts the tick loop without touching the countdown state.
    ///
    /// Used on application quit.
    pub fn shutdown(&mut self) {
        self.halt_tick_loop();
    }

    /// A snapshot of the current timer state.
    pub fn state(&self) -> TimerState {
        self.state.lock().unwrap().clone()
    }

    /// Returns true while a tick loop is alive for this engine.
    pub fn has_active_tick_loop(&self) -> bool {
        self.tick_loop.as_ref().is_some_and(TickLoop::is_active)
    }

    /// Spawns the 1-second tick loop unless one is already alive.
    fn spawn_tick_loop(&mut self) {
        if self.has_active_tick_loop() {
            return;
        }

        let state = Arc::clone(&self.state);
        let update_tx = self.update_tx.clone();

        let tick_loop = TickLoop::spawn(&self.runtime, TIMER_TICK_PERIOD, move || {
            let mut state = state.lock().unwrap();
            if !state.is_running() {
                return false;
            }

            let completed = state.tick();
            let remaining = state.remaining_seconds;

            let tick = SurfaceUpdate::Timer(TimerEvent::Tick {
                remaining_seconds: remaining,
            });
            if update_tx.send(tick).is_err() {
                // The sink is gone; freeze rather than count down unseen.
                tracing::warn!("display update channel closed, freezing countdown");
                if !completed {
                    state.pause();
                }
                return false;
            }

            if completed {
                let _ = update_tx.send(SurfaceUpdate::Timer(TimerEvent::Completed));
                tracing::info!("countdown completed");
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

    fn send(&self, event: TimerEvent) {
        if self.update_tx.send(SurfaceUpdate::Timer(event)).is_err() {
            tracing::warn!("display update channel closed, dropping timer event");
        }
    }

    /// Overwrites the remaining time directly (for testing).
    #[cfg(test)]
    fn force_remaining(&self, remaining_seconds: u64) {
        self.state.lock().unwrap().remaining_seconds = remaining_seconds;
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("has_active_tick_loop", &self.has_active_tick_loop())
            .finish_non_exhaustive()
    }
}

/// Parses one duration input field; empty text counts as zero.
fn parse_field(field: &'static str, value: &str) -> Result<i64, TimerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<i64>().map_err(|_| TimerError::InvalidInput {
        field,
        value: value.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimerPhase;
    use crossbeam_channel::{unbounded, Receiver};

    fn create_engine() -> (TimerEngine, Receiver<SurfaceUpdate>) {
        let (tx, rx) = unbounded();
        let engine = TimerEngine::new(tx, Handle::current());
        (engine, rx)
    }

    fn drain_timer_events(rx: &Receiver<SurfaceUpdate>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(update) = rx.try_recv() {
            if let SurfaceUpdate::Timer(event) = update {
                events.push(event);
            }
        }
        events
    }

    // ------------------------------------------------------------------------
    // Duration Parsing Tests
    // ------------------------------------------------------------------------

    mod set_duration_tests {
        use super::*;

        #[tokio::test]
        async fn test_valid_duration_arithmetic() {
            let (mut engine, _rx) = create_engine();

            let total = engine.set_duration("1", "2", "3").unwrap();

            assert_eq!(total, 3723);
            assert_eq!(engine.state().remaining_seconds, 3723);
            assert_eq!(engine.state().phase, TimerPhase::Idle);
        }

        #[tokio::test]
        async fn test_empty_fields_count_as_zero() {
            let (mut engine, _rx) = create_engine();

            let total = engine.set_duration("", "5", "").unwrap();

            assert_eq!(total, 300);
        }

        #[tokio::test]
        async fn test_whitespace_fields_count_as_zero() {
            let (mut engine, _rx) = create_engine();

            let total = engine.set_duration("  ", "0", "45").unwrap();

            assert_eq!(total, 45);
        }

        #[tokio::test]
        async fn test_non_numeric_field_rejected() {
            let (mut engine, _rx) = create_engine();

            let err = engine.set_duration("0", "abc", "0").unwrap_err();

            assert!(err.is_invalid_input());
            assert_eq!(
                err,
                TimerError::InvalidInput {
                    field: "minutes",
                    value: "abc".to_string()
                }
            );
            assert_eq!(engine.state().remaining_seconds, 0);
        }

        #[tokio::test]
        async fn test_zero_total_rejected() {
            let (mut engine, _rx) = create_engine();

            let err = engine.set_duration("0", "0", "0").unwrap_err();

            assert!(err.is_invalid_duration());
        }

        #[tokio::test]
        async fn test_negative_total_rejected() {
            let (mut engine, _rx) = create_engine();

            // Negative fields parse, but the total is not a valid duration
            let err = engine.set_duration("0", "-5", "0").unwrap_err();

            assert_eq!(err, TimerError::InvalidDuration);
        }

        #[tokio::test]
        async fn test_rejected_input_leaves_state_untouched() {
            let (mut engine, _rx) = create_engine();
            engine.set_duration("0", "1", "0").unwrap();

            let _ = engine.set_duration("x", "1", "0");

            assert_eq!(engine.state().remaining_seconds, 60);
            assert!(engine.state().is_idle());
        }

        #[tokio::test]
        async fn test_duration_locked_while_running() {
            let (mut engine, _rx) = create_engine();
            engine.set_duration("0", "0", "30").unwrap();
            engine.start().unwrap();

            let err = engine.set_duration("0", "1", "0").unwrap_err();

            assert_eq!(err, TimerError::DurationLocked);
            engine.reset();
        }

        #[tokio::test]
        async fn test_duration_locked_while_paused() {
            let (mut engine, _rx) = create_engine();
            engine.set_duration("0", "0", "30").unwrap();
            engine.start().unwrap();
            engine.pause();

            let err = engine.set_duration("0", "1", "0").unwrap_err();

            assert_eq!(err, TimerError::DurationLocked);
        }
    }

    // ------------------------------------------------------------------------
    // Transition Tests
    // ------------------------------------------------------------------------

    mod transition_tests {
        use super::*;

        #[tokio::test]
        async fn test_start_requires_loaded_duration() {
            let (mut engine, _rx) = create_engine();

            let err = engine.start().unwrap_err();

            assert_eq!(err, TimerError::InvalidDuration);
            assert!(engine.state().is_idle());
            assert!(!engine.has_active_tick_loop());
        }

        #[tokio::test]
        async fn test_start_emits_started_with_full_total() {
            let (mut engine, rx) = create_engine();
            engine.set_duration("0", "0", "5").unwrap();

            engine.start().unwrap();

            // Remaining equals the loaded total before any tick
            assert_eq!(engine.state().remaining_seconds, 5);
            assert_eq!(
                drain_timer_events(&rx),
                vec![TimerEvent::Started {
                    remaining_seconds: 5
                }]
            );
            engine.reset();
        }

        #[tokio::test]
        async fn test_start_spawns_one_tick_loop() {
            let (mut engine, _rx) = create_engine();
            engine.set_duration("0", "1", "0").unwrap();

            engine.start().unwrap();
            assert!(engine.has_active_tick_loop());

            // A second start is a no-op and must not spawn another loop
            engine.start().unwrap();
            assert!(engine.has_active_tick_loop());

            engine.reset();
        }

        #[tokio::test]
        async fn test_pause_preserves_remaining_and_halts_loop() {
            let (mut engine, rx) = create_engine();
            engine.set_duration("0", "1", "0").unwrap();
            engine.start().unwrap();
            let _ = drain_timer_events(&rx);

            engine.pause();

            let state = engine.state();
            assert_eq!(state.phase, TimerPhase::Paused);
            assert_eq!(state.remaining_seconds, 60);
            assert_eq!(
                drain_timer_events(&rx),
                vec![TimerEvent::Paused {
                    remaining_seconds: 60
                }]
            );
        }

        #[tokio::test]
        async fn test_pause_when_idle_is_noop() {
            let (mut engine, rx) = create_engine();

            engine.pause();

            assert!(engine.state().is_idle());
            assert!(drain_timer_events(&rx).is_empty());
        }

        #[tokio::test]
        async fn test_resume_continues_from_paused_remaining() {
            let (mut engine, rx) = create_engine();
            engine.set_duration("0", "0", "3").unwrap();
            engine.start().unwrap();

            // One simulated tick, then pause at remaining=2
            engine.force_remaining(2);
            engine.pause();
            let _ = drain_timer_events(&rx);

            engine.start().unwrap();

            assert_eq!(engine.state().remaining_seconds, 2);
            assert_eq!(engine.state().phase, TimerPhase::Running);
            assert_eq!(
                drain_timer_events(&rx),
                vec![TimerEvent::Started {
                    remaining_seconds: 2
                }]
            );
            engine.reset();
        }

        #[tokio::test]
        async fn test_reset_from_every_phase() {
            let (mut engine, rx) = create_engine();

            // Idle
            engine.reset();
            assert!(engine.state().is_idle());

            // Running
            engine.set_duration("0", "0", "10").unwrap();
            engine.start().unwrap();
            engine.reset();
            assert!(engine.state().is_idle());
            assert_eq!(engine.state().remaining_seconds, 0);

            // Paused
            engine.set_duration("0", "0", "10").unwrap();
            engine.start().unwrap();
            engine.pause();
            engine.reset();
            assert!(engine.state().is_idle());
            assert_eq!(engine.state().remaining_seconds, 0);

            let _ = drain_timer_events(&rx);
        }

        #[tokio::test]
        async fn test_reset_leaves_no_active_loop() {
            let (mut engine, _rx) = create_engine();
            engine.set_duration("0", "1", "0").unwrap();
            engine.start().unwrap();

            engine.reset();
            tokio::time::sleep(Duration::from_millis(20)).await;

            assert!(!engine.has_active_tick_loop());
        }
    }

    // ------------------------------------------------------------------------
    // Tick Loop Tests
    // ------------------------------------------------------------------------

    mod tick_loop_tests {
        use super::*;

        #[tokio::test]
        async fn test_ticks_decrement_and_emit() {
            let (mut engine, rx) = create_engine();
            engine.set_duration("0", "1", "0").unwrap();
            engine.start().unwrap();
            let _ = drain_timer_events(&rx);

            tokio::time::sleep(Duration::from_millis(2200)).await;
            engine.pause();

            let state = engine.state();
            assert!((57..=58).contains(&state.remaining_seconds));

            let events = drain_timer_events(&rx);
            let ticks: Vec<_> = events
                .iter()
                .filter_map(|e| match e {
                    TimerEvent::Tick { remaining_seconds } => Some(*remaining_seconds),
                    _ => None,
                })
                .collect();
            // Two ticks in ~2.2 s; a slow scheduler may squeeze in a third
            assert!(
                ticks.starts_with(&[59, 58]) && ticks.len() <= 3,
                "unexpected ticks {:?}",
                ticks
            );
        }

        #[tokio::test]
        async fn test_completion_fires_exactly_once() {
            let (mut engine, rx) = create_engine();
            engine.set_duration("0", "0", "2").unwrap();
            engine.start().unwrap();

            tokio::time::sleep(Duration::from_millis(3500)).await;

            let state = engine.state();
            assert_eq!(state.phase, TimerPhase::Idle);
            assert_eq!(state.remaining_seconds, 0);
            assert!(!engine.has_active_tick_loop());

            let events = drain_timer_events(&rx);
            let completions = events
                .iter()
                .filter(|e| matches!(e, TimerEvent::Completed))
                .count();
            assert_eq!(completions, 1);
        }

        #[tokio::test]
        async fn test_no_ticks_while_paused() {
            let (mut engine, rx) = create_engine();
            engine.set_duration("0", "1", "0").unwrap();
            engine.start().unwrap();
            engine.pause();
            let _ = drain_timer_events(&rx);

            tokio::time::sleep(Duration::from_millis(1500)).await;

            assert!(drain_timer_events(&rx).is_empty());
            assert_eq!(engine.state().remaining_seconds, 60);
        }

        #[tokio::test]
        async fn test_restart_after_completion() {
            let (mut engine, rx) = create_engine();
            engine.set_duration("0", "0", "1").unwrap();
            engine.start().unwrap();

            tokio::time::sleep(Duration::from_millis(2500)).await;
            assert!(engine.state().is_idle());
            let _ = drain_timer_events(&rx);

            // The machine is reusable after a natural completion
            engine.set_duration("0", "0", "30").unwrap();
            engine.start().unwrap();
            assert!(engine.has_active_tick_loop());
            assert_eq!(engine.state().remaining_seconds, 30);
            engine.reset();
        }
    }
}
