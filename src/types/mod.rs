//! Core data types for the countdown timer and the stopwatch.
//!
//! This module defines the data structures used for:
//! - Countdown timer state management
//! - Stopwatch state management (elapsed time and laps)
//! - Display urgency classification for the countdown display

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

// ============================================================================
// TimerPhase
// ============================================================================

/// Represents the current phase of the countdown timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// No countdown is configured or running
    Idle,
    /// Counting down
    Running,
    /// Countdown frozen, remaining time preserved
    Paused,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
        }
    }
}

impl Default for TimerPhase {
    fn default() -> Self {
        TimerPhase::Idle
    }
}

// ============================================================================
// DisplayUrgency
// ============================================================================

/// Remaining time at or below this many seconds renders as urgent.
pub const URGENT_THRESHOLD_SECS: u64 = 10;

/// Remaining time at or below this many seconds renders as a warning.
pub const WARNING_THRESHOLD_SECS: u64 = 30;

/// Visual urgency of the countdown display.
///
/// Derived from the remaining time on every tick; an idle timer always
/// renders as `Normal` regardless of the (zeroed) remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayUrgency {
    /// More than 30 seconds remaining
    Normal,
    /// 30 seconds or less remaining
    Warning,
    /// 10 seconds or less remaining
    Urgent,
}

impl DisplayUrgency {
    /// Classifies a remaining-seconds value against the fixed thresholds.
    pub fn for_remaining(remaining_seconds: u64) -> Self {
        if remaining_seconds <= URGENT_THRESHOLD_SECS {
            DisplayUrgency::Urgent
        } else if remaining_seconds <= WARNING_THRESHOLD_SECS {
            DisplayUrgency::Warning
        } else {
            DisplayUrgency::Normal
        }
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Represents the current state of the countdown timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    /// Current phase of the timer
    pub phase: TimerPhase,
    /// Remaining seconds in the countdown
    pub remaining_seconds: u64,
}

impl TimerState {
    /// Creates a new TimerState in the idle state.
    pub fn new() -> Self {
        Self {
            phase: TimerPhase::Idle,
            remaining_seconds: 0,
        }
    }

    /// Loads a countdown duration. Only meaningful while idle; the engine
    /// validates the transition before calling this.
    pub fn set_remaining(&mut self, total_seconds: u64) {
        self.remaining_seconds = total_seconds;
    }

    /// Transitions into the running phase.
    pub fn start(&mut self) {
        self.phase = TimerPhase::Running;
    }

    /// Freezes the countdown, preserving the remaining time.
    pub fn pause(&mut self) {
        if self.phase == TimerPhase::Running {
            self.phase = TimerPhase::Paused;
        }
    }

    /// Returns the timer to idle and clears the remaining time.
    pub fn reset(&mut self) {
        self.phase = TimerPhase::Idle;
        self.remaining_seconds = 0;
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the countdown has completed (reached 0). Completion
    /// also transitions the timer back to idle, keeping the invariant that a
    /// zeroed timer is never running.
    pub fn tick(&mut self) -> bool {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        if self.remaining_seconds == 0 {
            self.phase = TimerPhase::Idle;
            true
        } else {
            false
        }
    }

    /// Returns true if the timer is actively counting down.
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Returns true if the timer is paused.
    pub fn is_paused(&self) -> bool {
        self.phase == TimerPhase::Paused
    }

    /// Returns true if the timer is idle.
    pub fn is_idle(&self) -> bool {
        self.phase == TimerPhase::Idle
    }

    /// Display urgency for the current state.
    ///
    /// An idle timer renders normally; while running or paused the fixed
    /// 10s/30s thresholds apply.
    pub fn urgency(&self) -> DisplayUrgency {
        match self.phase {
            TimerPhase::Idle => DisplayUrgency::Normal,
            TimerPhase::Running | TimerPhase::Paused => {
                DisplayUrgency::for_remaining(self.remaining_seconds)
            }
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// StopwatchPhase
// ============================================================================

/// Represents the current phase of the stopwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopwatchPhase {
    /// Elapsed time is zero and nothing is being measured
    Idle,
    /// Elapsed time is advancing
    Running,
    /// Elapsed time frozen at the pause instant
    Paused,
}

impl Default for StopwatchPhase {
    fn default() -> Self {
        StopwatchPhase::Idle
    }
}

// ============================================================================
// StopwatchState
// ============================================================================

/// Represents the current state of the stopwatch.
///
/// The elapsed time is never stored directly while running; it is recomputed
/// from the running-since instant on every read, so it is monotonically
/// non-decreasing for the lifetime of a run. Laps are append-only while
/// running; the 1-based position of a lap is its lap number.
#[derive(Debug, Clone)]
pub struct StopwatchState {
    /// Current phase of the stopwatch
    pub phase: StopwatchPhase,
    /// Elapsed time accumulated over previous run segments
    accumulated: Duration,
    /// Clock reading when the current run segment started
    running_since: Option<Instant>,
    /// Lap checkpoints, relative to stopwatch start
    laps: Vec<Duration>,
}

impl StopwatchState {
    /// Creates a new StopwatchState in the idle state.
    pub fn new() -> Self {
        Self {
            phase: StopwatchPhase::Idle,
            accumulated: Duration::ZERO,
            running_since: None,
            laps: Vec::new(),
        }
    }

    /// Starts (or resumes) measuring from the given clock reading.
    ///
    /// From idle this begins a fresh run; from paused the previously frozen
    /// elapsed time is kept as the accumulated base and a new run segment
    /// starts at `now`. Starting while already running is a no-op.
    pub fn start(&mut self, now: Instant) {
        if self.phase == StopwatchPhase::Running {
            return;
        }
        self.phase = StopwatchPhase::Running;
        self.running_since = Some(now);
    }

    /// Freezes the elapsed time at the given clock reading.
    pub fn pause(&mut self, now: Instant) {
        if self.phase != StopwatchPhase::Running {
            return;
        }
        self.accumulated = self.elapsed(now);
        self.running_since = None;
        self.phase = StopwatchPhase::Paused;
    }

    /// Returns the stopwatch to idle, clearing elapsed time and laps.
    pub fn reset(&mut self) {
        self.phase = StopwatchPhase::Idle;
        self.accumulated = Duration::ZERO;
        self.running_since = None;
        self.laps.clear();
    }

    /// Elapsed time at the given clock reading.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + now.saturating_duration_since(since),
            None => self.accumulated,
        }
    }

    /// Records a lap at the given clock reading.
    ///
    /// Valid only while running. Returns the 1-based lap number and the lap
    /// value on success, `None` otherwise.
    pub fn mark_lap(&mut self, now: Instant) -> Option<(usize, Duration)> {
        if self.phase != StopwatchPhase::Running {
            return None;
        }
        let lap = self.elapsed(now);
        self.laps.push(lap);
        Some((self.laps.len(), lap))
    }

    /// Recorded laps in append order.
    pub fn laps(&self) -> &[Duration] {
        &self.laps
    }

    /// Returns true if elapsed time is advancing.
    pub fn is_running(&self) -> bool {
        self.phase == StopwatchPhase::Running
    }

    /// Returns true if the stopwatch is paused.
    pub fn is_paused(&self) -> bool {
        self.phase == StopwatchPhase::Paused
    }
}

impl Default for StopwatchState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
