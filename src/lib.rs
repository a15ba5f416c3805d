//! Chronotray
//!
//! A desktop countdown timer and stopwatch that minimizes to the system
//! tray instead of closing. This library provides:
//! - Countdown timer engine with a 1-second tick loop and a one-shot
//!   completion notification
//! - Stopwatch engine with lap marking and a ~100 ms tick loop
//! - Cross-thread update contract: background loops post display updates to
//!   the single foreground thread, which owns all surface mutation
//! - Window/tray residency lifecycle (closing the window hides it; only the
//!   tray menu or Ctrl-C quits)
//! - Static configuration for presets, window geometry, and colors

pub mod app;
pub mod clock;
pub mod config;
pub mod notify;
pub mod stopwatch;
pub mod surface;
pub mod ticker;
pub mod timer;
pub mod tray;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    DisplayUrgency, StopwatchPhase, StopwatchState, TimerPhase, TimerState,
    URGENT_THRESHOLD_SECS, WARNING_THRESHOLD_SECS,
};

// Re-export the engines and their events
pub use stopwatch::{StopwatchEngine, StopwatchError, StopwatchEvent, STOPWATCH_TICK_PERIOD};
pub use timer::{TimerEngine, TimerError, TimerEvent, TIMER_TICK_PERIOD};

// Re-export the surface contract
pub use surface::{ConsoleSurface, MockSurface, Surface, SurfaceUpdate, UpdateSink};

// Re-export the tray lifecycle
pub use tray::{
    MockTrayPresence, SurfaceVisibility, TrayAction, TrayError, TrayLifecycle, TrayManager,
    TrayPresence,
};

// Re-export notification types
pub use notify::{CompletionNotifier, DesktopNotifier, MockNotifier, NotifyError};

// Re-export clock sources
pub use clock::{Clock, ManualClock, SystemClock};

// Re-export application wiring
pub use app::{App, AppCommand};
pub use config::AppConfig;
