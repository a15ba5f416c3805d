//! Foreground display surface and the cross-thread update contract.
//!
//! Background tick loops never touch the visible surface. Every computed
//! state is wrapped in a [`SurfaceUpdate`] and sent over a crossbeam channel
//! to the foreground thread, which applies updates strictly in arrival
//! order through the [`UpdateSink`]. The [`Surface`] trait is the seam the
//! actual widget layer implements; this crate ships a tracing-backed
//! [`ConsoleSurface`] and a recording [`MockSurface`] for tests.

pub mod format;

use crate::config::Palette;
use crate::stopwatch::StopwatchEvent;
use crate::timer::TimerEvent;
use crate::types::DisplayUrgency;

// ============================================================================
// SurfaceUpdate
// ============================================================================

/// A display update marshaled from a background tick loop (or an engine
/// method) onto the foreground thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceUpdate {
    /// Countdown timer event
    Timer(TimerEvent),
    /// Stopwatch event
    Stopwatch(StopwatchEvent),
}

// ============================================================================
// Surface
// ============================================================================

/// The mutable display surface.
///
/// Implementations are only ever called from the foreground thread; the
/// trait deliberately has no synchronization requirements.
pub trait Surface {
    /// Makes the surface visible.
    fn show(&mut self);

    /// Hides the surface.
    fn hide(&mut self);

    /// Brings the surface to the foreground focus.
    fn focus(&mut self);

    /// Replaces the countdown readout.
    fn set_timer_display(&mut self, text: &str, urgency: DisplayUrgency);

    /// Replaces the stopwatch readout.
    fn set_stopwatch_display(&mut self, text: &str);

    /// Appends a lap row.
    fn push_lap(&mut self, number: usize, text: &str);

    /// Removes all lap rows.
    fn clear_laps(&mut self);
}

// ============================================================================
// UpdateSink
// ============================================================================

/// Idle countdown readout.
const TIMER_ZERO: &str = "00:00:00";

/// Idle stopwatch readout.
const STOPWATCH_ZERO: &str = "00:00:00.0";

/// Applies [`SurfaceUpdate`]s to a [`Surface`].
///
/// Stateless apart from the surface it drives; urgency is recomputed from
/// the remaining time carried by each update.
#[derive(Debug, Default)]
pub struct UpdateSink;

impl UpdateSink {
    /// Creates a new sink.
    pub fn new() -> Self {
        Self
    }

    /// Applies one update to the surface.
    pub fn apply(&self, surface: &mut dyn Surface, update: &SurfaceUpdate) {
        match update {
            SurfaceUpdate::Timer(event) => self.apply_timer(surface, event),
            SurfaceUpdate::Stopwatch(event) => self.apply_stopwatch(surface, event),
        }
    }

    fn apply_timer(&self, surface: &mut dyn Surface, event: &TimerEvent) {
        match event {
            TimerEvent::Started { remaining_seconds }
            | TimerEvent::Tick { remaining_seconds }
            | TimerEvent::Paused { remaining_seconds } => {
                surface.set_timer_display(
                    &format::format_clock(*remaining_seconds),
                    DisplayUrgency::for_remaining(*remaining_seconds),
                );
            }
            TimerEvent::Completed | TimerEvent::Reset => {
                surface.set_timer_display(TIMER_ZERO, DisplayUrgency::Normal);
            }
        }
    }

    fn apply_stopwatch(&self, surface: &mut dyn Surface, event: &StopwatchEvent) {
        match event {
            StopwatchEvent::Started => {}
            StopwatchEvent::Tick { elapsed } | StopwatchEvent::Paused { elapsed } => {
                surface.set_stopwatch_display(&format::format_elapsed(*elapsed));
            }
            StopwatchEvent::LapMarked { number, elapsed } => {
                surface.push_lap(*number, &format::format_lap(*elapsed));
            }
            StopwatchEvent::Reset => {
                surface.set_stopwatch_display(STOPWATCH_ZERO);
                surface.clear_laps();
            }
        }
    }
}

// ============================================================================
// ConsoleSurface
// ============================================================================

/// A surface that renders through the tracing subscriber.
///
/// Stands in for the widget layer, which is an external consumer of the
/// core; useful for running the binary headless and for manual debugging.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    visible: bool,
    palette: Palette,
}

impl ConsoleSurface {
    /// Creates a visible console surface with the default palette.
    pub fn new() -> Self {
        Self::with_palette(Palette::default())
    }

    /// Creates a visible console surface rendering with the given palette.
    pub fn with_palette(palette: Palette) -> Self {
        Self {
            visible: true,
            palette,
        }
    }

    /// Returns true while the surface is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Surface for ConsoleSurface {
    fn show(&mut self) {
        self.visible = true;
        tracing::info!("window shown");
    }

    fn hide(&mut self) {
        self.visible = false;
        tracing::info!("window hidden");
    }

    fn focus(&mut self) {
        tracing::info!("window focused");
    }

    fn set_timer_display(&mut self, text: &str, urgency: DisplayUrgency) {
        let color = self.palette.countdown_color(urgency);
        tracing::info!(display = %text, %color, "timer");
    }

    fn set_stopwatch_display(&mut self, text: &str) {
        tracing::debug!(display = %text, "stopwatch");
    }

    fn push_lap(&mut self, number: usize, text: &str) {
        tracing::info!("Lap {}: {}", number, text);
    }

    fn clear_laps(&mut self) {
        tracing::info!("laps cleared");
    }
}

// ============================================================================
// MockSurface
// ============================================================================

/// A surface that records every call, for tests.
#[derive(Debug, Default)]
pub struct MockSurface {
    /// Whether the surface is currently shown
    pub visible: bool,
    /// Last countdown readout
    pub timer_text: String,
    /// Last countdown urgency
    pub timer_urgency: Option<DisplayUrgency>,
    /// Last stopwatch readout
    pub stopwatch_text: String,
    /// Lap rows in append order
    pub laps: Vec<(usize, String)>,
    /// Number of show() calls
    pub show_count: u32,
    /// Number of hide() calls
    pub hide_count: u32,
    /// Number of focus() calls
    pub focus_count: u32,
}

impl MockSurface {
    /// Creates a visible mock surface.
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }
}

impl Surface for MockSurface {
    fn show(&mut self) {
        self.visible = true;
        self.show_count += 1;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.hide_count += 1;
    }

    fn focus(&mut self) {
        self.focus_count += 1;
    }

    fn set_timer_display(&mut self, text: &str, urgency: DisplayUrgency) {
        self.timer_text = text.to_string();
        self.timer_urgency = Some(urgency);
    }

    fn set_stopwatch_display(&mut self, text: &str) {
        self.stopwatch_text = text.to_string();
    }

    fn push_lap(&mut self, number: usize, text: &str) {
        self.laps.push((number, text.to_string()));
    }

    fn clear_laps(&mut self) {
        self.laps.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================
