//! Static application configuration.
//!
//! Presets, window geometry, and the display palette are read-only inputs
//! to the core: nothing here changes how the state machines behave. The
//! urgency thresholds are deliberately *not* configuration - they live with
//! the timer types.

use serde::{Deserialize, Serialize};

use crate::types::DisplayUrgency;

// ============================================================================
// Preset
// ============================================================================

/// A named countdown preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Button label
    pub label: String,
    /// Countdown length in minutes
    pub minutes: u32,
}

impl Preset {
    /// Creates a new preset.
    pub fn new(label: impl Into<String>, minutes: u32) -> Self {
        Self {
            label: label.into(),
            minutes,
        }
    }

    /// The hours/minutes/seconds input fields this preset fills in.
    pub fn input_fields(&self) -> (String, String, String) {
        ("0".to_string(), self.minutes.to_string(), "0".to_string())
    }
}

// ============================================================================
// WindowGeometry
// ============================================================================

/// Fixed window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            width: 500,
            height: 250,
        }
    }
}

// ============================================================================
// Palette
// ============================================================================

/// Display colors keyed by state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Countdown color with plenty of time left
    pub normal: String,
    /// Countdown color at 30 seconds or less
    pub warning: String,
    /// Countdown color at 10 seconds or less
    pub urgent: String,
    /// Stopwatch readout color
    pub stopwatch: String,
}

impl Palette {
    /// The countdown color for the given display urgency.
    pub fn countdown_color(&self, urgency: DisplayUrgency) -> &str {
        match urgency {
            DisplayUrgency::Normal => &self.normal,
            DisplayUrgency::Warning => &self.warning,
            DisplayUrgency::Urgent => &self.urgent,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            normal: "lime".to_string(),
            warning: "orange".to_string(),
            urgent: "red".to_string(),
            stopwatch: "cyan".to_string(),
        }
    }
}

// ============================================================================
// AppConfig
// ============================================================================

/// Complete static configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Countdown presets shown as quick buttons
    pub presets: Vec<Preset>,
    /// Fixed window size
    pub window: WindowGeometry,
    /// Display colors
    pub palette: Palette,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            presets: vec![
                Preset::new("5 min", 5),
                Preset::new("10 min", 10),
                Preset::new("15 min", 15),
                Preset::new("30 min", 30),
                Preset::new("1 hour", 60),
            ],
            window: WindowGeometry::default(),
            palette: Palette::default(),
        }
    }
}

impl AppConfig {
    /// Looks up a preset by its label.
    pub fn preset(&self, label: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.label == label)
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(preset) = self.presets.iter().find(|p| p.minutes == 0) {
            return Err(format!("preset {:?} has a zero duration", preset.label));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err("window geometry must be non-zero".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
