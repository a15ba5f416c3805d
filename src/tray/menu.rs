//! Tray menu configuration and action mapping.
//!
//! The menu semantics are platform-independent and fully testable: a
//! [`MenuConfig`] describes the items, and clicked items resolve to a
//! [`TrayAction`]. Building the native menu with tray-icon happens in the
//! platform-specific code.

use std::fmt;

// ============================================================================
// TrayAction
// ============================================================================

/// Actions that can be triggered from the tray menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrayAction {
    /// Bring the window back from the tray
    Restore,
    /// Quit the application
    Quit,
}

impl fmt::Display for TrayAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrayAction::Restore => write!(f, "restore"),
            TrayAction::Quit => write!(f, "quit"),
        }
    }
}

// ============================================================================
// MenuItemConfig
// ============================================================================

/// Configuration for a tray menu item.
#[derive(Debug, Clone)]
pub struct MenuItemConfig {
    /// Display text for the menu item
    pub text: String,
    /// Whether the menu item is enabled (clickable)
    pub enabled: bool,
}

impl MenuItemConfig {
    /// Creates a new menu item configuration.
    pub fn new(text: impl Into<String>, enabled: bool) -> Self {
        Self {
            text: text.into(),
            enabled,
        }
    }
}

// ============================================================================
// MenuConfig
// ============================================================================

/// Complete tray menu configuration.
#[derive(Debug, Clone)]
pub struct MenuConfig {
    /// Title item (always disabled, shows the app name)
    pub title: MenuItemConfig,
    /// Restore-from-tray entry
    pub restore: MenuItemConfig,
    /// Quit entry
    pub quit: MenuItemConfig,
}

// ============================================================================
// MenuBuilder
// ============================================================================

/// Builds the tray menu configuration.
#[derive(Debug, Default)]
pub struct MenuBuilder;

impl MenuBuilder {
    /// Creates a new MenuBuilder.
    pub fn new() -> Self {
        Self
    }

    /// Builds the tray menu.
    ///
    /// The tray only exists while the window is hidden, so both actions are
    /// always enabled.
    pub fn build(&self) -> MenuConfig {
        MenuConfig {
            title: MenuItemConfig::new("Chronotray", false),
            restore: MenuItemConfig::new("Show", true),
            quit: MenuItemConfig::new("Quit", true),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
