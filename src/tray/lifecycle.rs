//! Window/tray residency lifecycle.
//!
//! The application is either showing its window or residing in the tray,
//! never both and never neither (outside the transition itself). This
//! module owns that two-state machine. It deliberately knows nothing about
//! the timer or the stopwatch: hiding the window never disturbs the
//! background tick loops.

use crate::surface::Surface;
use crate::tray::TrayPresence;

// ============================================================================
// SurfaceVisibility
// ============================================================================

/// Where the application currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceVisibility {
    /// The window is shown; no tray icon
    Visible,
    /// The window is hidden; the tray icon represents the process
    Hidden,
}

// ============================================================================
// TrayLifecycle
// ============================================================================

/// Coordinates the window surface and the tray presence.
///
/// All methods run on the foreground thread, which is the only thread
/// allowed to mutate the surface.
pub struct TrayLifecycle {
    visibility: SurfaceVisibility,
    presence: Box<dyn TrayPresence>,
}

impl TrayLifecycle {
    /// Creates a lifecycle in the visible state.
    pub fn new(presence: Box<dyn TrayPresence>) -> Self {
        Self {
            visibility: SurfaceVisibility::Visible,
            presence,
        }
    }

    /// The current residency state.
    pub fn visibility(&self) -> SurfaceVisibility {
        self.visibility
    }

    /// Returns true while residing in the tray.
    pub fn is_hidden(&self) -> bool {
        self.visibility == SurfaceVisibility::Hidden
    }

    /// Returns true while the tray icon is actually shown.
    pub fn presence_active(&self) -> bool {
        self.presence.is_active()
    }

    /// Hides the window and activates the tray presence.
    ///
    /// Idempotent: a second call while already hidden does nothing. If the
    /// tray backend fails, the window stays hidden without an icon and the
    /// failure is logged; it never takes the process down.
    pub fn minimize_to_tray(&mut self, surface: &mut dyn Surface) {
        if self.is_hidden() {
            tracing::debug!("already residing in tray");
            return;
        }

        surface.hide();
        self.visibility = SurfaceVisibility::Hidden;

        if let Err(error) = self.presence.activate() {
            tracing::warn!(%error, "tray presence unavailable, window hidden without a tray icon");
        } else {
            tracing::info!("minimized to tray");
        }
    }

    /// Deactivates the tray presence and brings the window back into focus.
    ///
    /// Must be called from the foreground thread, as it mutates the surface.
    pub fn restore_from_tray(&mut self, surface: &mut dyn Surface) {
        if !self.is_hidden() {
            return;
        }

        self.presence.deactivate();
        surface.show();
        surface.focus();
        self.visibility = SurfaceVisibility::Visible;
        tracing::info!("restored from tray");
    }

    /// Drops the tray presence on application quit.
    pub fn shutdown(&mut self) {
        self.presence.deactivate();
    }
}

impl std::fmt::Debug for TrayLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrayLifecycle")
            .field("visibility", &self.visibility)
            .field("presence_active", &self.presence.is_active())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MockSurface;
    use crate::tray::MockTrayPresence;

    fn create_lifecycle() -> (TrayLifecycle, MockTrayPresence, MockSurface) {
        let presence = MockTrayPresence::new();
        let lifecycle = TrayLifecycle::new(Box::new(presence.clone()));
        (lifecycle, presence, MockSurface::new())
    }

    #[test]
    fn test_starts_visible_without_presence() {
        let (lifecycle, presence, _surface) = create_lifecycle();

        assert_eq!(lifecycle.visibility(), SurfaceVisibility::Visible);
        assert!(!lifecycle.is_hidden());
        assert_eq!(presence.activation_count(), 0);
    }

    #[test]
    fn test_minimize_hides_and_activates() {
        let (mut lifecycle, presence, mut surface) = create_lifecycle();

        lifecycle.minimize_to_tray(&mut surface);

        assert!(lifecycle.is_hidden());
        assert!(!surface.visible);
        assert_eq!(surface.hide_count, 1);
        assert_eq!(presence.activation_count(), 1);
        assert!(presence.is_active());
    }

    #[test]
    fn test_minimize_is_idempotent() {
        let (mut lifecycle, presence, mut surface) = create_lifecycle();

        lifecycle.minimize_to_tray(&mut surface);
        lifecycle.minimize_to_tray(&mut surface);

        // Hidden exactly once, one tray icon
        assert_eq!(surface.hide_count, 1);
        assert_eq!(presence.activation_count(), 1);
    }

    #[test]
    fn test_restore_shows_focuses_and_deactivates() {
        let (mut lifecycle, presence, mut surface) = create_lifecycle();
        lifecycle.minimize_to_tray(&mut surface);

        lifecycle.restore_from_tray(&mut surface);

        assert_eq!(lifecycle.visibility(), SurfaceVisibility::Visible);
        assert!(surface.visible);
        assert_eq!(surface.show_count, 1);
        assert_eq!(surface.focus_count, 1);
        assert_eq!(presence.deactivation_count(), 1);
        assert!(!presence.is_active());
    }

    #[test]
    fn test_restore_while_visible_is_noop() {
        let (mut lifecycle, presence, mut surface) = create_lifecycle();

        lifecycle.restore_from_tray(&mut surface);

        assert_eq!(surface.show_count, 0);
        assert_eq!(presence.deactivation_count(), 0);
    }

    #[test]
    fn test_exactly_one_of_window_or_tray() {
        let (mut lifecycle, presence, mut surface) = create_lifecycle();

        // Visible: window shown, no tray icon
        assert!(surface.visible && !presence.is_active());

        lifecycle.minimize_to_tray(&mut surface);
        assert!(!surface.visible && presence.is_active());

        lifecycle.restore_from_tray(&mut surface);
        assert!(surface.visible && !presence.is_active());
    }

    #[test]
    fn test_presence_failure_degrades_to_plain_hide() {
        let (mut lifecycle, presence, mut surface) = create_lifecycle();
        presence.fail_next_activation();

        lifecycle.minimize_to_tray(&mut surface);

        // The window still hides; no icon, no crash
        assert!(lifecycle.is_hidden());
        assert!(!surface.visible);
        assert!(!presence.is_active());
    }

    #[test]
    fn test_minimize_restore_cycles() {
        let (mut lifecycle, presence, mut surface) = create_lifecycle();

        for _ in 0..3 {
            lifecycle.minimize_to_tray(&mut surface);
            lifecycle.restore_from_tray(&mut surface);
        }

        assert_eq!(presence.activation_count(), 3);
        assert_eq!(presence.deactivation_count(), 3);
        assert!(surface.visible);
    }

    #[test]
    fn test_shutdown_deactivates_presence() {
        let (mut lifecycle, presence, mut surface) = create_lifecycle();
        lifecycle.minimize_to_tray(&mut surface);

        lifecycle.shutdown();

        assert!(!presence.is_active());
    }
}
