//! System tray integration.
//!
//! This module provides:
//! - The abstract tray-presence capability used by the residency lifecycle
//! - A tray-icon backed implementation on desktops that support it
//! - Menu action mapping from clicked items to [`TrayAction`]s
//!
//! # Architecture
//!
//! The module is split into platform-independent and platform-specific
//! parts:
//!
//! - `menu.rs`: menu configuration and actions (platform-independent,
//!   fully testable)
//! - `lifecycle.rs`: Visible/Hidden residency machine (platform-independent,
//!   fully testable)
//! - `mod.rs`: [`TrayManager`] (platform-specific where a native backend
//!   exists, degraded no-op elsewhere)
//!
//! The tray icon must be created on the foreground thread; menu click
//! events are forwarded from tray-icon's channel to the application as
//! [`TrayAction`]s.

pub mod lifecycle;
pub mod menu;

pub use lifecycle::{SurfaceVisibility, TrayLifecycle};
pub use menu::{MenuBuilder, MenuConfig, MenuItemConfig, TrayAction};

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use thiserror::Error;

#[cfg(any(target_os = "macos", target_os = "windows"))]
use std::collections::HashMap;
#[cfg(any(target_os = "macos", target_os = "windows"))]
use std::sync::Mutex;

// ============================================================================
// TrayError
// ============================================================================

/// Errors from the tray backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrayError {
    /// No native tray backend exists on this platform.
    #[error("system tray is not supported on this platform")]
    Unsupported,

    /// The native backend rejected the icon or menu.
    #[error("failed to create tray icon: {0}")]
    Backend(String),
}

// ============================================================================
// TrayPresence
// ============================================================================

/// The abstract tray-presence capability.
///
/// The residency lifecycle only ever talks to this trait; a failing
/// implementation degrades minimize-to-tray to a plain visual hide.
pub trait TrayPresence {
    /// Shows the tray icon. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns a [`TrayError`] if the icon cannot be shown; the caller is
    /// expected to log and carry on.
    fn activate(&mut self) -> Result<(), TrayError>;

    /// Removes the tray icon. Idempotent.
    fn deactivate(&mut self);

    /// Returns true while the tray icon is shown.
    fn is_active(&self) -> bool;
}

// ============================================================================
// TrayManager
// ============================================================================

/// Tray presence backed by the native system tray.
///
/// Menu clicks are resolved to [`TrayAction`]s and forwarded over the
/// channel handed to [`TrayManager::new`]. On platforms without a native
/// backend every activation fails with [`TrayError::Unsupported`] and the
/// application keeps running without an icon.
pub struct TrayManager {
    /// Channel toward the foreground loop for resolved menu actions
    #[cfg_attr(
        not(any(target_os = "macos", target_os = "windows")),
        allow(dead_code)
    )]
    action_tx: Sender<TrayAction>,
    /// The live tray icon, while active
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    icon: Option<tray_icon::TrayIcon>,
    /// Maps native menu item ids to actions; shared with the forwarder
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    actions: Arc<Mutex<HashMap<tray_icon::menu::MenuId, TrayAction>>>,
    /// Whether the menu event forwarder thread has been started
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    forwarder_started: bool,
}

impl TrayManager {
    /// Creates an inactive manager; the icon is built on first activation.
    pub fn new(action_tx: Sender<TrayAction>) -> Self {
        Self {
            action_tx,
            #[cfg(any(target_os = "macos", target_os = "windows"))]
            icon: None,
            #[cfg(any(target_os = "macos", target_os = "windows"))]
            actions: Arc::new(Mutex::new(HashMap::new())),
            #[cfg(any(target_os = "macos", target_os = "windows"))]
            forwarder_started: false,
        }
    }

    /// Starts the thread that turns native menu events into [`TrayAction`]s.
    ///
    /// tray-icon hands out one process-wide crossbeam receiver, so a single
    /// forwarder survives any number of activate/deactivate cycles.
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    fn spawn_menu_forwarder(&mut self) {
        if self.forwarder_started {
            return;
        }
        self.forwarder_started = true;

        let actions = Arc::clone(&self.actions);
        let action_tx = self.action_tx.clone();

        std::thread::spawn(move || {
            let receiver = tray_icon::menu::MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                let action = actions.lock().unwrap().get(&event.id).copied();
                if let Some(action) = action {
                    tracing::info!(%action, "tray menu action");
                    if action_tx.send(action).is_err() {
                        break;
                    }
                }
            }
        });
    }
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
impl TrayPresence for TrayManager {
    fn activate(&mut self) -> Result<(), TrayError> {
        use tray_icon::menu::{Menu, MenuItem, PredefinedMenuItem};
        use tray_icon::TrayIconBuilder;

        if self.icon.is_some() {
            return Ok(());
        }

        let config = MenuBuilder::new().build();
        let menu = Menu::new();

        let title_item = MenuItem::new(&config.title.text, config.title.enabled, None);
        let restore_item = MenuItem::new(&config.restore.text, config.restore.enabled, None);
        let quit_item = MenuItem::new(&config.quit.text, config.quit.enabled, None);

        {
            let mut actions = self.actions.lock().unwrap();
            actions.clear();
            actions.insert(restore_item.id().clone(), TrayAction::Restore);
            actions.insert(quit_item.id().clone(), TrayAction::Quit);
        }

        menu.append(&title_item).map_err(backend_error)?;
        menu.append(&PredefinedMenuItem::separator())
            .map_err(backend_error)?;
        menu.append(&restore_item).map_err(backend_error)?;
        menu.append(&quit_item).map_err(backend_error)?;

        let icon = TrayIconBuilder::new()
            .with_title("Chronotray")
            .with_menu(Box::new(menu))
            .with_tooltip("Chronotray - timer & stopwatch")
            .build()
            .map_err(backend_error)?;

        self.icon = Some(icon);
        self.spawn_menu_forwarder();
        tracing::info!("tray icon activated");
        Ok(())
    }

    fn deactivate(&mut self) {
        if self.icon.take().is_some() {
            tracing::info!("tray icon deactivated");
        }
    }

    fn is_active(&self) -> bool {
        self.icon.is_some()
    }
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
impl TrayPresence for TrayManager {
    fn activate(&mut self) -> Result<(), TrayError> {
        tracing::warn!("system tray is not supported on this platform");
        Err(TrayError::Unsupported)
    }

    fn deactivate(&mut self) {}

    fn is_active(&self) -> bool {
        false
    }
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn backend_error(error: impl std::fmt::Display) -> TrayError {
    TrayError::Backend(error.to_string())
}

impl std::fmt::Debug for TrayManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrayManager")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// MockTrayPresence
// ============================================================================

#[derive(Debug, Default)]
struct MockTrayInner {
    active: AtomicBool,
    activations: AtomicU32,
    deactivations: AtomicU32,
    fail_next: AtomicBool,
}

/// A tray presence that records calls, for tests.
///
/// Clones share the same counters, so a test can keep one handle while the
/// lifecycle owns another.
#[derive(Debug, Default, Clone)]
pub struct MockTrayPresence {
    inner: Arc<MockTrayInner>,
}

impl MockTrayPresence {
    /// Creates an inactive mock presence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next activation fail with a backend error.
    pub fn fail_next_activation(&self) {
        self.inner.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of successful activations.
    pub fn activation_count(&self) -> u32 {
        self.inner.activations.load(Ordering::SeqCst)
    }

    /// Number of deactivation calls.
    pub fn deactivation_count(&self) -> u32 {
        self.inner.deactivations.load(Ordering::SeqCst)
    }
}

impl TrayPresence for MockTrayPresence {
    fn activate(&mut self) -> Result<(), TrayError> {
        if self.inner.fail_next.swap(false, Ordering::SeqCst) {
            return Err(TrayError::Backend("mock activation failure".to_string()));
        }
        if !self.inner.active.swap(true, Ordering::SeqCst) {
            self.inner.activations.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn deactivate(&mut self) {
        if self.inner.active.swap(false, Ordering::SeqCst) {
            self.inner.deactivations.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Tests
// ============================================================================
