//! Desktop notification for countdown completion.
//!
//! The countdown fires its completion event exactly once; this module turns
//! that event into a one-shot desktop notification. Delivery failures are
//! logged and never fatal - the display still shows the completed state.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use thiserror::Error;

// ============================================================================
// NotifyError
// ============================================================================

/// Errors from the notification backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The platform notification service rejected or dropped the request.
    #[error("failed to deliver desktop notification: {0}")]
    Delivery(String),
}

// ============================================================================
// CompletionNotifier
// ============================================================================

/// Delivers the one-shot completion notification.
pub trait CompletionNotifier {
    /// Notifies the user that the countdown has finished.
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] if the notification cannot be delivered;
    /// the caller logs and carries on.
    fn notify_completion(&self) -> Result<(), NotifyError>;
}

// ============================================================================
// DesktopNotifier
// ============================================================================

/// Notification via the platform notification service.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    /// Creates a new desktop notifier.
    pub fn new() -> Self {
        Self
    }
}

impl CompletionNotifier for DesktopNotifier {
    fn notify_completion(&self) -> Result<(), NotifyError> {
        notify_rust::Notification::new()
            .summary("Time is up")
            .body("The countdown has finished.")
            .appname("Chronotray")
            .show()
            .map(|_| ())
            .map_err(|error| NotifyError::Delivery(error.to_string()))
    }
}

// ============================================================================
// MockNotifier
// ============================================================================

#[derive(Debug, Default)]
struct MockNotifierInner {
    sent: AtomicU32,
    should_fail: AtomicBool,
}

/// A notifier that records deliveries, for tests.
///
/// Clones share the same counters.
#[derive(Debug, Default, Clone)]
pub struct MockNotifier {
    inner: Arc<MockNotifierInner>,
}

impl MockNotifier {
    /// Creates a mock notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every delivery fail.
    pub fn set_should_fail(&self, fail: bool) {
        self.inner.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Number of notifications delivered.
    pub fn sent_count(&self) -> u32 {
        self.inner.sent.load(Ordering::SeqCst)
    }
}

impl CompletionNotifier for MockNotifier {
    fn notify_completion(&self) -> Result<(), NotifyError> {
        if self.inner.should_fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Delivery("mock delivery failure".to_string()));
        }
        self.inner.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
