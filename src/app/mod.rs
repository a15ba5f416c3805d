//! Application wiring and the foreground loop.
//!
//! The foreground thread is the only thread that mutates the display
//! surface. It blocks on three channels - display updates from the tick
//! loops, control commands, and resolved tray menu actions - and applies
//! whatever arrives strictly in order. The embedding widget layer routes
//! user gestures through [`AppCommand`]s: window-close and window-minimize
//! both map to [`AppCommand::MinimizeToTray`]; only [`AppCommand::Quit`]
//! ends the process.

use crossbeam_channel::{unbounded, Receiver, Sender};
use tokio::runtime::Handle;

use crate::config::AppConfig;
use crate::notify::{CompletionNotifier, DesktopNotifier};
use crate::stopwatch::StopwatchEngine;
use crate::surface::{ConsoleSurface, Surface, SurfaceUpdate, UpdateSink};
use crate::timer::{TimerEngine, TimerError, TimerEvent};
use crate::tray::{SurfaceVisibility, TrayAction, TrayLifecycle, TrayManager, TrayPresence};
use crate::types::{StopwatchState, TimerState};

// ============================================================================
// AppCommand
// ============================================================================

/// Control commands handled on the foreground thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Hide the window into the tray (close and minimize gestures)
    MinimizeToTray,
    /// Bring the window back from the tray
    RestoreFromTray,
    /// Quit the application - the only path that ends the process
    Quit,
}

// ============================================================================
// App
// ============================================================================

/// The assembled application.
///
/// Owns both engines, the residency lifecycle, and the display surface.
/// Engine methods and all surface mutation run on the thread that calls
/// [`App::run`]; the tick loops live on the handed-in runtime.
pub struct App {
    config: AppConfig,
    timer: TimerEngine,
    stopwatch: StopwatchEngine,
    lifecycle: TrayLifecycle,
    surface: Box<dyn Surface>,
    sink: UpdateSink,
    notifier: Box<dyn CompletionNotifier>,
    update_rx: Receiver<SurfaceUpdate>,
    command_tx: Sender<AppCommand>,
    command_rx: Receiver<AppCommand>,
    tray_rx: Receiver<TrayAction>,
    /// Keeps the tray action channel connected even while no tray backend
    /// holds a sender.
    _tray_tx: Sender<TrayAction>,
    runtime: Handle,
}

impl App {
    /// Assembles the application with the real surface, tray, and notifier.
    pub fn new(config: AppConfig, runtime: Handle) -> Self {
        let (tray_tx, tray_rx) = unbounded();
        let presence = Box::new(TrayManager::new(tray_tx.clone()));
        let surface = Box::new(ConsoleSurface::with_palette(config.palette.clone()));
        Self::build(
            config,
            runtime,
            surface,
            Box::new(DesktopNotifier::new()),
            presence,
            tray_tx,
            tray_rx,
        )
    }

    /// Assembles the application around injected surface, notifier, and
    /// tray presence implementations.
    pub fn with_parts(
        config: AppConfig,
        runtime: Handle,
        surface: Box<dyn Surface>,
        notifier: Box<dyn CompletionNotifier>,
        presence: Box<dyn TrayPresence>,
    ) -> Self {
        let (tray_tx, tray_rx) = unbounded();
        Self::build(config, runtime, surface, notifier, presence, tray_tx, tray_rx)
    }

    fn build(
        config: AppConfig,
        runtime: Handle,
        surface: Box<dyn Surface>,
        notifier: Box<dyn CompletionNotifier>,
        presence: Box<dyn TrayPresence>,
        tray_tx: Sender<TrayAction>,
        tray_rx: Receiver<TrayAction>,
    ) -> Self {
        let (update_tx, update_rx) = unbounded();
        let (command_tx, command_rx) = unbounded();

        let timer = TimerEngine::new(update_tx.clone(), runtime.clone());
        let stopwatch = StopwatchEngine::new(update_tx, runtime.clone());
        let lifecycle = TrayLifecycle::new(presence);

        Self {
            config,
            timer,
            stopwatch,
            lifecycle,
            surface,
            sink: UpdateSink::new(),
            notifier,
            update_rx,
            command_tx,
            command_rx,
            tray_rx,
            _tray_tx: tray_tx,
            runtime,
        }
    }

    /// The static configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The countdown timer engine.
    pub fn timer_mut(&mut self) -> &mut TimerEngine {
        &mut self.timer
    }

    /// The stopwatch engine.
    pub fn stopwatch_mut(&mut self) -> &mut StopwatchEngine {
        &mut self.stopwatch
    }

    /// A snapshot of the countdown state.
    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    /// A snapshot of the stopwatch state.
    pub fn stopwatch_state(&self) -> StopwatchState {
        self.stopwatch.state()
    }

    /// Where the application currently lives (window or tray).
    pub fn visibility(&self) -> SurfaceVisibility {
        self.lifecycle.visibility()
    }

    /// A sender the widget layer uses to route user gestures.
    pub fn command_sender(&self) -> Sender<AppCommand> {
        self.command_tx.clone()
    }

    /// Loads a named preset into the countdown.
    ///
    /// # Errors
    ///
    /// [`TimerError::InvalidInput`] for an unknown label, plus whatever
    /// [`TimerEngine::set_duration`] reports.
    pub fn apply_preset(&mut self, label: &str) -> Result<u64, TimerError> {
        let preset = self
            .config
            .preset(label)
            .ok_or_else(|| TimerError::InvalidInput {
                field: "preset",
                value: label.to_string(),
            })?;

        let (hours, minutes, seconds) = preset.input_fields();
        self.timer.set_duration(&hours, &minutes, &seconds)
    }

    /// Hides the window into the tray. Idempotent.
    pub fn minimize_to_tray(&mut self) {
        self.lifecycle.minimize_to_tray(self.surface.as_mut());
    }

    /// Brings the window back from the tray.
    pub fn restore_from_tray(&mut self) {
        self.lifecycle.restore_from_tray(self.surface.as_mut());
    }

    /// Halts both tick loops, removes the tray icon, and tears the surface
    /// down. The run loop exits after this; the process then ends with
    /// exit code 0.
    pub fn quit(&mut self) {
        tracing::info!("quitting");
        self.timer.shutdown();
        self.stopwatch.shutdown();
        self.lifecycle.shutdown();
        self.surface.hide();
    }

    /// Applies every queued display update, in arrival order.
    ///
    /// Returns how many updates were processed.
    pub fn process_pending_updates(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(update) = self.update_rx.try_recv() {
            self.handle_update(update);
            processed += 1;
        }
        processed
    }

    /// Runs the foreground loop until quit.
    ///
    /// Must be called on the thread that owns the surface; every display
    /// mutation happens inside this loop.
    pub fn run(mut self) -> anyhow::Result<()> {
        self.spawn_ctrl_c_listener();
        tracing::info!("chronotray started");

        let update_rx = self.update_rx.clone();
        let command_rx = self.command_rx.clone();
        let tray_rx = self.tray_rx.clone();

        loop {
            crossbeam_channel::select! {
                recv(update_rx) -> update => match update {
                    Ok(update) => self.handle_update(update),
                    Err(_) => break,
                },
                recv(command_rx) -> command => match command {
                    Ok(command) => {
                        if !self.handle_command(command) {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                recv(tray_rx) -> action => match action {
                    Ok(action) => {
                        if !self.handle_tray_action(action) {
                            break;
                        }
                    }
                    Err(_) => break,
                },
            }
        }

        tracing::info!("chronotray shut down");
        Ok(())
    }

    /// Applies one display update; fires the completion notification when
    /// the countdown finishes.
    fn handle_update(&mut self, update: SurfaceUpdate) {
        if matches!(update, SurfaceUpdate::Timer(TimerEvent::Completed)) {
            self.on_completion();
        }
        self.sink.apply(self.surface.as_mut(), &update);
    }

    /// Returns false when the application should exit.
    fn handle_command(&mut self, command: AppCommand) -> bool {
        match command {
            AppCommand::MinimizeToTray => {
                self.minimize_to_tray();
                true
            }
            AppCommand::RestoreFromTray => {
                self.restore_from_tray();
                true
            }
            AppCommand::Quit => {
                self.quit();
                false
            }
        }
    }

    fn handle_tray_action(&mut self, action: TrayAction) -> bool {
        match action {
            TrayAction::Restore => self.handle_command(AppCommand::RestoreFromTray),
            TrayAction::Quit => self.handle_command(AppCommand::Quit),
        }
    }

    /// One-shot side effects of the countdown reaching zero.
    fn on_completion(&mut self) {
        if let Err(error) = self.notifier.notify_completion() {
            tracing::warn!(%error, "completion notification failed");
        }

        // Completion pulls the window back in front of the user
        if self.lifecycle.is_hidden() {
            self.lifecycle.restore_from_tray(self.surface.as_mut());
        } else {
            self.surface.focus();
        }
    }

    fn spawn_ctrl_c_listener(&self) {
        let command_tx = self.command_tx.clone();
        self.runtime.spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("ctrl-c received");
                    let _ = command_tx.send(AppCommand::Quit);
                }
                Err(error) => tracing::warn!(%error, "ctrl-c handler unavailable"),
            }
        });
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("visibility", &self.lifecycle.visibility())
            .field("timer", &self.timer)
            .field("stopwatch", &self.stopwatch)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
