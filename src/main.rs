//! Chronotray - a countdown timer and stopwatch living in the system tray.
//!
//! The main thread runs the foreground loop and owns every display
//! mutation; the tick loops run on a small tokio runtime. Closing or
//! minimizing the window hides it into the tray - quitting happens through
//! the tray menu or Ctrl-C, and exits with code 0.

use anyhow::Result;

use chronotray::app::App;
use chronotray::config::AppConfig;

/// Main entry point
fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::default();
    config.validate().map_err(anyhow::Error::msg)?;

    // The tick loops need very little: two workers cover both machines.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let app = App::new(config, runtime.handle().clone());
    app.run()
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(false).init();
}
