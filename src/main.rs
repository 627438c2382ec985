//! kbledd: keeps a keyboard's lock LEDs in step with XKB indicators
//!
//! Some keyboards (the FUNC KB-460 among them) never light their own lock
//! LEDs. This daemon watches the X server's indicator state and drives the
//! LEDs from it:
//! - Scroll lock through the keyboard-control LED mode
//! - Caps and num lock through XKB modifier locks
//!
//! Start it once per session; it runs until killed or until the server
//! goes away.

mod config;
mod indicator;
mod keyboard;
mod sync;

use std::convert::Infallible;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::keyboard::{Keyboard, KeyboardError, XkbKeyboard};
use crate::sync::Synchronizer;

/// Exit status for any fatal error
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let config = Config::load();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter))
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "kbledd starting"
    );

    ExitCode::from(exit_status(launch(&config, XkbKeyboard::open)))
}

/// Report a fatal error and map it to the process exit status
fn exit_status(result: Result<Infallible>) -> u8 {
    match result {
        Ok(never) => match never {},
        Err(e) => {
            error!("{e:#}");
            EXIT_FAILURE
        }
    }
}

/// Open the keyboard, apply the current state and follow changes
///
/// Only returns on failure. The keyboard, and with it the display
/// connection, is dropped before this returns.
fn launch<K, F>(config: &Config, open: F) -> Result<Infallible>
where
    K: Keyboard,
    F: FnOnce(&Config) -> Result<K, KeyboardError>,
{
    let keyboard = open(config)?;

    let mut synchronizer = Synchronizer::new(keyboard, config);
    synchronizer
        .start()
        .context("failed to apply initial indicator state")?;

    info!("daemon initialized, entering main loop");

    Err(synchronizer.run()).context("lost connection to X11 display")
}
