//! Configuration loading and management

use crate::keyboard::Device;

/// Scroll-lock LED index as numbered by the keyboard controller
pub const SCROLL_LOCK_LED: u32 = 3;

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Keyboard whose indicators are tracked
    pub device: Device,

    /// LED driven through the keyboard-control LED mode
    pub scroll_lock_led: u32,

    /// XKB version requested during extension negotiation
    pub xkb_version: (u16, u16),

    /// Filter used when `RUST_LOG` is not set
    pub log_filter: &'static str,
}

impl Config {
    /// Load configuration from compiled-in defaults
    pub fn load() -> Self {
        Self {
            device: Device::CoreKeyboard,
            scroll_lock_led: SCROLL_LOCK_LED,
            xkb_version: (1, 0),
            log_filter: if cfg!(feature = "trace-leds") { "debug" } else { "warn" },
        }
    }
}
