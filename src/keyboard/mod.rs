//! Keyboard module for talking to the X server
//!
//! The `Keyboard` trait is everything the synchronizer needs from the
//! server; `XkbKeyboard` implements it over an XKB-enabled connection.

mod xkb;

#[cfg(test)]
pub mod fake;

use x11rb::protocol::xkb::{DeviceSpec, ID};

use crate::indicator::Leds;

pub use xkb::XkbKeyboard;

/// Keyboard device addressed by a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// The server's core keyboard
    CoreKeyboard,
    /// A device id carried by an event
    Id(u8),
}

impl Device {
    /// Device as an XKB device spec
    pub fn spec(self) -> DeviceSpec {
        match self {
            Device::CoreKeyboard => ID::USE_CORE_KBD.into(),
            Device::Id(id) => id.into(),
        }
    }
}

/// Events read from the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardEvent {
    /// XKB indicator state notification
    IndicatorsChanged {
        /// Device the notification is about
        device: Device,
        /// Full indicator mask after the change
        state: u32,
        /// Indicators that changed
        changed: u32,
    },
    /// The server rejected an earlier request
    RequestFailed(String),
    /// Anything else; not interesting here
    Other,
}

/// Errors that can occur while talking to the server
#[derive(Debug, thiserror::Error)]
pub enum KeyboardError {
    #[error("Failed to open X11 display: {0}")]
    Connect(#[from] x11rb::errors::ConnectError),

    #[error("Failed to open X11 display: XKEYBOARD extension not available")]
    ExtensionMissing,

    #[error("Failed to open X11 display: server XKB {server_major}.{server_minor} does not support {wanted_major}.{wanted_minor}")]
    UnsupportedVersion {
        wanted_major: u16,
        wanted_minor: u16,
        server_major: u16,
        server_minor: u16,
    },

    #[error("X11 connection error: {0}")]
    Connection(#[from] x11rb::errors::ConnectionError),

    #[error("X11 request failed: {0}")]
    Reply(#[from] x11rb::errors::ReplyError),
}

/// The server operations the synchronizer relies on
pub trait Keyboard {
    /// Subscribe to indicator state notifications for `device`
    fn select_indicator_events(&self, device: Device) -> Result<(), KeyboardError>;

    /// Current indicator mask of `device`
    fn indicator_state(&self, device: Device) -> Result<u32, KeyboardError>;

    /// Block until the next event arrives
    fn next_event(&mut self) -> Result<KeyboardEvent, KeyboardError>;

    /// Switch a single keyboard-controller LED on or off
    fn set_led_mode(&self, led: u32, on: bool) -> Result<(), KeyboardError>;

    /// Lock the modifiers in `affect & values`, unlock the rest of `affect`
    fn lock_modifiers(&self, device: Device, affect: Leds, values: Leds)
        -> Result<(), KeyboardError>;

    /// Send buffered requests now
    fn flush(&self) -> Result<(), KeyboardError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_spec() {
        assert_eq!(Device::CoreKeyboard.spec(), 0x100);
        assert_eq!(Device::Id(3).spec(), 3);
    }

    #[test]
    fn test_connect_error_wording() {
        let err = KeyboardError::ExtensionMissing;
        assert!(err.to_string().starts_with("Failed to open X11 display"));
    }
}
