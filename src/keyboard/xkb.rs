//! XKB-backed keyboard using an x11rb connection
//!
//! The connection lives inside a `DisplayHandle`, which is the only owner of
//! the session and closes it when dropped.

use tracing::{debug, info};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xkb::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{ChangeKeyboardControlAux, ConnectionExt as _, LedMode};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

use super::{Device, Keyboard, KeyboardError, KeyboardEvent};
use crate::config::Config;
use crate::indicator::Leds;

/// Scoped connection to the X server
///
/// Dropping the handle flushes anything still queued and closes the socket,
/// on the error path of `XkbKeyboard::open` as much as at exit.
pub struct DisplayHandle {
    conn: RustConnection,
}

impl DisplayHandle {
    /// Connect to the default display
    pub fn open() -> Result<Self, KeyboardError> {
        let (conn, screen) = x11rb::connect(None)?;
        debug!(screen, "X11 display opened");
        Ok(Self { conn })
    }

    /// The underlying connection
    pub fn conn(&self) -> &RustConnection {
        &self.conn
    }
}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        if let Err(e) = self.conn.flush() {
            debug!(?e, "flush on close failed");
        }
        debug!("X11 display closed");
    }
}

/// Keyboard reached through the XKEYBOARD extension
pub struct XkbKeyboard {
    display: DisplayHandle,
}

impl XkbKeyboard {
    /// Open the display and negotiate the XKB version from `config`
    pub fn open(config: &Config) -> Result<Self, KeyboardError> {
        let display = DisplayHandle::open()?;

        if display
            .conn()
            .extension_information(xkb::X11_EXTENSION_NAME)?
            .is_none()
        {
            return Err(KeyboardError::ExtensionMissing);
        }

        let (wanted_major, wanted_minor) = config.xkb_version;
        let reply = display
            .conn()
            .xkb_use_extension(wanted_major, wanted_minor)?
            .reply()?;
        if !reply.supported {
            return Err(KeyboardError::UnsupportedVersion {
                wanted_major,
                wanted_minor,
                server_major: reply.server_major,
                server_minor: reply.server_minor,
            });
        }

        info!(
            server_major = reply.server_major,
            server_minor = reply.server_minor,
            "XKB extension ready"
        );

        Ok(Self { display })
    }

    fn conn(&self) -> &RustConnection {
        self.display.conn()
    }
}

impl Keyboard for XkbKeyboard {
    fn select_indicator_events(&self, device: Device) -> Result<(), KeyboardError> {
        // Watch all 32 indicators; unknown bits are dropped on translation.
        let all = u32::MAX;
        let details = xkb::SelectEventsAux {
            indicator_state_notify: Some(xkb::SelectEventsAuxIndicatorStateNotify {
                affect_indicator_state: all,
                indicator_state_details: all,
            }),
            ..Default::default()
        };

        self.conn()
            .xkb_select_events(
                device.spec(),
                0u16.into(),
                0u16.into(),
                0u16.into(),
                0u16.into(),
                &details,
            )?
            .check()?;

        debug!(?device, "subscribed to indicator state notifications");
        Ok(())
    }

    fn indicator_state(&self, device: Device) -> Result<u32, KeyboardError> {
        let reply = self.conn().xkb_get_indicator_state(device.spec())?.reply()?;
        Ok(reply.state)
    }

    fn next_event(&mut self) -> Result<KeyboardEvent, KeyboardError> {
        let event = self.conn().wait_for_event()?;

        Ok(match event {
            Event::XkbIndicatorStateNotify(notify) => KeyboardEvent::IndicatorsChanged {
                device: Device::Id(notify.device_id),
                state: notify.state,
                changed: notify.state_changed,
            },
            Event::Error(err) => KeyboardEvent::RequestFailed(format!(
                "{:?} (major opcode {}, sequence {})",
                err.error_kind, err.major_opcode, err.sequence
            )),
            _ => KeyboardEvent::Other,
        })
    }

    fn set_led_mode(&self, led: u32, on: bool) -> Result<(), KeyboardError> {
        let mode = if on { LedMode::ON } else { LedMode::OFF };
        let values = ChangeKeyboardControlAux::new().led(led).led_mode(mode);

        // Errors come back as events.
        self.conn().change_keyboard_control(&values)?;
        Ok(())
    }

    fn lock_modifiers(
        &self,
        device: Device,
        affect: Leds,
        values: Leds,
    ) -> Result<(), KeyboardError> {
        self.conn().xkb_latch_lock_state(
            device.spec(),
            affect.modifier_locks().into(),
            (values & affect).modifier_locks().into(),
            false,
            xkb::Group::M1,
            0u8.into(),
            false,
            0,
        )?;
        Ok(())
    }

    fn flush(&self) -> Result<(), KeyboardError> {
        self.conn().flush()?;
        Ok(())
    }
}
