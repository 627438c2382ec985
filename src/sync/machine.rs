//! Core synchronizer state machine
//!
//! Reads indicator notifications and re-applies the matching LED mask each
//! time something actually changed.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::indicator::{indicators_to_leds, Leds};
use crate::keyboard::{Device, Keyboard, KeyboardError, KeyboardEvent};

/// The three states of the synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Connected, initial state not applied yet
    #[default]
    Initializing,
    /// Blocked on the next event
    Waiting,
    /// Pushing a new LED mask
    Applying,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Initializing => write!(f, "Initializing"),
            State::Waiting => write!(f, "Waiting"),
            State::Applying => write!(f, "Applying"),
        }
    }
}

/// Keeps the keyboard LEDs in step with the server's indicators
pub struct Synchronizer<K> {
    keyboard: K,
    /// Current state
    state: State,
    /// Device subscribed to at startup
    device: Device,
    /// LED switched through keyboard control
    scroll_lock_led: u32,
}

impl<K: Keyboard> Synchronizer<K> {
    /// Create a synchronizer owning `keyboard`
    pub fn new(keyboard: K, config: &Config) -> Self {
        Self {
            keyboard,
            state: State::Initializing,
            device: config.device,
            scroll_lock_led: config.scroll_lock_led,
        }
    }

    /// Get the current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Subscribe to notifications and apply the current indicator state
    ///
    /// Errors here are fatal; nothing has been awaited yet.
    pub fn start(&mut self) -> Result<(), KeyboardError> {
        self.keyboard.select_indicator_events(self.device)?;

        let indicators = self.keyboard.indicator_state(self.device)?;
        info!(indicators, "initial indicator state");

        self.apply(self.device, indicators);
        Ok(())
    }

    /// Process events until the connection fails
    ///
    /// This is the only place the daemon blocks.
    pub fn run(&mut self) -> KeyboardError {
        info!(state = %self.state(), "synchronizer running");

        loop {
            match self.keyboard.next_event() {
                Ok(event) => self.handle_event(event),
                Err(e) => return e,
            }
        }
    }

    /// Handle one event from the server
    fn handle_event(&mut self, event: KeyboardEvent) {
        match event {
            KeyboardEvent::IndicatorsChanged { changed: 0, .. } => {
                debug!("indicator notification without changes, ignored");
            }
            KeyboardEvent::IndicatorsChanged { device, state, changed } => {
                debug!(?device, state, changed, "indicators changed");
                self.apply(device, state);
            }
            KeyboardEvent::RequestFailed(reason) => {
                warn!(%reason, "X server rejected a request");
            }
            KeyboardEvent::Other => {}
        }
    }

    /// Translate and apply, staying in the loop on failure
    fn apply(&mut self, device: Device, indicators: u32) {
        self.state = State::Applying;

        let leds = indicators_to_leds(indicators);
        if let Err(e) = apply_leds(&self.keyboard, device, leds, self.scroll_lock_led) {
            warn!(?e, %leds, "failed to apply LED state");
        }

        self.state = State::Waiting;
    }

    /// Give the keyboard back
    #[cfg(test)]
    pub fn into_keyboard(self) -> K {
        self.keyboard
    }
}

/// Push `leds` to the keyboard and flush
///
/// Scroll lock goes through the LED mode since the board ignores the
/// modifier for it; caps and num go through modifier locks. All three
/// requests are issued even if an earlier one fails.
pub fn apply_leds<K: Keyboard + ?Sized>(
    keyboard: &K,
    device: Device,
    leds: Leds,
    scroll_lock_led: u32,
) -> Result<(), KeyboardError> {
    debug!(%leds, ?device, "setting LEDs");

    let led_mode = keyboard.set_led_mode(scroll_lock_led, leds.contains(Leds::SCROLL_LOCK));
    let locks = keyboard.lock_modifiers(device, Leds::MODIFIER_LOCKS, leds);
    let flush = keyboard.flush();

    led_mode.and(locks).and(flush)
}
