//! Scripted keyboard for tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use x11rb::errors::ConnectionError;

use super::{Device, Keyboard, KeyboardError, KeyboardEvent};
use crate::indicator::Leds;

/// A recorded call on the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SelectIndicatorEvents(Device),
    IndicatorState(Device),
    NextEvent,
    SetLedMode { led: u32, on: bool },
    LockModifiers { device: Device, affect: Leds, values: Leds },
    Flush,
}

/// Keyboard that replays `events` and records every call
///
/// Once the script runs dry `next_event` reports a lost connection.
#[derive(Debug, Default)]
pub struct FakeKeyboard {
    pub initial_state: u32,
    pub events: VecDeque<KeyboardEvent>,
    pub fail_select: bool,
    pub fail_state: bool,
    pub fail_led_mode: bool,
    /// Shared so a test can keep watching after handing the fake off
    pub calls: Rc<RefCell<Vec<Call>>>,
}

impl FakeKeyboard {
    pub fn new(initial_state: u32, events: Vec<KeyboardEvent>) -> Self {
        Self {
            initial_state,
            events: events.into(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// The `values` of every lock request, in order
    pub fn applied(&self) -> Vec<(Device, Leds)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::LockModifiers { device, values, .. } => Some((*device, *values)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Keyboard for FakeKeyboard {
    fn select_indicator_events(&self, device: Device) -> Result<(), KeyboardError> {
        self.record(Call::SelectIndicatorEvents(device));
        if self.fail_select {
            return Err(KeyboardError::Connection(ConnectionError::UnknownError));
        }
        Ok(())
    }

    fn indicator_state(&self, device: Device) -> Result<u32, KeyboardError> {
        self.record(Call::IndicatorState(device));
        if self.fail_state {
            return Err(KeyboardError::Connection(ConnectionError::UnknownError));
        }
        Ok(self.initial_state)
    }

    fn next_event(&mut self) -> Result<KeyboardEvent, KeyboardError> {
        self.record(Call::NextEvent);
        self.events
            .pop_front()
            .ok_or(KeyboardError::Connection(ConnectionError::UnknownError))
    }

    fn set_led_mode(&self, led: u32, on: bool) -> Result<(), KeyboardError> {
        self.record(Call::SetLedMode { led, on });
        if self.fail_led_mode {
            return Err(KeyboardError::Connection(ConnectionError::UnknownError));
        }
        Ok(())
    }

    fn lock_modifiers(
        &self,
        device: Device,
        affect: Leds,
        values: Leds,
    ) -> Result<(), KeyboardError> {
        self.record(Call::LockModifiers { device, affect, values });
        Ok(())
    }

    fn flush(&self) -> Result<(), KeyboardError> {
        self.record(Call::Flush);
        Ok(())
    }
}
