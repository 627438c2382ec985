//! Bit layouts for server indicators and keyboard LEDs
//!
//! Both layouts are fixed by the X protocol. `Leds` lines up with the core
//! modifier mask (Lock is bit 1, Mod2 is bit 4), so its caps and num bits
//! double as the modifier mask for lock requests.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Logical lock indicators as reported by XKB
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Indicators: u32 {
        const CAPS_LOCK   = 1 << 0;
        const NUM_LOCK    = 1 << 1;
        const SCROLL_LOCK = 1 << 2;
    }
}

bitflags! {
    /// LED bits in the keyboard controller's layout
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Leds: u32 {
        const SCROLL_LOCK = 1 << 0;
        const CAPS_LOCK   = 1 << 1;
        const NUM_LOCK    = 1 << 4;
    }
}

impl Leds {
    /// LEDs that follow modifier lock state rather than LED mode
    pub const MODIFIER_LOCKS: Leds = Leds::CAPS_LOCK.union(Leds::NUM_LOCK);

    /// Caps and num bits as an X modifier mask
    pub fn modifier_locks(self) -> u8 {
        // Both bits sit below 1 << 8.
        self.intersection(Self::MODIFIER_LOCKS).bits() as u8
    }
}

impl fmt::Display for Leds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.bits())
    }
}

/// Translate a raw indicator mask from the server into LED bits
///
/// Bits other than the three lock indicators are ignored.
pub fn indicators_to_leds(raw: u32) -> Leds {
    let indicators = Indicators::from_bits_truncate(raw);
    let mut leds = Leds::empty();

    if indicators.contains(Indicators::CAPS_LOCK) {
        leds |= Leds::CAPS_LOCK;
    }
    if indicators.contains(Indicators::NUM_LOCK) {
        leds |= Leds::NUM_LOCK;
    }
    if indicators.contains(Indicators::SCROLL_LOCK) {
        leds |= Leds::SCROLL_LOCK;
    }

    leds
}
