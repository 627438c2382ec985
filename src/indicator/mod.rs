//! Indicator and LED bit sets
//!
//! The server reports lock indicators in its own bit layout; the keyboard
//! controller wants a different, non-contiguous one.

mod bits;

pub use bits::{indicators_to_leds, Leds};

#[cfg(test)]
pub use bits::Indicators;
