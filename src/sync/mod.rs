//! Indicator synchronizer
//!
//! Three states:
//! - Initializing: subscribe and apply the current indicator state
//! - Waiting: blocked on the next event from the server
//! - Applying: pushing a fresh LED mask to the keyboard

mod machine;

pub use machine::Synchronizer;
