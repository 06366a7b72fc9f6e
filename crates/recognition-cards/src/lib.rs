//! # Recognition Cards
//!
//! View models and display helpers for recognition/award cards. Pure
//! presentation: no state machine, no I/O, just the fallback and
//! formatting rules the card components apply to platform data.

/// Card view models and display helpers
mod cards;
pub use cards::*;
