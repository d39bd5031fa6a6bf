//! Input collection: windowing events in, one [`InputFrame`] out per frame.
//!
//! # Invariants
//! - The first cursor sample after a reset produces a zero delta.
//! - Look and scroll deltas accumulate between drains and are consumed once.
//! - Held controls repeat every frame until released.

pub mod control;
pub mod state;

pub use control::Control;
pub use state::{CursorTracker, InputFrame, InputState};
