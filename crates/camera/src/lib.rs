//! Free-flying camera driven by keyboard, mouse and scroll input.
//!
//! # Invariants
//! - `front`, `right` and `up` are derived from yaw/pitch on every read and
//!   can never be observed stale.
//! - Pitch stays within [-89°, 89°] when constrained.
//! - Zoom stays inside its configured range.

mod camera;

pub use camera::{Basis, Camera, MAX_PITCH};
