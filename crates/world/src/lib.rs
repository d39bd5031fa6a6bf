//! World layout: a square occupancy grid and the cube positions derived from it.
//!
//! # Invariants
//! - Grids are square and immutable once loaded.
//! - Cube generation is pure: the same grid always yields the same ordered
//!   positions (row-major, ground cube before its wall stack).

mod generate;
mod grid;

pub use generate::{WALL_HEIGHT, cube_counts, generate_cubes};
pub use grid::{GridError, OccupancyGrid};
