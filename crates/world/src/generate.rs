use crate::grid::OccupancyGrid;
use glam::Vec3;

/// Number of cubes stacked on top of the ground cube for a wall cell.
pub const WALL_HEIGHT: usize = 2;

/// Expand a grid into world-space cube positions.
///
/// Rows map to Z and columns to X, both offset by `-(width / 2)` so the grid
/// is centred on the origin. Each cell yields its ground cube at height 0;
/// wall cells then yield cubes at heights 1 and 2. All coordinates are scaled
/// by `cell_size`.
pub fn generate_cubes(grid: &OccupancyGrid, cell_size: f32) -> Vec<Vec3> {
    let width = grid.width();
    let half = (width / 2) as f32;
    let mut positions = Vec::with_capacity(width * width + grid.wall_count() * WALL_HEIGHT);

    for y in 0..width {
        let z = (y as f32 - half) * cell_size;
        for x in 0..width {
            let px = (x as f32 - half) * cell_size;
            positions.push(Vec3::new(px, 0.0, z));
            if grid.is_wall(x, y) {
                for level in 1..=WALL_HEIGHT {
                    positions.push(Vec3::new(px, level as f32 * cell_size, z));
                }
            }
        }
    }

    tracing::debug!(
        "generated {} cubes from {}x{} grid",
        positions.len(),
        width,
        width
    );
    positions
}

/// `(ground, wall)` cube counts that [`generate_cubes`] will produce.
pub fn cube_counts(grid: &OccupancyGrid) -> (usize, usize) {
    (grid.cell_count(), grid.wall_count() * WALL_HEIGHT)
}
