use serde::{Deserialize, Serialize};

/// Direction of a single camera translation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl Movement {
    pub const ALL: [Movement; 6] = [
        Movement::Forward,
        Movement::Backward,
        Movement::Left,
        Movement::Right,
        Movement::Up,
        Movement::Down,
    ];
}

/// Which texture pair a cube is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    /// Cubes at height zero.
    Ground,
    /// Stacked cubes above a wall cell.
    Wall,
}

impl Surface {
    /// Classify a cube by its world-space height.
    pub fn for_height(y: f32, cell_size: f32) -> Self {
        if (y / cell_size).abs() < 0.5 {
            Surface::Ground
        } else {
            Surface::Wall
        }
    }
}

/// Inclusive bounds for the camera zoom (vertical field of view, degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f32,
    pub max: f32,
}

impl ZoomRange {
    /// Bounds given in either order are sorted.
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Clamp into the range. Never panics, even on inverted or NaN bounds.
    pub fn clamp(&self, zoom: f32) -> f32 {
        zoom.max(self.min).min(self.max)
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 45.0,
        }
    }
}

/// Opaque handle to a decoded texture.
///
/// A failed load still yields a handle ([`TextureHandle::INVALID`]) so the
/// caller can keep running; backends substitute a placeholder for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    pub const INVALID: TextureHandle = TextureHandle(u32::MAX);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for TextureHandle {
    fn default() -> Self {
        Self::INVALID
    }
}
