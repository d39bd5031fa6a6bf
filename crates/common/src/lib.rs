//! Shared value types and the settings tree used by every flashgrid crate.

pub mod config;
pub mod types;

pub use config::{
    CameraSettings, ConfigError, LightingSettings, ProjectionSettings, Settings,
    SurfaceTexturePaths, TextureSettings, TimerSettings, WindowSettings, WorldSettings,
};
pub use types::{Movement, Surface, TextureHandle, ZoomRange};
