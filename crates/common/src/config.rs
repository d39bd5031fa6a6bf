//! Runtime settings, loaded from an optional YAML file.
//!
//! Every section falls back to the values the demo ships with, so a config
//! file only needs to name the fields it changes.

use crate::types::ZoomRange;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub projection: ProjectionSettings,
    pub lighting: LightingSettings,
    pub textures: TextureSettings,
    pub timers: TimerSettings,
    pub world: WorldSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            title: "Flashgrid".into(),
        }
    }
}

impl WindowSettings {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: Vec3,
    pub world_up: Vec3,
    /// Degrees. -90 faces -Z.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Initial vertical field of view, degrees.
    pub zoom: f32,
    pub zoom_range: ZoomRange,
    pub constrain_pitch: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 0.0),
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            zoom: 45.0,
            zoom_range: ZoomRange::default(),
            constrain_pitch: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 10_000.0,
        }
    }
}

/// Flashlight and material parameters pushed to the shader every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    /// Inner cone half-angle, degrees.
    pub cut_off: f32,
    /// Outer cone half-angle, degrees.
    pub outer_cut_off: f32,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub shininess: f32,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            cut_off: 12.5,
            outer_cut_off: 17.5,
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(1.0),
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
            shininess: 32.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceTexturePaths {
    pub diffuse: PathBuf,
    pub specular: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSettings {
    pub ground: SurfaceTexturePaths,
    pub wall: SurfaceTexturePaths,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            ground: SurfaceTexturePaths {
                diffuse: "assets/ground_texture.png".into(),
                specular: "assets/ground_specular.png".into(),
            },
            wall: SurfaceTexturePaths {
                diffuse: "assets/brick_texture.png".into(),
                specular: "assets/brick_specular.png".into(),
            },
        }
    }
}

/// Cooldowns and scripted timer thresholds, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    pub flashlight_cooldown: f32,
    pub cheat_cooldown: f32,
    /// `None` disables the cue.
    pub suspense_cue_after: Option<f32>,
    /// `None` disables automatic cheat mode.
    pub auto_cheat_after: Option<f32>,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            flashlight_cooldown: 0.5,
            cheat_cooldown: 0.5,
            suspense_cue_after: Some(30.0),
            auto_cheat_after: Some(39.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Text layout file; the built-in layout is used when unset.
    pub layout: Option<PathBuf>,
    pub cell_size: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            layout: None,
            cell_size: 1.0,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file and validate them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let settings = Self::from_yaml(&data)?;
        tracing::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_yaml(data: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_yaml::from_str(data)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        if !cam.zoom_range.is_valid() {
            return Err(invalid(
                "camera.zoom_range",
                format!(
                    "expected 0 < min <= max, got [{}, {}]",
                    cam.zoom_range.min, cam.zoom_range.max
                ),
            ));
        }
        if !cam.position.is_finite() {
            return Err(invalid("camera.position", "must be finite"));
        }
        if cam.world_up.length_squared() < f32::EPSILON || !cam.world_up.is_finite() {
            return Err(invalid("camera.world_up", "must be a finite non-zero vector"));
        }
        finite("camera.yaw", cam.yaw)?;
        finite("camera.pitch", cam.pitch)?;
        finite("camera.zoom", cam.zoom)?;
        finite("camera.movement_speed", cam.movement_speed)?;
        finite("camera.mouse_sensitivity", cam.mouse_sensitivity)?;

        let proj = &self.projection;
        finite("projection.near", proj.near)?;
        finite("projection.far", proj.far)?;
        if proj.near <= 0.0 || proj.far <= proj.near {
            return Err(invalid(
                "projection",
                format!("expected 0 < near < far, got near={} far={}", proj.near, proj.far),
            ));
        }

        let light = &self.lighting;
        for (field, value) in [
            ("lighting.cut_off", light.cut_off),
            ("lighting.outer_cut_off", light.outer_cut_off),
            ("lighting.constant", light.constant),
            ("lighting.linear", light.linear),
            ("lighting.quadratic", light.quadratic),
            ("lighting.shininess", light.shininess),
        ] {
            finite(field, value)?;
        }
        for (field, colour) in [
            ("lighting.ambient", light.ambient),
            ("lighting.diffuse", light.diffuse),
            ("lighting.specular", light.specular),
        ] {
            if !colour.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window", "width and height must be non-zero"));
        }
        if self.world.cell_size <= 0.0 || !self.world.cell_size.is_finite() {
            return Err(invalid("world.cell_size", "must be positive"));
        }

        let timers = &self.timers;
        finite("timers.flashlight_cooldown", timers.flashlight_cooldown)?;
        finite("timers.cheat_cooldown", timers.cheat_cooldown)?;
        if timers.flashlight_cooldown < 0.0 || timers.cheat_cooldown < 0.0 {
            return Err(invalid("timers", "cooldowns must not be negative"));
        }
        if let Some(at) = timers.suspense_cue_after {
            finite("timers.suspense_cue_after", at)?;
        }
        if let Some(at) = timers.auto_cheat_after {
            finite("timers.auto_cheat_after", at)?;
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite, got {value}")))
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.camera.yaw, -90.0);
        assert_eq!(settings.camera.zoom_range, ZoomRange::new(1.0, 45.0));
        assert_eq!(settings.projection.far, 10_000.0);
        assert_eq!(settings.timers.flashlight_cooldown, 0.5);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "camera:\n  zoom_range:\n    min: 40.0\n    max: 60.0\ntimers:\n  auto_cheat_after: null\n";
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.camera.zoom_range, ZoomRange::new(40.0, 60.0));
        assert_eq!(settings.camera.movement_speed, 2.5);
        assert_eq!(settings.timers.auto_cheat_after, None);
        assert_eq!(settings.timers.suspense_cue_after, Some(30.0));
        assert_eq!(settings.window.width, 1920);
    }

    #[test]
    fn yaml_round_trip() {
        let mut settings = Settings::default();
        settings.camera.position = glam::Vec3::new(1.0, 2.0, 3.0);
        settings.world.layout = Some("maze.txt".into());
        let yaml = settings.to_yaml().unwrap();
        let back = Settings::from_yaml(&yaml).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn rejects_inverted_zoom_range() {
        let yaml = "camera:\n  zoom_range:\n    min: 60.0\n    max: 40.0\n";
        let err = Settings::from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "camera.zoom_range",
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_projection() {
        let yaml = "projection:\n  near: 10.0\n  far: 1.0\n";
        assert!(Settings::from_yaml(yaml).is_err());
    }

    #[test]
    fn rejects_non_finite_values() {
        let cases = [
            ("projection:\n  near: .nan\n", "projection.near"),
            ("camera:\n  yaw: .nan\n", "camera.yaw"),
            ("camera:\n  position: [0.0, .inf, 0.0]\n", "camera.position"),
            ("camera:\n  zoom: .nan\n", "camera.zoom"),
            ("lighting:\n  linear: .nan\n", "lighting.linear"),
            ("lighting:\n  ambient: [0.1, .nan, 0.1]\n", "lighting.ambient"),
            ("timers:\n  flashlight_cooldown: .inf\n", "timers.flashlight_cooldown"),
            ("timers:\n  auto_cheat_after: .nan\n", "timers.auto_cheat_after"),
        ];
        for (yaml, expected) in cases {
            match Settings::from_yaml(yaml) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected, "{yaml}"),
                other => panic!("{yaml}: expected invalid {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "window:\n  width: 800\n  height: 600").unwrap();
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.window.width, 800);
        assert!((settings.window.aspect_ratio() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Settings::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert_eq!(Settings::load_or_default(None).unwrap(), Settings::default());
    }
}
