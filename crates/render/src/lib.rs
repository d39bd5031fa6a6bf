//! Frame composition: turns scene state into shader uniforms and cube draws.
//!
//! # Invariants
//! - The composer never mutates scene state; input is applied beforehand.
//! - `use_program` is issued before any uniform write of a frame.
//! - Exactly one draw per cube position, in generation order.
//!
//! Backends implement [`ShadingBackend`]; [`RecordingBackend`] captures the
//! calls for headless runs and tests without a GPU.

mod backend;
mod composer;
mod frame;
mod scene;

pub use backend::{BackendCall, RecordingBackend, ShadingBackend, UniformValue, names};
pub use composer::{FrameComposer, FrameStats, SpotCone};
pub use frame::{DebouncedToggle, FrameEvent, FrameState};
pub use scene::SceneState;

pub fn crate_info() -> &'static str {
    "flashgrid-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashgrid_common::{Movement, Settings};
    use flashgrid_input::InputFrame;
    use flashgrid_world::{OccupancyGrid, generate_cubes};

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }

    #[test]
    fn full_frame_sequence() {
        let settings = Settings::default();
        let grid = OccupancyGrid::default_layout();
        let composer = FrameComposer::from_settings(generate_cubes(&grid, 1.0), &settings);
        let mut scene = SceneState::from_settings(&settings);
        let mut backend = RecordingBackend::new();

        let start = scene.camera.position();
        for _ in 0..10 {
            scene.frame.advance(0.1);
            scene.apply_input(&InputFrame {
                movements: vec![Movement::Forward],
                ..InputFrame::default()
            });
            backend.clear();
            let stats = composer.compose(&scene, settings.window.aspect_ratio(), &mut backend);
            assert_eq!(stats.draws, composer.cubes().len());
        }

        // 1 second at 2.5 units/s towards -Z.
        let moved = scene.camera.position() - start;
        assert!((moved.z + 2.5).abs() < 1e-4);
        assert!((scene.frame.total_time() - 1.0).abs() < 1e-5);
    }
}
