use crate::frame::FrameState;
use flashgrid_camera::Camera;
use flashgrid_common::Settings;
use flashgrid_input::InputFrame;
use glam::Vec2;

/// Mutable application state shared by the input step and the composer.
///
/// Passed by reference through each frame; there is exactly one writer at a
/// time and no global state.
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    pub camera: Camera,
    pub frame: FrameState,
}

impl SceneState {
    pub fn new(camera: Camera, frame: FrameState) -> Self {
        Self { camera, frame }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            camera: Camera::from_settings(&settings.camera),
            frame: FrameState::new(&settings.timers),
        }
    }

    /// Apply one frame of drained input using the current `delta_time`.
    ///
    /// Must run after [`FrameState::advance`] and before composing.
    pub fn apply_input(&mut self, input: &InputFrame) {
        let dt = self.frame.delta_time();
        for &movement in &input.movements {
            self.camera.process_movement(movement, dt);
        }
        if input.look != Vec2::ZERO {
            self.camera.process_mouse_delta(input.look.x, input.look.y);
        }
        if input.scroll != 0.0 {
            self.camera.process_scroll(input.scroll);
        }
        if input.toggle_flashlight && self.frame.flashlight.request() {
            tracing::info!(
                "flashlight {}",
                if self.frame.flashlight_on() { "on" } else { "off" }
            );
        }
        if input.toggle_cheat && self.frame.cheat.request() {
            tracing::info!(
                "cheat mode {}",
                if self.frame.cheat_mode() { "on" } else { "off" }
            );
        }
    }
}
