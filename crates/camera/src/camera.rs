use flashgrid_common::{CameraSettings, Movement, ZoomRange};
use glam::{Mat4, Vec3};

/// Pitch limit (degrees) applied when pitch is constrained.
pub const MAX_PITCH: f32 = 89.0;

/// Orthonormal, right-handed view basis derived from yaw and pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

/// Fly camera with Euler-angle orientation in degrees.
///
/// Yaw is measured so that -90° faces -Z. The view basis is recomputed from
/// the angles whenever it is read, so there is no update call to forget.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    movement_speed: f32,
    mouse_sensitivity: f32,
    zoom: f32,
    zoom_range: ZoomRange,
    constrain_pitch: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Y, -90.0, 0.0)
    }
}

impl Camera {
    /// Camera with the stock speed (2.5), sensitivity (0.1) and zoom (45°).
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            world_up: world_up.try_normalize().unwrap_or(Vec3::Y),
            yaw,
            pitch,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            zoom: 45.0,
            zoom_range: ZoomRange::default(),
            constrain_pitch: true,
        }
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        let mut camera = Self::new(
            settings.position,
            settings.world_up,
            settings.yaw,
            settings.pitch,
        );
        camera.movement_speed = settings.movement_speed;
        camera.mouse_sensitivity = settings.mouse_sensitivity;
        camera.zoom_range = settings.zoom_range;
        camera.zoom = settings.zoom_range.clamp(settings.zoom);
        camera.constrain_pitch = settings.constrain_pitch;
        if camera.constrain_pitch {
            camera.pitch = camera.pitch.clamp(-MAX_PITCH, MAX_PITCH);
        }
        tracing::debug!(
            "camera at ({:.1}, {:.1}, {:.1}) yaw={} pitch={} zoom={}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.yaw,
            camera.pitch,
            camera.zoom
        );
        camera
    }

    pub fn with_speed(mut self, movement_speed: f32) -> Self {
        self.movement_speed = movement_speed;
        self
    }

    pub fn with_sensitivity(mut self, mouse_sensitivity: f32) -> Self {
        self.mouse_sensitivity = mouse_sensitivity;
        self
    }

    /// Replace the zoom range. An invalid range is ignored with a warning.
    pub fn with_zoom_range(mut self, zoom_range: ZoomRange) -> Self {
        if !zoom_range.is_valid() {
            tracing::warn!(
                "ignoring invalid zoom range [{}, {}]",
                zoom_range.min,
                zoom_range.max
            );
            return self;
        }
        self.zoom_range = zoom_range;
        self.zoom = zoom_range.clamp(self.zoom);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    pub fn constrains_pitch(&self) -> bool {
        self.constrain_pitch
    }

    /// Derive the view basis from the current yaw and pitch.
    pub fn basis(&self) -> Basis {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();

        let front = Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
        // front is parallel to world_up only at ±90° pitch; fall back to the
        // horizontal right implied by yaw.
        let right = front
            .cross(self.world_up)
            .try_normalize()
            .unwrap_or_else(|| Vec3::new(-yaw_sin, 0.0, yaw_cos));
        let up = right.cross(front).normalize();

        Basis { front, right, up }
    }

    pub fn front(&self) -> Vec3 {
        self.basis().front
    }

    pub fn right(&self) -> Vec3 {
        self.basis().right
    }

    pub fn up(&self) -> Vec3 {
        self.basis().up
    }

    pub fn view_matrix(&self) -> Mat4 {
        let basis = self.basis();
        Mat4::look_at_rh(self.position, self.position + basis.front, basis.up)
    }

    /// Perspective projection using `zoom` as the vertical field of view.
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, near, far)
    }

    /// Translate by `movement_speed * dt` in the given direction.
    ///
    /// Horizontal directions use the ground-plane projection of the basis so
    /// looking up or down does not change traversal speed.
    pub fn process_movement(&mut self, direction: Movement, dt: f32) {
        if !dt.is_finite() {
            tracing::warn!("ignoring non-finite movement delta {dt}");
            return;
        }
        let velocity = self.movement_speed * dt;
        let basis = self.basis();
        let forward = horizontal(basis.front);
        let right = horizontal(basis.right);

        match direction {
            Movement::Forward => self.position += forward * velocity,
            Movement::Backward => self.position -= forward * velocity,
            Movement::Left => self.position -= right * velocity,
            Movement::Right => self.position += right * velocity,
            Movement::Up => self.position.y += velocity,
            Movement::Down => self.position.y -= velocity,
        }
    }

    /// Apply a mouse offset (already y-inverted) with pitch constrained.
    pub fn process_mouse_delta(&mut self, xoffset: f32, yoffset: f32) {
        self.process_mouse_delta_with(xoffset, yoffset, self.constrain_pitch);
    }

    pub fn process_mouse_delta_with(&mut self, xoffset: f32, yoffset: f32, constrain_pitch: bool) {
        if !(xoffset.is_finite() && yoffset.is_finite()) {
            tracing::warn!("ignoring non-finite mouse delta ({xoffset}, {yoffset})");
            return;
        }
        self.yaw += xoffset * self.mouse_sensitivity;
        self.pitch += yoffset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
        }
    }

    /// Scroll up narrows the field of view.
    pub fn process_scroll(&mut self, yoffset: f32) {
        if !yoffset.is_finite() {
            tracing::warn!("ignoring non-finite scroll delta {yoffset}");
            return;
        }
        self.zoom = self.zoom_range.clamp(self.zoom - yoffset);
    }
}

fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(basis: &Basis, world_up: Vec3) {
        assert!((basis.front.length() - 1.0).abs() < EPS);
        assert!((basis.right.length() - 1.0).abs() < EPS);
        assert!((basis.up.length() - 1.0).abs() < EPS);
        assert!(basis.front.dot(basis.right).abs() < EPS);
        assert!(basis.front.dot(basis.up).abs() < EPS);
        assert!(basis.right.dot(basis.up).abs() < EPS);
        let expected_right = basis.front.cross(world_up).normalize();
        assert!(basis.right.abs_diff_eq(expected_right, 1e-4));
        assert!(basis.up.abs_diff_eq(basis.right.cross(basis.front).normalize(), 1e-4));
    }

    #[test]
    fn default_camera_faces_negative_z() {
        let cam = Camera::default();
        assert!(cam.front().abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), EPS));
        assert!(cam.right().abs_diff_eq(Vec3::X, EPS));
        assert!(cam.up().abs_diff_eq(Vec3::Y, EPS));
        let view = cam.view_matrix();
        assert!(!view.col(0).x.is_nan());
    }

    #[test]
    fn basis_is_orthonormal_across_pitch_range() {
        for yaw in (-360..=360).step_by(15) {
            for pitch in (-89..=89).step_by(7) {
                let cam = Camera::new(Vec3::ZERO, Vec3::Y, yaw as f32, pitch as f32);
                assert_orthonormal(&cam.basis(), Vec3::Y);
            }
        }
    }

    #[test]
    fn unconstrained_vertical_pitch_stays_finite() {
        let mut cam = Camera::default();
        cam.process_mouse_delta_with(0.0, 900.0, false);
        assert_eq!(cam.pitch(), 90.0);
        let basis = cam.basis();
        assert!(basis.front.is_finite() && basis.right.is_finite() && basis.up.is_finite());
        assert!((basis.right.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn zero_mouse_delta_is_noop() {
        let mut cam = Camera::new(Vec3::ONE, Vec3::Y, 12.0, -30.0);
        let before = cam.clone();
        cam.process_mouse_delta(0.0, 0.0);
        assert_eq!(cam, before);
    }

    #[test]
    fn mouse_delta_rotates_yaw() {
        let mut cam = Camera::new(Vec3::ZERO, Vec3::Y, -90.0, 0.0);
        assert!(cam.front().abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), EPS));
        cam.process_mouse_delta(100.0, 0.0);
        assert!((cam.yaw() - -80.0).abs() < EPS);
        let front = cam.front();
        assert!((front.x - (-80.0_f32).to_radians().cos()).abs() < EPS);
        assert!((front.z - (-80.0_f32).to_radians().sin()).abs() < EPS);
        assert!(front.y.abs() < EPS);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.process_mouse_delta(0.0, 10_000.0);
        assert_eq!(cam.pitch(), MAX_PITCH);
        cam.process_mouse_delta(0.0, -20_000.0);
        assert_eq!(cam.pitch(), -MAX_PITCH);
    }

    #[test]
    fn scroll_pins_at_bounds() {
        let mut cam = Camera::default();
        for _ in 0..100 {
            cam.process_scroll(5.0);
        }
        assert_eq!(cam.zoom(), 1.0);
        cam.process_scroll(5.0);
        assert_eq!(cam.zoom(), 1.0);
        for _ in 0..100 {
            cam.process_scroll(-5.0);
        }
        assert_eq!(cam.zoom(), 45.0);
    }

    #[test]
    fn alternate_zoom_range() {
        let mut cam = Camera::default().with_zoom_range(ZoomRange::new(40.0, 60.0));
        assert_eq!(cam.zoom(), 45.0);
        cam.process_scroll(-30.0);
        assert_eq!(cam.zoom(), 60.0);
        cam.process_scroll(100.0);
        assert_eq!(cam.zoom(), 40.0);
    }

    #[test]
    fn invalid_zoom_range_is_ignored() {
        let inverted = ZoomRange {
            min: 60.0,
            max: 40.0,
        };
        let mut cam = Camera::default().with_zoom_range(inverted);
        assert_eq!(cam.zoom_range(), ZoomRange::default());
        cam.process_scroll(-10.0);
        assert_eq!(cam.zoom(), 45.0);

        // Bounds passed to `new` in the wrong order are sorted, not rejected.
        let cam = Camera::default().with_zoom_range(ZoomRange::new(60.0, 40.0));
        assert_eq!(cam.zoom_range(), ZoomRange::new(40.0, 60.0));
        assert_eq!(cam.zoom(), 45.0);
    }

    #[test]
    fn up_movement_only_changes_height() {
        for (yaw, pitch) in [(-90.0, 0.0), (33.0, 60.0), (200.0, -75.0)] {
            let mut cam = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, yaw, pitch);
            cam.process_movement(Movement::Up, 0.5);
            assert_eq!(cam.position().x, 1.0);
            assert_eq!(cam.position().z, 3.0);
            assert!((cam.position().y - (2.0 + 2.5 * 0.5)).abs() < EPS);
            cam.process_movement(Movement::Down, 0.5);
            assert!((cam.position().y - 2.0).abs() < EPS);
        }
    }

    #[test]
    fn forward_ignores_pitch() {
        let mut level = Camera::new(Vec3::ZERO, Vec3::Y, -90.0, 0.0);
        let mut tilted = Camera::new(Vec3::ZERO, Vec3::Y, -90.0, 60.0);
        level.process_movement(Movement::Forward, 1.0);
        tilted.process_movement(Movement::Forward, 1.0);
        assert!(level.position().abs_diff_eq(Vec3::new(0.0, 0.0, -2.5), EPS));
        assert!(tilted.position().abs_diff_eq(level.position(), EPS));
    }

    #[test]
    fn strafe_and_reverse() {
        let mut cam = Camera::default();
        cam.process_movement(Movement::Right, 1.0);
        assert!(cam.position().abs_diff_eq(Vec3::new(2.5, 0.0, 0.0), EPS));
        cam.process_movement(Movement::Left, 2.0);
        assert!(cam.position().abs_diff_eq(Vec3::new(-2.5, 0.0, 0.0), EPS));
        cam.process_movement(Movement::Backward, 1.0);
        assert!(cam.position().abs_diff_eq(Vec3::new(-2.5, 0.0, 2.5), EPS));
    }

    #[test]
    fn non_finite_input_rejected() {
        let mut cam = Camera::default();
        let before = cam.clone();
        cam.process_mouse_delta(f32::NAN, 1.0);
        cam.process_scroll(f32::INFINITY);
        cam.process_movement(Movement::Forward, f32::NAN);
        assert_eq!(cam, before);
    }

    #[test]
    fn from_settings_applies_config() {
        let settings = CameraSettings {
            zoom: 90.0,
            zoom_range: ZoomRange::new(40.0, 60.0),
            pitch: 120.0,
            ..CameraSettings::default()
        };
        let cam = Camera::from_settings(&settings);
        assert_eq!(cam.zoom(), 60.0);
        assert_eq!(cam.pitch(), MAX_PITCH);
        assert_eq!(cam.position(), settings.position);
    }

    #[test]
    fn projection_uses_zoom() {
        let cam = Camera::default();
        let proj = cam.projection_matrix(16.0 / 9.0, 0.1, 10_000.0);
        let expected = Mat4::perspective_rh(45.0_f32.to_radians(), 16.0 / 9.0, 0.1, 10_000.0);
        assert!(proj.abs_diff_eq(expected, 1e-6));
    }
}
