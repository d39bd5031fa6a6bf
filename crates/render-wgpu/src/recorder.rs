use bytemuck::{Pod, Zeroable};
use flashgrid_common::Surface;
use flashgrid_render::{ShadingBackend, UniformValue, names};
use glam::{Mat4, Vec3};

/// Per-frame uniform block, laid out to match `FrameUniforms` in WGSL.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub light_position: [f32; 3],
    pub light_cut_off: f32,
    pub light_direction: [f32; 3],
    pub light_outer_cut_off: f32,
    pub light_ambient: [f32; 3],
    pub light_constant: f32,
    pub light_diffuse: [f32; 3],
    pub light_linear: f32,
    pub light_specular: [f32; 3],
    pub light_quadratic: f32,
    pub view_pos: [f32; 3],
    pub time: f32,
    pub shininess: f32,
    pub cheat_mode: u32,
    pub _pad: [f32; 2],
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            light_constant: 1.0,
            shininess: 32.0,
            ..Self::zeroed()
        }
    }
}

/// One cube draw: which texture pair and where.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub surface: Surface,
    pub model: Mat4,
}

/// CPU-side shading backend that the GPU renderer consumes.
///
/// Named uniforms are folded into a uniform block; each `draw_cube` captures
/// the current `model` matrix and texture pair.
#[derive(Debug, Clone)]
pub struct FrameRecorder {
    active: bool,
    pub(crate) uniforms: FrameUniforms,
    model: Mat4,
    surface: Surface,
    draws: Vec<DrawCommand>,
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self {
            active: false,
            uniforms: FrameUniforms::default(),
            model: Mat4::IDENTITY,
            surface: Surface::Ground,
            draws: Vec::new(),
        }
    }
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame. Uniform values carry over; draws do not.
    pub fn reset(&mut self) {
        self.active = false;
        self.model = Mat4::IDENTITY;
        self.draws.clear();
    }

    pub fn draws(&self) -> &[DrawCommand] {
        &self.draws
    }

    pub fn cheat_mode(&self) -> bool {
        self.uniforms.cheat_mode != 0
    }

    pub fn light_position(&self) -> Vec3 {
        Vec3::from(self.uniforms.light_position)
    }

    pub fn view_projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.uniforms.projection)
            * Mat4::from_cols_array_2d(&self.uniforms.view)
    }
}

impl ShadingBackend for FrameRecorder {
    fn use_program(&mut self) {
        self.active = true;
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        if !self.active {
            tracing::warn!("uniform {name} written before use_program");
        }
        let u = &mut self.uniforms;
        match (name, value) {
            (names::VIEW, UniformValue::Mat4(m)) => u.view = m.to_cols_array_2d(),
            (names::PROJECTION, UniformValue::Mat4(m)) => u.projection = m.to_cols_array_2d(),
            (names::MODEL, UniformValue::Mat4(m)) => self.model = m,
            (names::LIGHT_POSITION, UniformValue::Vec3(v)) => u.light_position = v.to_array(),
            (names::LIGHT_DIRECTION, UniformValue::Vec3(v)) => u.light_direction = v.to_array(),
            (names::LIGHT_CUT_OFF, UniformValue::Float(f)) => u.light_cut_off = f,
            (names::LIGHT_OUTER_CUT_OFF, UniformValue::Float(f)) => u.light_outer_cut_off = f,
            (names::LIGHT_AMBIENT, UniformValue::Vec3(v)) => u.light_ambient = v.to_array(),
            (names::LIGHT_DIFFUSE, UniformValue::Vec3(v)) => u.light_diffuse = v.to_array(),
            (names::LIGHT_SPECULAR, UniformValue::Vec3(v)) => u.light_specular = v.to_array(),
            (names::LIGHT_CONSTANT, UniformValue::Float(f)) => u.light_constant = f,
            (names::LIGHT_LINEAR, UniformValue::Float(f)) => u.light_linear = f,
            (names::LIGHT_QUADRATIC, UniformValue::Float(f)) => u.light_quadratic = f,
            (names::VIEW_POS, UniformValue::Vec3(v)) => u.view_pos = v.to_array(),
            (names::MATERIAL_SHININESS, UniformValue::Float(f)) => u.shininess = f,
            (names::TIME, UniformValue::Float(f)) => u.time = f,
            (names::CHEAT_MODE, UniformValue::Bool(b)) => u.cheat_mode = b as u32,
            // Texture units are fixed by the bind group layout.
            (names::MATERIAL_DIFFUSE | names::MATERIAL_SPECULAR, UniformValue::Int(_)) => {}
            (other, value) => tracing::trace!("ignoring uniform {other} = {value:?}"),
        }
    }

    fn bind_textures(&mut self, surface: Surface) {
        self.surface = surface;
    }

    fn draw_cube(&mut self) {
        self.draws.push(DrawCommand {
            surface: self.surface,
            model: self.model,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashgrid_common::Settings;
    use flashgrid_render::{FrameComposer, SceneState};

    #[test]
    fn uniform_block_matches_wgsl_size() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 240);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
    }

    #[test]
    fn records_composed_frame() {
        let settings = Settings::default();
        let cubes = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];
        let composer = FrameComposer::from_settings(cubes.clone(), &settings);
        let mut scene = SceneState::from_settings(&settings);
        scene.frame.cheat.request();

        let mut recorder = FrameRecorder::new();
        composer.compose(&scene, 16.0 / 9.0, &mut recorder);

        let surfaces: Vec<_> = recorder.draws().iter().map(|d| d.surface).collect();
        assert_eq!(
            surfaces,
            vec![Surface::Ground, Surface::Wall, Surface::Wall, Surface::Ground]
        );
        for (draw, pos) in recorder.draws().iter().zip(&cubes) {
            assert_eq!(draw.model, Mat4::from_translation(*pos));
        }
        assert!(recorder.cheat_mode());
        assert_eq!(recorder.light_position(), scene.camera.position());
        assert_eq!(recorder.uniforms.light_cut_off, 12.5_f32.to_radians().cos());
        assert_eq!(recorder.uniforms.shininess, 32.0);

        recorder.reset();
        assert!(recorder.draws().is_empty());
        assert!(recorder.cheat_mode());
    }

    #[test]
    fn unknown_uniforms_are_ignored() {
        let mut recorder = FrameRecorder::new();
        recorder.use_program();
        let before = recorder.uniforms;
        recorder.set_uniform("doesNotExist", UniformValue::Float(3.0));
        recorder.set_uniform(names::TIME, UniformValue::Int(3));
        assert_eq!(recorder.uniforms, before);
    }
}
