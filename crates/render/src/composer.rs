use crate::backend::{ShadingBackend, UniformValue, names};
use crate::scene::SceneState;
use flashgrid_common::{LightingSettings, ProjectionSettings, Settings, Surface};
use glam::{Mat4, Vec3};

/// Counters for one composed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draws: usize,
    pub ground_draws: usize,
    pub wall_draws: usize,
    pub texture_binds: usize,
}

/// Spotlight cone as cosines, the form the shader compares against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotCone {
    pub cut_off: f32,
    pub outer_cut_off: f32,
}

impl SpotCone {
    pub fn from_degrees(inner: f32, outer: f32) -> Self {
        Self {
            cut_off: inner.to_radians().cos(),
            outer_cut_off: outer.to_radians().cos(),
        }
    }

    /// A zero-width cone: no fragment passes the cut-off test.
    pub fn closed() -> Self {
        Self::from_degrees(0.0, 0.0)
    }
}

/// Builds every frame from the scene state and the static cube list.
#[derive(Debug, Clone)]
pub struct FrameComposer {
    cubes: Vec<Vec3>,
    cell_size: f32,
    lighting: LightingSettings,
    projection: ProjectionSettings,
}

impl FrameComposer {
    pub fn new(
        cubes: Vec<Vec3>,
        cell_size: f32,
        lighting: LightingSettings,
        projection: ProjectionSettings,
    ) -> Self {
        Self {
            cubes,
            cell_size,
            lighting,
            projection,
        }
    }

    pub fn from_settings(cubes: Vec<Vec3>, settings: &Settings) -> Self {
        Self::new(
            cubes,
            settings.world.cell_size,
            settings.lighting.clone(),
            settings.projection.clone(),
        )
    }

    pub fn cubes(&self) -> &[Vec3] {
        &self.cubes
    }

    pub fn projection_matrix(&self, scene: &SceneState, aspect: f32) -> Mat4 {
        scene
            .camera
            .projection_matrix(aspect, self.projection.near, self.projection.far)
    }

    /// Cone pushed for the current flashlight state.
    pub fn spot_cone(&self, flashlight_on: bool) -> SpotCone {
        if flashlight_on {
            SpotCone::from_degrees(self.lighting.cut_off, self.lighting.outer_cut_off)
        } else {
            SpotCone::closed()
        }
    }

    /// Push per-frame uniforms, then one draw per cube.
    pub fn compose<B: ShadingBackend + ?Sized>(
        &self,
        scene: &SceneState,
        aspect: f32,
        backend: &mut B,
    ) -> FrameStats {
        let view = scene.camera.view_matrix();
        let projection = self.projection_matrix(scene, aspect);

        self.push_frame_uniforms(scene, view, projection, backend);

        let mut stats = FrameStats::default();
        let mut bound = None;
        for &position in &self.cubes {
            let surface = Surface::for_height(position.y, self.cell_size);
            if bound != Some(surface) {
                backend.bind_textures(surface);
                bound = Some(surface);
                stats.texture_binds += 1;
            }
            backend.set_uniform(
                names::MODEL,
                UniformValue::Mat4(Mat4::from_translation(position)),
            );
            backend.draw_cube();

            stats.draws += 1;
            match surface {
                Surface::Ground => stats.ground_draws += 1,
                Surface::Wall => stats.wall_draws += 1,
            }
        }
        stats
    }

    fn push_frame_uniforms<B: ShadingBackend + ?Sized>(
        &self,
        scene: &SceneState,
        view: Mat4,
        projection: Mat4,
        backend: &mut B,
    ) {
        let light = &self.lighting;
        let camera = &scene.camera;
        let cone = self.spot_cone(scene.frame.flashlight_on());

        backend.use_program();
        let uniforms = [
            (names::LIGHT_POSITION, UniformValue::Vec3(camera.position())),
            (names::LIGHT_DIRECTION, UniformValue::Vec3(camera.front())),
            (names::LIGHT_CUT_OFF, UniformValue::Float(cone.cut_off)),
            (names::LIGHT_OUTER_CUT_OFF, UniformValue::Float(cone.outer_cut_off)),
            (names::VIEW_POS, UniformValue::Vec3(camera.position())),
            (names::LIGHT_AMBIENT, UniformValue::Vec3(light.ambient)),
            (names::LIGHT_DIFFUSE, UniformValue::Vec3(light.diffuse)),
            (names::LIGHT_SPECULAR, UniformValue::Vec3(light.specular)),
            (names::LIGHT_CONSTANT, UniformValue::Float(light.constant)),
            (names::LIGHT_LINEAR, UniformValue::Float(light.linear)),
            (names::LIGHT_QUADRATIC, UniformValue::Float(light.quadratic)),
            (names::MATERIAL_DIFFUSE, UniformValue::Int(0)),
            (names::MATERIAL_SPECULAR, UniformValue::Int(1)),
            (names::MATERIAL_SHININESS, UniformValue::Float(light.shininess)),
            (names::TIME, UniformValue::Float(scene.frame.total_time())),
            (names::CHEAT_MODE, UniformValue::Bool(scene.frame.cheat_mode())),
            (names::MODEL, UniformValue::Mat4(Mat4::IDENTITY)),
            (names::VIEW, UniformValue::Mat4(view)),
            (names::PROJECTION, UniformValue::Mat4(projection)),
        ];
        for (name, value) in uniforms {
            backend.set_uniform(name, value);
        }
    }
}
