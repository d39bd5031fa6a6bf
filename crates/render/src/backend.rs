use flashgrid_common::Surface;
use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use std::fmt::Write as _;

/// Uniform names shared by the composer and every backend.
pub mod names {
    pub const LIGHT_POSITION: &str = "light.position";
    pub const LIGHT_DIRECTION: &str = "light.direction";
    pub const LIGHT_CUT_OFF: &str = "light.cutOff";
    pub const LIGHT_OUTER_CUT_OFF: &str = "light.outerCutOff";
    pub const LIGHT_AMBIENT: &str = "light.ambient";
    pub const LIGHT_DIFFUSE: &str = "light.diffuse";
    pub const LIGHT_SPECULAR: &str = "light.specular";
    pub const LIGHT_CONSTANT: &str = "light.constant";
    pub const LIGHT_LINEAR: &str = "light.linear";
    pub const LIGHT_QUADRATIC: &str = "light.quadratic";
    pub const VIEW_POS: &str = "viewPos";
    pub const MATERIAL_DIFFUSE: &str = "material.diffuse";
    pub const MATERIAL_SPECULAR: &str = "material.specular";
    pub const MATERIAL_SHININESS: &str = "material.shininess";
    pub const TIME: &str = "iTime";
    pub const CHEAT_MODE: &str = "cheatMode";
    pub const MODEL: &str = "model";
    pub const VIEW: &str = "view";
    pub const PROJECTION: &str = "projection";
}

/// A value that can be written to a named shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
}

/// Shading and draw collaborator driven by the frame composer.
///
/// `use_program` must be called before any uniform writes of a batch. Draws
/// always submit the same 36-vertex unit cube with whatever `model` uniform
/// and texture pair are current.
pub trait ShadingBackend {
    fn use_program(&mut self);

    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Bind the diffuse + specular texture pair for a surface.
    fn bind_textures(&mut self, surface: Surface);

    fn draw_cube(&mut self);
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    UseProgram,
    SetUniform(String, UniformValue),
    BindTextures(Surface),
    DrawCube,
}

/// Backend that records calls instead of touching a GPU.
///
/// Used by the headless CLI and by tests to inspect exactly what a frame
/// submitted.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::DrawCube))
            .count()
    }

    /// Most recent value written to `name`.
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.calls.iter().rev().find_map(|c| match c {
            BackendCall::SetUniform(n, v) if n == name => Some(*v),
            _ => None,
        })
    }

    /// Model matrices in draw order, paired with the bound surface.
    pub fn draws(&self) -> Vec<(Surface, Mat4)> {
        let mut surface = None;
        let mut model = Mat4::IDENTITY;
        let mut out = Vec::new();
        for call in &self.calls {
            match call {
                BackendCall::BindTextures(s) => surface = Some(*s),
                BackendCall::SetUniform(n, UniformValue::Mat4(m)) if n == names::MODEL => {
                    model = *m
                }
                BackendCall::DrawCube => {
                    if let Some(s) = surface {
                        out.push((s, model));
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// Human-readable report of the recorded frame.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let draws = self.draws();
        let ground = draws.iter().filter(|(s, _)| *s == Surface::Ground).count();
        let binds = self
            .calls
            .iter()
            .filter(|c| matches!(c, BackendCall::BindTextures(_)))
            .count();
        let _ = writeln!(
            out,
            "=== Frame (calls={}, draws={}, ground={}, wall={}, texture binds={}) ===",
            self.calls.len(),
            draws.len(),
            ground,
            draws.len() - ground,
            binds
        );
        for name in [
            names::LIGHT_POSITION,
            names::LIGHT_DIRECTION,
            names::LIGHT_CUT_OFF,
            names::LIGHT_OUTER_CUT_OFF,
            names::TIME,
            names::CHEAT_MODE,
        ] {
            if let Some(value) = self.uniform(name) {
                let _ = writeln!(out, "  {name} = {}", format_value(&value));
            }
        }
        out
    }
}

impl ShadingBackend for RecordingBackend {
    fn use_program(&mut self) {
        self.calls.push(BackendCall::UseProgram);
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.calls.push(BackendCall::SetUniform(name.to_string(), value));
    }

    fn bind_textures(&mut self, surface: Surface) {
        self.calls.push(BackendCall::BindTextures(surface));
    }

    fn draw_cube(&mut self) {
        self.calls.push(BackendCall::DrawCube);
    }
}

fn format_value(value: &UniformValue) -> String {
    match value {
        UniformValue::Bool(b) => b.to_string(),
        UniformValue::Int(i) => i.to_string(),
        UniformValue::Float(f) => format!("{f:.3}"),
        UniformValue::Vec3(v) => format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z),
        other => format!("{other:?}"),
    }
}
