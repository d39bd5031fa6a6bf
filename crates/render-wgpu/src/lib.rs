//! wgpu render backend for the flashgrid scene.
//!
//! [`FrameRecorder`] implements the composer's shading interface on the CPU
//! side; [`WgpuRenderer`] uploads what it recorded and submits one draw of the
//! 36-vertex cube per recorded cube.
//!
//! # Invariants
//! - Renderer never mutates scene state.
//! - Textures that failed to load are drawn with a black placeholder.

mod gpu;
mod mesh;
mod recorder;
mod shaders;
mod texture;

pub use gpu::WgpuRenderer;
pub use mesh::{CUBE_VERTEX_COUNT, Vertex, cube_vertices};
pub use recorder::{DrawCommand, FrameRecorder};
pub use texture::GpuTexture;
