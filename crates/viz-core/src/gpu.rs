//! Shared pieces of the shader renderer: the uniform block layout, the WGSL
//! source, and the seam the frame scheduler drives the GPU backend through.

use crate::error::Result;
use crate::particles::mean_level;

pub static VISUALS_WGSL: &str = include_str!("../shaders/visuals.wgsl");

/// Per-frame uniform block, 16 bytes, mirrored by `Uniforms` in the shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuUniforms {
    pub time: f32,
    pub amplitude: f32,
    pub aspect: f32,
    pub mode: u32,
}

impl GpuUniforms {
    pub fn new(
        elapsed_sec: f32,
        freq: &[u8],
        sensitivity: f32,
        width: u32,
        height: u32,
        program: u32,
    ) -> Self {
        Self {
            time: elapsed_sec.max(0.0),
            amplitude: mean_level(freq) * sensitivity,
            aspect: width.max(1) as f32 / height.max(1) as f32,
            mode: program,
        }
    }
}

/// Which of the two canvases a frame targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceSlot {
    Primary = 0,
    Fullscreen = 1,
}

impl SurfaceSlot {
    #[inline]
    pub fn for_fullscreen(fullscreen: bool) -> Self {
        if fullscreen {
            SurfaceSlot::Fullscreen
        } else {
            SurfaceSlot::Primary
        }
    }
}

/// Backend for GPU-backed modes.
pub trait ShaderRenderer {
    /// Reconfigure the slot's swapchain; zero sizes and repeats are ignored.
    fn resize(&mut self, slot: SurfaceSlot, width: u32, height: u32);
    fn render(&mut self, slot: SurfaceSlot, uniforms: &GpuUniforms) -> Result<()>;
}
