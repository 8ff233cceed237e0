//! GPU presentation
//!
//! - [`GpuContext`] - device, queue and window surface
//! - [`FrameTexture`] - RGBA8 texture the engine's frames are copied into
//! - [`QuadPipeline`] - full-surface quad sampling that texture
//! - [`WgpuPresenter`] - ties them together behind the core `Presenter` trait

mod context;
mod pipeline;
mod presenter;
pub mod shader;
pub mod shaders;
mod texture;

pub use context::GpuContext;
pub use pipeline::{QUAD_POSITIONS, QUAD_TEX_COORDS, QUAD_VERTEX_COUNT, QuadPipeline};
pub use presenter::WgpuPresenter;
pub use shaders::ShaderSources;
pub use texture::{FRAME_FORMAT, FrameTexture};
