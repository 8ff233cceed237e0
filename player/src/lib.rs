//! Framestream Player - window, GPU presenter and CLI
//!
//! Hosts a [`framestream_core::Orchestrator`] inside a winit window and draws
//! its frames with wgpu.

pub mod app;
pub mod cli;
pub mod graphics;
pub mod launch;

pub use app::{PlayerApp, run};
pub use cli::Args;
pub use graphics::WgpuPresenter;
