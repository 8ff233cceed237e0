//! Framestream Core - engine-driven frame streaming
//!
//! Runs an external WebAssembly compute engine at a fixed frame rate and
//! hands every frame it produces to a presenter.
//!
//! # Architecture
//!
//! - [`ComputeEngine`] - Capability trait for the engine (init, compute, toggle, memory)
//! - [`EngineInstance`] - Engine loaded from a `.wasm` module with wasmtime
//! - [`ComputeBridge`] - Turns the engine's returned offset into a checked [`FrameView`]
//! - [`FrameClock`] - Drift-corrected frame pacing
//! - [`Presenter`] - GPU-side seam (implemented by the player crate)
//! - [`Orchestrator`] - Owns the loop state and runs each refresh callback

pub mod bridge;
pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod orchestrator;
pub mod presenter;
pub mod stats;
#[cfg(test)]
pub mod test_utils;
pub mod wasm;

pub use bridge::{ComputeBridge, ComputeEngine, FrameDimensions, FrameView};
pub use clock::{DEFAULT_FRAME_RATE, FrameClock};
pub use config::Config;
pub use error::{FrameError, SetupError, ShaderStage};
pub use input::{PointerState, SurfaceRect, map_pointer};
pub use orchestrator::{LoopState, Orchestrator, TickOutcome};
pub use presenter::Presenter;
pub use stats::LoopStats;
pub use wasm::{EngineInstance, WasmEngine};
