//! Error taxonomy for the presentation loop
//!
//! Startup failures ([`SetupError`]) abort initialization and are never
//! retried. Per-frame failures ([`FrameError`]) are local to one tick: the
//! orchestrator logs them and keeps scheduling.

use std::fmt;

use thiserror::Error;

/// Shader stage that failed to compile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Fatal errors raised while bringing the loop from `Uninitialized` to `Running`
#[derive(Debug, Error)]
pub enum SetupError {
    /// No adapter, device or surface could be obtained
    #[error("GPU context unavailable: {0}")]
    GpuContextUnavailable(String),

    /// A shader source failed to parse or validate
    #[error("{stage} shader failed to compile:\n{log}")]
    ShaderCompileFailure { stage: ShaderStage, log: String },

    /// Vertex and fragment stages do not form a usable program
    #[error("shader program failed to link:\n{log}")]
    ShaderLinkFailure { log: String },

    /// The engine's `init` export trapped or returned an error
    #[error("engine init failed: {0}")]
    EngineInit(String),

    /// Frame dimensions are zero or not square
    #[error("invalid frame dimensions {width}x{height} (must be square and non-zero)")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Recoverable errors that cost exactly one frame
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The engine's compute call trapped or returned an error
    #[error("engine call failed: {summary}")]
    EngineCallFailure { summary: String, details: String },

    /// The engine's memory cannot cover a full frame at the returned offset
    #[error(
        "frame buffer at offset {offset} needs {expected} bytes, engine memory has {available}"
    )]
    BufferSizeMismatch {
        offset: usize,
        expected: usize,
        available: usize,
    },

    /// The presenter could not get the frame on screen
    #[error("present failed: {0}")]
    PresentFailure(String),
}
