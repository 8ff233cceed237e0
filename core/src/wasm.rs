//! WASM compute engine host
//!
//! Loads an engine module with wasmtime and exposes it through the
//! [`ComputeEngine`](crate::bridge::ComputeEngine) capability.
//!
//! # Key Types
//!
//! - [`WasmEngine`] - Shared wasmtime engine and module loading
//! - [`EngineInstance`] - Instantiated engine with its exports resolved
//! - [`EngineState`] - Per-store resource limits

mod engine;
mod instance;
mod state;

pub use engine::{MemoryLimitExceeded, WasmEngine};
pub use instance::{COMPUTE_EXPORTS, EngineInstance};
pub use state::{DEFAULT_RAM_LIMIT, EngineState, WASM_PAGE_SIZE};
