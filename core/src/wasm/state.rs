//! Per-store engine state

use wasmtime::{StoreLimits, StoreLimitsBuilder};

/// Size of one wasm linear memory page
pub const WASM_PAGE_SIZE: usize = 64 * 1024;

/// Fallback linear memory limit (64MB)
pub const DEFAULT_RAM_LIMIT: usize = 64 * 1024 * 1024;

/// Data stored alongside the engine instance in its wasmtime `Store`
pub struct EngineState {
    /// Growth limits enforced by the store's resource limiter
    pub limits: StoreLimits,
    /// Maximum linear memory in bytes
    pub ram_limit: usize,
}

impl EngineState {
    pub fn with_ram_limit(ram_limit: usize) -> Self {
        Self {
            limits: StoreLimitsBuilder::new()
                .memory_size(ram_limit)
                .instances(1)
                .build(),
            ram_limit,
        }
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::with_ram_limit(DEFAULT_RAM_LIMIT)
    }
}
