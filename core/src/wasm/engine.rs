//! Shared wasmtime engine and module checks

use anyhow::Context;
use thiserror::Error;
use wasmtime::{Engine, ExternType, Module};

use super::state::WASM_PAGE_SIZE;

/// An exported memory whose initial size is already over the RAM limit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "engine memory '{export}' starts at {min_pages} pages ({min_bytes} bytes), \
     limit is {limit} bytes"
)]
pub struct MemoryLimitExceeded {
    pub export: String,
    pub min_pages: u64,
    pub min_bytes: usize,
    pub limit: usize,
}

/// Process-wide wasmtime engine
pub struct WasmEngine {
    engine: Engine,
}

impl WasmEngine {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            engine: Engine::default(),
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Compile a module from `.wasm` bytes (or WAT text)
    pub fn load_module(&self, bytes: &[u8]) -> anyhow::Result<Module> {
        Module::new(&self.engine, bytes).context("Failed to compile engine module")
    }

    /// Reject a module whose exported memory cannot start within `ram_limit`
    ///
    /// Memories without a declared maximum pass; the store limiter caps their
    /// growth at run time.
    pub fn validate_module_memory(
        module: &Module,
        ram_limit: usize,
    ) -> Result<(), MemoryLimitExceeded> {
        let memories = module.exports().filter_map(|export| match export.ty() {
            ExternType::Memory(ty) => Some((export.name(), ty)),
            _ => None,
        });

        for (name, ty) in memories {
            let min_pages = ty.minimum();
            let min_bytes = usize::try_from(min_pages)
                .unwrap_or(usize::MAX)
                .saturating_mul(WASM_PAGE_SIZE);
            if min_bytes > ram_limit {
                return Err(MemoryLimitExceeded {
                    export: name.to_string(),
                    min_pages,
                    min_bytes,
                    limit: ram_limit,
                });
            }
            if ty.maximum().is_none() {
                tracing::debug!("Engine memory '{name}' is unbounded, capped at {ram_limit} bytes");
            }
        }
        Ok(())
    }
}
