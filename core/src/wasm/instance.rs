//! Instantiated compute engine

use anyhow::{Context, Result};
use wasmtime::{Instance, Linker, Memory, Module, Store, TypedFunc};

use super::engine::WasmEngine;
use super::state::{DEFAULT_RAM_LIMIT, EngineState};
use crate::bridge::ComputeEngine;

/// Export names accepted for the per-frame compute function, in lookup order
pub const COMPUTE_EXPORTS: [&str; 2] = ["compute", "go"];

/// Compute export, in either float width the engine was built with
enum ComputeFn {
    F32(TypedFunc<(f32, f32), i32>),
    F64(TypedFunc<(f64, f64), i32>),
}

/// A loaded and instantiated compute engine
///
/// Required exports: `memory`, `init(i32, i32)`, and `compute` (or `go`)
/// taking two floats and returning a pointer into `memory`. An optional
/// `toggle()` export receives clicks.
pub struct EngineInstance {
    store: Store<EngineState>,
    memory: Memory,
    init_fn: TypedFunc<(i32, i32), ()>,
    compute_fn: ComputeFn,
    compute_export: &'static str,
    toggle_fn: Option<TypedFunc<(), ()>>,
    frames: u64,
}

impl EngineInstance {
    /// Instantiate with the fallback RAM limit
    pub fn new(engine: &WasmEngine, module: &Module) -> Result<Self> {
        Self::with_ram_limit(engine, module, DEFAULT_RAM_LIMIT)
    }

    /// Instantiate with linear memory capped at `ram_limit` bytes
    pub fn with_ram_limit(
        engine: &WasmEngine,
        module: &Module,
        ram_limit: usize,
    ) -> Result<Self> {
        WasmEngine::validate_module_memory(module, ram_limit)?;

        let mut store = Store::new(engine.engine(), EngineState::with_ram_limit(ram_limit));
        store.limiter(|state| &mut state.limits);

        // Engines are self-contained; nothing is provided to import
        let linker = Linker::new(engine.engine());
        let instance = linker
            .instantiate(&mut store, module)
            .context("Failed to instantiate engine module")?;

        let memory = instance
            .get_memory(&mut store, "memory")
            .context("Engine does not export 'memory'")?;

        let init_fn = instance
            .get_typed_func::<(i32, i32), ()>(&mut store, "init")
            .context("Engine export 'init' is missing or is not (i32, i32) -> ()")?;
        let (compute_export, compute_fn) = resolve_compute(&instance, &mut store)?;
        let toggle_fn = instance.get_typed_func::<(), ()>(&mut store, "toggle").ok();
        if toggle_fn.is_none() {
            tracing::debug!("Engine exports no 'toggle'; clicks will be ignored");
        }

        tracing::info!(
            "Engine instantiated: compute export '{}', {} bytes of memory, limit {} bytes",
            compute_export,
            memory.data_size(&store),
            ram_limit
        );

        Ok(Self {
            store,
            memory,
            init_fn,
            compute_fn,
            compute_export,
            toggle_fn,
            frames: 0,
        })
    }

    /// Name of the export used for per-frame compute
    pub fn compute_export(&self) -> &'static str {
        self.compute_export
    }

    pub fn has_toggle(&self) -> bool {
        self.toggle_fn.is_some()
    }

    /// Number of successful compute calls
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn state(&self) -> &EngineState {
        self.store.data()
    }
}

fn resolve_compute(
    instance: &Instance,
    store: &mut Store<EngineState>,
) -> Result<(&'static str, ComputeFn)> {
    for name in COMPUTE_EXPORTS {
        if instance.get_func(&mut *store, name).is_none() {
            continue;
        }
        if let Ok(func) = instance.get_typed_func::<(f32, f32), i32>(&mut *store, name) {
            return Ok((name, ComputeFn::F32(func)));
        }
        if let Ok(func) = instance.get_typed_func::<(f64, f64), i32>(&mut *store, name) {
            return Ok((name, ComputeFn::F64(func)));
        }
        anyhow::bail!(
            "Engine export '{}' must be (f32, f32) -> i32 or (f64, f64) -> i32",
            name
        );
    }
    anyhow::bail!(
        "Engine exports no compute function (looked for {})",
        COMPUTE_EXPORTS.join(", ")
    )
}

impl ComputeEngine for EngineInstance {
    fn init(&mut self, width: u32, height: u32) -> Result<()> {
        self.init_fn
            .call(&mut self.store, (width as i32, height as i32))
            .with_context(|| format!("Engine init({width}, {height}) failed"))
    }

    fn compute(&mut self, x: f32, y: f32) -> Result<u32> {
        let ptr = match &self.compute_fn {
            ComputeFn::F32(func) => func.call(&mut self.store, (x, y)),
            ComputeFn::F64(func) => func.call(&mut self.store, (f64::from(x), f64::from(y))),
        }
        .with_context(|| {
            format!(
                "Engine {}() failed on frame {}",
                self.compute_export, self.frames
            )
        })?;
        self.frames += 1;
        // Pointers are unsigned 32-bit addresses
        Ok(ptr as u32)
    }

    fn toggle(&mut self) -> Result<()> {
        match &self.toggle_fn {
            Some(func) => func
                .call(&mut self.store, ())
                .context("Engine toggle() failed"),
            None => Ok(()),
        }
    }

    fn memory(&self) -> &[u8] {
        self.memory.data(&self.store)
    }
}
