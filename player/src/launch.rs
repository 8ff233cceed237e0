//! Startup plumbing from settings to a ready-to-start loop

use std::path::Path;

use anyhow::{Context, Result};
use framestream_core::config::{self, Config};
use framestream_core::{
    EngineInstance, FrameClock, FrameDimensions, Orchestrator, WasmEngine,
};

use crate::cli::Args;
use crate::graphics::WgpuPresenter;

/// The loop as driven by the player
pub type PlayerLoop = Orchestrator<EngineInstance, WgpuPresenter>;

/// Resolve the effective config: file (explicit or platform default), then flags
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Read, compile and instantiate the engine module at `path`
pub fn load_engine(path: &Path, config: &Config) -> Result<EngineInstance> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read engine module {}", path.display()))?;
    instantiate_engine(&bytes, config)
        .with_context(|| format!("Failed to load engine {}", path.display()))
}

pub fn instantiate_engine(bytes: &[u8], config: &Config) -> Result<EngineInstance> {
    let engine = WasmEngine::new()?;
    let module = engine.load_module(bytes)?;
    EngineInstance::with_ram_limit(&engine, &module, config.engine.ram_limit_bytes())
}

/// Build the (not yet running) loop around an engine
pub fn build_loop(engine: EngineInstance, config: &Config) -> Result<PlayerLoop> {
    let dimensions = FrameDimensions::square(config.stream.render_size)?;
    let clock = FrameClock::new(config.stream.frame_rate);
    Ok(Orchestrator::new(engine, dimensions, clock)
        .with_stats_log_interval(config.stream.stats_log_interval))
}
