//! framestream - stream frames from a WebAssembly compute engine
//!
//! ```bash
//! framestream engine.wasm
//! framestream engine.wasm --frame-rate 30 --size 256
//! RUST_LOG=debug framestream engine.wasm --config ./framestream.toml
//! ```

use anyhow::Result;
use clap::Parser;
use framestream_player::{Args, PlayerApp, launch};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = launch::resolve_config(&args)?;
    tracing::info!(
        "Starting {} at {} fps, {}x{} frames",
        args.engine.display(),
        config.stream.frame_rate,
        config.stream.render_size,
        config.stream.render_size
    );

    let engine = launch::load_engine(&args.engine, &config)?;
    let player_loop = launch::build_loop(engine, &config)?;

    framestream_player::run(PlayerApp::new(player_loop, config.window))
}
