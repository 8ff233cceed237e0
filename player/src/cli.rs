//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;
use framestream_core::Config;

/// Stream frames from a WebAssembly compute engine into a window
#[derive(Debug, Parser)]
#[command(name = "framestream")]
#[command(version)]
pub struct Args {
    /// Engine module (.wasm or .wat)
    pub engine: PathBuf,

    /// Target frames per second (overrides stream.frame_rate)
    #[arg(long)]
    pub frame_rate: Option<u32>,

    /// Edge of the square frame in pixels (overrides stream.render_size)
    #[arg(long)]
    pub size: Option<u32>,

    /// Config file to use instead of the platform default
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of file settings
    pub fn apply(&self, config: &mut Config) {
        if let Some(frame_rate) = self.frame_rate {
            config.stream.frame_rate = frame_rate;
        }
        if let Some(size) = self.size {
            config.stream.render_size = size;
        }
    }
}
