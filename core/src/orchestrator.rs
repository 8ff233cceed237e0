//! Presentation loop orchestration
//!
//! Owns every piece of loop state (engine bridge, frame clock, pointer,
//! presenter) and runs the per-callback sequence:
//!
//! 1. ask the [`FrameClock`] whether this callback is a frame tick
//! 2. run the engine with the last pointer position
//! 3. upload the frame and draw it
//!
//! Startup errors are returned to the caller. Per-frame errors are logged and
//! cost only the current tick.

use std::time::Instant;

use crate::bridge::{ComputeBridge, ComputeEngine, FrameDimensions};
use crate::clock::FrameClock;
use crate::error::{FrameError, SetupError};
use crate::input::{PointerState, SurfaceRect, map_pointer};
use crate::presenter::Presenter;
use crate::stats::LoopStats;

/// Default number of rendered frames between stats log lines
pub const DEFAULT_STATS_LOG_INTERVAL: u64 = 240;

/// Loop lifecycle
///
/// There is no terminal state; the loop runs until the host exits.
pub enum LoopState<P> {
    Uninitialized,
    Running(P),
}

/// What a single refresh callback did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The loop has not been started
    Idle,
    /// Too early for the next frame
    Paced,
    /// A new frame was uploaded and drawn
    Rendered,
    /// The tick failed; the previous frame stays on screen
    Skipped(FrameError),
}

pub struct Orchestrator<E: ComputeEngine, P: Presenter> {
    bridge: ComputeBridge<E>,
    clock: FrameClock,
    pointer: PointerState,
    state: LoopState<P>,
    stats: LoopStats,
    stats_log_interval: u64,
}

impl<E: ComputeEngine, P: Presenter> Orchestrator<E, P> {
    pub fn new(engine: E, dimensions: FrameDimensions, clock: FrameClock) -> Self {
        Self {
            bridge: ComputeBridge::new(engine, dimensions),
            clock,
            pointer: PointerState::default(),
            state: LoopState::Uninitialized,
            stats: LoopStats::default(),
            stats_log_interval: DEFAULT_STATS_LOG_INTERVAL,
        }
    }

    /// Log a stats line every `interval` rendered frames (0 disables)
    pub fn with_stats_log_interval(mut self, interval: u64) -> Self {
        self.stats_log_interval = interval;
        self
    }

    /// Bring the loop from `Uninitialized` to `Running`
    ///
    /// `setup` builds the presenter (GPU context, shaders, buffers, texture).
    /// The engine's `init` runs only after it succeeds. On any failure the
    /// presenter is dropped and the loop stays uninitialized.
    pub fn start<F>(&mut self, setup: F) -> Result<(), SetupError>
    where
        F: FnOnce(FrameDimensions) -> Result<P, SetupError>,
    {
        if self.is_running() {
            tracing::warn!("Presentation loop already running, ignoring start");
            return Ok(());
        }

        let dimensions = self.bridge.dimensions();
        let presenter = setup(dimensions)?;
        self.bridge.init_engine()?;

        self.state = LoopState::Running(presenter);
        tracing::info!(
            "Presentation loop running: {}x{} at {:.2}ms per frame",
            dimensions.width(),
            dimensions.height(),
            self.clock.frame_interval().as_secs_f64() * 1000.0
        );
        Ok(())
    }

    /// Handle one display refresh callback
    pub fn on_refresh(&mut self, now: Instant) -> TickOutcome {
        let LoopState::Running(presenter) = &mut self.state else {
            return TickOutcome::Idle;
        };

        if !self.clock.should_render(now) {
            self.stats.paced += 1;
            return TickOutcome::Paced;
        }

        let result = self
            .bridge
            .produce_frame(self.pointer)
            .and_then(|frame| presenter.upload(frame))
            .and_then(|()| presenter.draw());

        match result {
            Ok(()) => {
                self.stats.rendered += 1;
                if self.stats_log_interval > 0
                    && self.stats.rendered.is_multiple_of(self.stats_log_interval)
                {
                    tracing::info!(
                        rendered = self.stats.rendered,
                        skipped = self.stats.skipped,
                        paced = self.stats.paced,
                        "Frame stats"
                    );
                }
                TickOutcome::Rendered
            }
            Err(e) => {
                self.stats.skipped += 1;
                tracing::warn!("Skipping frame {}: {}", self.clock.accepted_frames(), e);
                TickOutcome::Skipped(e)
            }
        }
    }

    /// Record a pointer move in surface pixel coordinates
    pub fn on_pointer_moved(&mut self, pixel_x: f64, pixel_y: f64, surface: SurfaceRect) {
        if let Some(pointer) = map_pointer(pixel_x, pixel_y, surface) {
            self.pointer = pointer;
        }
    }

    /// Forward a click to the engine
    pub fn on_click(&mut self) {
        if !self.is_running() {
            return;
        }
        if let Err(e) = self.bridge.toggle() {
            tracing::warn!("Engine toggle failed: {}", e);
        }
    }

    /// When the next frame can be accepted, for scheduling the next wake-up
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            LoopState::Running(_) => self.clock.next_deadline(),
            LoopState::Uninitialized => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running(_))
    }

    pub fn presenter(&self) -> Option<&P> {
        match &self.state {
            LoopState::Running(presenter) => Some(presenter),
            LoopState::Uninitialized => None,
        }
    }

    pub fn presenter_mut(&mut self) -> Option<&mut P> {
        match &mut self.state {
            LoopState::Running(presenter) => Some(presenter),
            LoopState::Uninitialized => None,
        }
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn engine(&self) -> &E {
        self.bridge.engine()
    }
}
