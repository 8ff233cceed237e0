//! GPU-side seam of the loop
//!
//! The orchestrator only knows how to hand a frame to something that can put
//! it on screen. The player crate implements this with wgpu; tests use a
//! recording double.

use crate::bridge::FrameView;
use crate::error::FrameError;

/// Destination for frames produced by the engine
pub trait Presenter {
    /// Copy the frame's pixels into the presentation texture
    ///
    /// Must not change the texture's size or format.
    fn upload(&mut self, frame: FrameView<'_>) -> Result<(), FrameError>;

    /// Draw the textured quad and present it
    fn draw(&mut self) -> Result<(), FrameError>;
}
