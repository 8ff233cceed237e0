//! Compute engine bridge
//!
//! Calls the engine once per frame tick and turns the returned memory offset
//! into a length-checked [`FrameView`] over the engine's linear memory.

use crate::diagnostics::engine_call_failure;
use crate::error::{FrameError, SetupError};
use crate::input::PointerState;

/// Capabilities the loop needs from the external compute engine
///
/// The engine owns a growable linear memory. Any call may reallocate it, so
/// callers must re-read [`memory`](Self::memory) after every call instead of
/// holding on to a previous slice.
pub trait ComputeEngine {
    /// One-time setup with the frame size the host will read back
    fn init(&mut self, width: u32, height: u32) -> anyhow::Result<()>;

    /// Produce one frame and return the byte offset of its RGBA8 pixels
    fn compute(&mut self, x: f32, y: f32) -> anyhow::Result<u32>;

    /// Side-effecting signal sent on every click
    fn toggle(&mut self) -> anyhow::Result<()>;

    /// Current contents of the engine's linear memory
    fn memory(&self) -> &[u8];
}

/// Size of the frames exchanged with the engine
///
/// Frames are square RGBA8, four bytes per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDimensions {
    width: u32,
    height: u32,
}

impl FrameDimensions {
    pub const BYTES_PER_PIXEL: usize = 4;

    pub fn new(width: u32, height: u32) -> Result<Self, SetupError> {
        if width == 0 || width != height {
            return Err(SetupError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn square(size: u32) -> Result<Self, SetupError> {
        Self::new(size, size)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes in one frame (`width * height * 4`)
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * Self::BYTES_PER_PIXEL
    }

    /// Bytes in one row of pixels
    pub fn bytes_per_row(&self) -> u32 {
        self.width * Self::BYTES_PER_PIXEL as u32
    }
}

/// Read-only window over one frame of pixels in engine memory
///
/// The view borrows the bridge, so it cannot outlive the tick that produced
/// it: the next engine call may move or grow the memory underneath.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pixels: &'a [u8],
    dimensions: FrameDimensions,
}

impl<'a> FrameView<'a> {
    /// Wrap `pixels`, which must be exactly one frame long
    pub fn new(pixels: &'a [u8], dimensions: FrameDimensions) -> Result<Self, FrameError> {
        let expected = dimensions.byte_len();
        if pixels.len() != expected {
            return Err(FrameError::BufferSizeMismatch {
                offset: 0,
                expected,
                available: pixels.len(),
            });
        }
        Ok(Self { pixels, dimensions })
    }

    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    pub fn dimensions(&self) -> FrameDimensions {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Drives a [`ComputeEngine`] at a fixed frame size
pub struct ComputeBridge<E: ComputeEngine> {
    engine: E,
    dimensions: FrameDimensions,
}

impl<E: ComputeEngine> ComputeBridge<E> {
    pub fn new(engine: E, dimensions: FrameDimensions) -> Self {
        Self { engine, dimensions }
    }

    /// Call the engine's `init` with the frame size
    pub fn init_engine(&mut self) -> Result<(), SetupError> {
        self.engine
            .init(self.dimensions.width(), self.dimensions.height())
            .map_err(|e| SetupError::EngineInit(format!("{e:#}")))
    }

    /// Run the engine for one tick and view the frame it produced
    pub fn produce_frame(&mut self, pointer: PointerState) -> Result<FrameView<'_>, FrameError> {
        let offset = self
            .engine
            .compute(pointer.x, pointer.y)
            .map_err(|e| engine_call_failure(&e))? as usize;

        let expected = self.dimensions.byte_len();
        let memory = self.engine.memory();
        let pixels = offset
            .checked_add(expected)
            .and_then(|end| memory.get(offset..end))
            .ok_or(FrameError::BufferSizeMismatch {
                offset,
                expected,
                available: memory.len(),
            })?;

        FrameView::new(pixels, self.dimensions)
    }

    /// Forward a click to the engine
    pub fn toggle(&mut self) -> Result<(), FrameError> {
        self.engine.toggle().map_err(|e| engine_call_failure(&e))
    }

    pub fn dimensions(&self) -> FrameDimensions {
        self.dimensions
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedEngine;

    fn dims(size: u32) -> FrameDimensions {
        FrameDimensions::square(size).unwrap()
    }

    #[test]
    fn test_dimensions_byte_len() {
        let d = dims(512);
        assert_eq!(d.byte_len(), 512 * 512 * 4);
        assert_eq!(d.bytes_per_row(), 2048);
    }

    #[test]
    fn test_dimensions_reject_non_square() {
        assert!(matches!(
            FrameDimensions::new(512, 256),
            Err(SetupError::InvalidDimensions {
                width: 512,
                height: 256
            })
        ));
        assert!(FrameDimensions::square(0).is_err());
    }

    #[test]
    fn test_frame_view_requires_exact_length() {
        let d = dims(2);
        let bytes = [0u8; 17];
        assert!(FrameView::new(&bytes[..16], d).is_ok());
        assert_eq!(
            FrameView::new(&bytes, d).unwrap_err(),
            FrameError::BufferSizeMismatch {
                offset: 0,
                expected: 16,
                available: 17
            }
        );
        assert!(FrameView::new(&bytes[..15], d).is_err());
    }

    #[test]
    fn test_produce_frame_reads_at_returned_offset() {
        let mut engine = ScriptedEngine::new(64);
        engine.fill_frame(8, 2, 0xAB);
        engine.push_offset(8);
        let mut bridge = ComputeBridge::new(engine, dims(2));

        let view = bridge.produce_frame(PointerState { x: 0.25, y: -0.5 }).unwrap();
        assert_eq!(view.len(), 16);
        assert!(view.pixels().iter().all(|&b| b == 0xAB));
        assert_eq!(bridge.engine().last_pointer(), Some((0.25, -0.5)));
    }

    #[test]
    fn test_produce_frame_sees_grown_memory() {
        let mut engine = ScriptedEngine::new(8);
        engine.push_offset(0);
        engine.grow_on_compute(64);
        let mut bridge = ComputeBridge::new(engine, dims(2));

        // Memory is too small before the call, large enough after it
        let view = bridge.produce_frame(PointerState::default()).unwrap();
        assert_eq!(view.len(), 16);
    }

    #[test]
    fn test_produce_frame_rejects_short_memory() {
        let mut engine = ScriptedEngine::new(20);
        engine.push_offset(8);
        let mut bridge = ComputeBridge::new(engine, dims(2));

        assert_eq!(
            bridge.produce_frame(PointerState::default()).unwrap_err(),
            FrameError::BufferSizeMismatch {
                offset: 8,
                expected: 16,
                available: 20
            }
        );
    }

    #[test]
    fn test_produce_frame_rejects_offset_past_end() {
        let mut engine = ScriptedEngine::new(16);
        engine.push_offset(u32::MAX);
        let mut bridge = ComputeBridge::new(engine, dims(2));
        assert!(matches!(
            bridge.produce_frame(PointerState::default()),
            Err(FrameError::BufferSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_produce_frame_maps_engine_error() {
        let mut engine = ScriptedEngine::new(64);
        engine.push_failure("wasm trap: integer divide by zero");
        let mut bridge = ComputeBridge::new(engine, dims(2));

        match bridge.produce_frame(PointerState::default()) {
            Err(FrameError::EngineCallFailure { summary, .. }) => {
                assert_eq!(summary, "integer divide by zero");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_init_engine_passes_dimensions() {
        let engine = ScriptedEngine::new(64);
        let mut bridge = ComputeBridge::new(engine, dims(4));
        bridge.init_engine().unwrap();
        assert_eq!(bridge.engine().init_calls(), &[(4, 4)]);
    }
}
