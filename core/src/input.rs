//! Pointer input mapping
//!
//! Converts pointer positions in surface pixel space into the normalized
//! coordinate pair handed to the engine every frame.

/// Rectangle of the presentation surface in the pointer's pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    /// Surface whose origin is the pointer space origin (window client area)
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            width,
            height,
        }
    }
}

/// Last known pointer position in normalized coordinates
///
/// X grows rightwards and Y grows upwards; the surface spans roughly
/// [-1, 1] on each axis. Values are not clamped, so positions at or past the
/// surface edge may fall slightly outside that range.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

/// Map a pixel-space pointer position onto normalized coordinates
///
/// Returns `None` for a degenerate (zero or negative sized) surface.
pub fn map_pointer(pixel_x: f64, pixel_y: f64, surface: SurfaceRect) -> Option<PointerState> {
    if surface.width <= 0.0 || surface.height <= 0.0 {
        return None;
    }

    let u = (pixel_x - surface.origin_x) / surface.width;
    let v = (pixel_y - surface.origin_y) / surface.height;

    // Pixel Y grows downward, engine Y grows upward. Keep this sign: top-left
    // must reach the engine as (-1, 1) even though some engines expect it flipped.
    Some(PointerState {
        x: (2.0 * (u - 0.5)) as f32,
        y: (-2.0 * (v - 0.5)) as f32,
    })
}
