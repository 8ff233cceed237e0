//! Loop counters

/// Running totals of how refresh callbacks were spent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Ticks that put a new frame on screen
    pub rendered: u64,
    /// Ticks lost to an engine or present failure
    pub skipped: u64,
    /// Callbacks rejected by the frame clock
    pub paced: u64,
}

impl LoopStats {
    /// Accepted ticks, whether or not they rendered
    pub fn ticks(&self) -> u64 {
        self.rendered + self.skipped
    }
}
