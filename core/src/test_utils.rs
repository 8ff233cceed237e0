//! Shared test doubles for the engine and presenter seams

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::bridge::{ComputeEngine, FrameView};
use crate::error::FrameError;
use crate::presenter::Presenter;

// ============================================================================
// Scripted engine
// ============================================================================

enum Step {
    Offset { offset: u32, paint: Option<u8> },
    Fail(String),
}

/// Engine double that replays a queue of compute results
///
/// With an empty script, `compute` returns offset 0.
pub struct ScriptedEngine {
    memory: Vec<u8>,
    script: VecDeque<Step>,
    frame_len: usize,
    grow_to: Option<usize>,
    init_calls: Vec<(u32, u32)>,
    toggle_calls: u32,
    fail_init: bool,
    fail_toggle: bool,
    last_pointer: Option<(f32, f32)>,
}

impl ScriptedEngine {
    pub fn new(memory_len: usize) -> Self {
        Self {
            memory: vec![0; memory_len],
            script: VecDeque::new(),
            frame_len: 0,
            grow_to: None,
            init_calls: Vec::new(),
            toggle_calls: 0,
            fail_init: false,
            fail_toggle: false,
            last_pointer: None,
        }
    }

    /// Byte length painted by [`push_painted`](Self::push_painted)
    pub fn with_frame_len(mut self, frame_len: usize) -> Self {
        self.frame_len = frame_len;
        self
    }

    /// Fill a `size`x`size` RGBA8 frame at `offset` with `byte`
    pub fn fill_frame(&mut self, offset: usize, size: usize, byte: u8) {
        let len = size * size * 4;
        self.memory[offset..offset + len].fill(byte);
    }

    pub fn push_offset(&mut self, offset: u32) {
        self.script.push_back(Step::Offset {
            offset,
            paint: None,
        });
    }

    /// Return `offset` after painting `frame_len` bytes there with `byte`
    pub fn push_painted(&mut self, offset: u32, byte: u8) {
        self.script.push_back(Step::Offset {
            offset,
            paint: Some(byte),
        });
    }

    pub fn push_failure(&mut self, message: &str) {
        self.script.push_back(Step::Fail(message.to_string()));
    }

    /// Resize memory to `len` bytes during the next compute call
    pub fn grow_on_compute(&mut self, len: usize) {
        self.grow_to = Some(len);
    }

    pub fn fail_init(&mut self) {
        self.fail_init = true;
    }

    pub fn fail_toggle(&mut self) {
        self.fail_toggle = true;
    }

    pub fn init_calls(&self) -> &[(u32, u32)] {
        &self.init_calls
    }

    pub fn toggle_calls(&self) -> u32 {
        self.toggle_calls
    }

    pub fn last_pointer(&self) -> Option<(f32, f32)> {
        self.last_pointer
    }
}

impl ComputeEngine for ScriptedEngine {
    fn init(&mut self, width: u32, height: u32) -> anyhow::Result<()> {
        self.init_calls.push((width, height));
        if self.fail_init {
            anyhow::bail!("wasm trap: wasm `unreachable` instruction executed");
        }
        Ok(())
    }

    fn compute(&mut self, x: f32, y: f32) -> anyhow::Result<u32> {
        self.last_pointer = Some((x, y));
        if let Some(len) = self.grow_to.take() {
            self.memory.resize(len, 0);
        }
        match self.script.pop_front() {
            None => Ok(0),
            Some(Step::Fail(message)) => Err(anyhow::anyhow!(message)),
            Some(Step::Offset { offset, paint }) => {
                if let Some(byte) = paint {
                    let start = offset as usize;
                    self.memory[start..start + self.frame_len].fill(byte);
                }
                Ok(offset)
            }
        }
    }

    fn toggle(&mut self) -> anyhow::Result<()> {
        self.toggle_calls += 1;
        if self.fail_toggle {
            anyhow::bail!("toggle trapped");
        }
        Ok(())
    }

    fn memory(&self) -> &[u8] {
        &self.memory
    }
}

// ============================================================================
// Recording presenter
// ============================================================================

/// What a [`RecordingPresenter`] has seen, shared with the test body
#[derive(Debug, Default)]
pub struct PresenterLog {
    /// Contents of the simulated texture after the last upload
    pub texture: Vec<u8>,
    pub uploads: u32,
    pub draws: u32,
}

/// Presenter double that keeps the uploaded pixels in memory
pub struct RecordingPresenter {
    log: Rc<RefCell<PresenterLog>>,
    fail_draw: bool,
}

impl RecordingPresenter {
    pub fn new(texture_len: usize) -> (Self, Rc<RefCell<PresenterLog>>) {
        let log = Rc::new(RefCell::new(PresenterLog {
            texture: vec![0; texture_len],
            ..Default::default()
        }));
        (
            Self {
                log: Rc::clone(&log),
                fail_draw: false,
            },
            log,
        )
    }

    pub fn failing_draws(mut self) -> Self {
        self.fail_draw = true;
        self
    }
}

impl Presenter for RecordingPresenter {
    fn upload(&mut self, frame: FrameView<'_>) -> Result<(), FrameError> {
        let mut log = self.log.borrow_mut();
        let expected = log.texture.len();
        if frame.len() != expected {
            return Err(FrameError::BufferSizeMismatch {
                offset: 0,
                expected,
                available: frame.len(),
            });
        }
        log.texture.copy_from_slice(frame.pixels());
        log.uploads += 1;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), FrameError> {
        if self.fail_draw {
            return Err(FrameError::PresentFailure("surface lost".to_string()));
        }
        self.log.borrow_mut().draws += 1;
        Ok(())
    }
}
