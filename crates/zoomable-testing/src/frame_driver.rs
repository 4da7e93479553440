//! Synthetic frame-tick driver for tests.

use std::rc::Rc;

use zoomable_core::{FrameLoop, FrameLoopHandle, NoopScheduler};

/// Drives a [`FrameLoop`] with synthetic, strictly increasing frame
/// timestamps so animations and flings can be stepped without a real
/// clock or display.
pub struct FrameDriver {
    frame_loop: FrameLoop,
    now_nanos: u64,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            frame_loop: FrameLoop::new(Rc::new(NoopScheduler)),
            now_nanos: 0,
        }
    }

    /// Handle to pass to the engine under test.
    pub fn handle(&self) -> FrameLoopHandle {
        self.frame_loop.handle()
    }

    /// Current synthetic time in nanoseconds.
    pub fn now_nanos(&self) -> u64 {
        self.now_nanos
    }

    /// Whether any frame callback is still pending.
    pub fn has_pending_work(&self) -> bool {
        self.frame_loop.has_frame_callbacks()
    }

    /// Advances time by `dt_ms` and drains one frame.
    pub fn advance_frame(&mut self, dt_ms: u64) {
        self.now_nanos += dt_ms * 1_000_000;
        self.frame_loop.drain_frame_callbacks(self.now_nanos);
    }

    /// Runs `count` frames at a fixed `dt_ms` cadence.
    pub fn run_frames(&mut self, count: usize, dt_ms: u64) {
        for _ in 0..count {
            self.advance_frame(dt_ms);
        }
    }

    /// Steps frames until no callbacks remain, up to `max_frames`. Returns
    /// whether the loop went quiet.
    pub fn run_until_settled(&mut self, dt_ms: u64, max_frames: usize) -> bool {
        for _ in 0..max_frames {
            if !self.frame_loop.has_frame_callbacks() {
                return true;
            }
            self.advance_frame(dt_ms);
        }
        !self.frame_loop.has_frame_callbacks()
    }
}
