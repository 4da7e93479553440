//! Single-threaded frame loop driving Zoomable animations
//!
//! Animations and flings are modeled as per-frame callbacks: a step
//! registers itself, the host drains the queue once per display frame with
//! the current frame timestamp, and the step re-registers while it has
//! work left. Nothing here blocks and nothing is shared across threads.

mod frame_loop;

pub use frame_loop::*;
