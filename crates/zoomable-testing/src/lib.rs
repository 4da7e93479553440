//! Testing utilities and harness for Zoomable

mod frame_driver;
mod recording_listener;

pub use frame_driver::*;
pub use recording_listener::*;
