//! Pan/zoom/gesture engine emitting affine transform updates
//!
//! [`ZoomEngine`] maintains a 2D affine transform mapping a fixed-size
//! content rectangle onto a variable-size viewport. It consumes classified
//! gesture events (drag deltas, scale factors with a focus point, fling
//! velocities) together with programmatic calls, enforces zoom/pan bounds
//! with elastic overscroll/overpinch tolerance, and emits transform
//! updates to a listener after every mutation step.
//!
//! Hosts are required to:
//! - forward the viewport size on every layout pass via
//!   [`ZoomEngine::set_viewport_size`],
//! - declare the content size via [`ZoomEngine::set_content_size`],
//! - feed classified gesture events to the `on_*` entry points,
//! - drain the engine's frame loop once per display frame so animations
//!   and flings can step.
//!
//! The engine is single-threaded: state lives behind `Rc`/`RefCell` and
//! long-running transitions are cooperative per-frame callbacks, never
//! blocking loops.

mod bounds;
mod engine;
mod options;
mod state;
mod transform;
mod units;

pub use bounds::*;
pub use engine::*;
pub use options::*;
pub use state::*;
pub use transform::*;
pub use units::*;

pub use zoomable_graphics::{
    Alignment, HorizontalAlignment, Matrix, Point, Rect, Size, VerticalAlignment,
};
