//! Easing curves and fling physics for Zoomable
//!
//! Provides time-based interpolation with easing curves, the spline-based
//! velocity decay used for flings, and a bounded scroller that converges
//! back into pan bounds after overshooting.

mod decay;
mod easing;
mod scroller;

pub use decay::*;
pub use easing::*;
pub use scroller::*;
