//! Pure math/data for geometry & transforms in Zoomable
//!
//! This crate contains the geometry primitives, the axis-aligned affine
//! matrix, and the alignment types used throughout the Zoomable engine.

mod alignment;
mod geometry;
mod matrix;

pub use alignment::*;
pub use geometry::*;
pub use matrix::*;
