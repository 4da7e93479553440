//! Semantic wrapper types for the engine's coordinate spaces.
//!
//! Zoom values and pan values each live in two spaces. A [`Zoom`] is the
//! user-facing value that reads `1.0` right after the initial fit; the
//! [`RealZoom`] is the actual scale applied to the content, `zoom * base`.
//! An [`AbsolutePan`] is expressed in content coordinates and does not
//! depend on the current zoom; a [`ScaledPan`] is the transform's actual
//! translation in view coordinates. Conversions are explicit so the two
//! spaces cannot be mixed by accident.

use std::ops::{Add, Sub};

/// User-facing zoom value, `1.0` at the initial fit.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Zoom(pub f32);

impl Zoom {
    /// Converts to the actual content scale under the given base zoom.
    pub fn to_real(self, base_zoom: f32) -> RealZoom {
        RealZoom(self.0 * base_zoom)
    }

    /// Applies a multiplicative factor.
    pub fn scaled_by(self, factor: f32) -> Zoom {
        Zoom(self.0 * factor)
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Zoom(1.0)
    }
}

/// Actual linear scale applied to the content; matches the transform's
/// scale components.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct RealZoom(pub f32);

impl RealZoom {
    /// Converts back to the user-facing zoom under the given base zoom.
    pub fn to_zoom(self, base_zoom: f32) -> Zoom {
        Zoom(self.0 / base_zoom)
    }
}

/// Translation in content coordinates, invariant to the current zoom.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct AbsolutePan {
    pub x: f32,
    pub y: f32,
}

impl AbsolutePan {
    pub const ZERO: AbsolutePan = AbsolutePan { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Converts to view coordinates at the given content scale.
    pub fn to_scaled(self, zoom: RealZoom) -> ScaledPan {
        ScaledPan::new(self.x * zoom.0, self.y * zoom.0)
    }
}

impl Add for AbsolutePan {
    type Output = AbsolutePan;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for AbsolutePan {
    type Output = AbsolutePan;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Translation in view coordinates; the transform's translation component.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScaledPan {
    pub x: f32,
    pub y: f32,
}

impl ScaledPan {
    pub const ZERO: ScaledPan = ScaledPan { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Converts to content coordinates at the given content scale. A
    /// degenerate scale maps everything onto the origin.
    pub fn to_absolute(self, zoom: RealZoom) -> AbsolutePan {
        if zoom.0 == 0.0 {
            return AbsolutePan::ZERO;
        }
        AbsolutePan::new(self.x / zoom.0, self.y / zoom.0)
    }
}

impl Add for ScaledPan {
    type Output = ScaledPan;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for ScaledPan {
    type Output = ScaledPan;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}
