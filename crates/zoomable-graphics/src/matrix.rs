//! Axis-aligned affine transform.
//!
//! The engine only ever composes uniform scales and translations, so the
//! matrix is stored as per-axis scale plus translation. Mapping a point is
//! `(sx * x + tx, sy * y + ty)`.

use crate::{Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    sx: f32,
    sy: f32,
    tx: f32,
    ty: f32,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        sx: 1.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn from_scale(scale: f32) -> Self {
        Self {
            sx: scale,
            sy: scale,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn scale_x(&self) -> f32 {
        self.sx
    }

    pub fn scale_y(&self) -> f32 {
        self.sy
    }

    pub fn translation_x(&self) -> f32 {
        self.tx
    }

    pub fn translation_y(&self) -> f32 {
        self.ty
    }

    /// Resets the matrix to a pure scale about the origin.
    pub fn set_scale(&mut self, sx: f32, sy: f32) {
        *self = Self {
            sx,
            sy,
            tx: 0.0,
            ty: 0.0,
        };
    }

    /// Post-concatenates a translation: every mapped point moves by `(dx, dy)`.
    pub fn post_translate(&mut self, dx: f32, dy: f32) {
        self.tx += dx;
        self.ty += dy;
    }

    /// Pre-concatenates a translation, i.e. a move in the source coordinate
    /// space before the existing transform is applied.
    pub fn pre_translate(&mut self, dx: f32, dy: f32) {
        self.tx += self.sx * dx;
        self.ty += self.sy * dy;
    }

    /// Post-concatenates a scale about the pivot `(px, py)` in mapped
    /// coordinates. The pivot point itself is unchanged by the operation.
    pub fn post_scale(&mut self, factor_x: f32, factor_y: f32, px: f32, py: f32) {
        self.sx *= factor_x;
        self.sy *= factor_y;
        self.tx = factor_x * self.tx + px * (1.0 - factor_x);
        self.ty = factor_y * self.ty + py * (1.0 - factor_y);
    }

    pub fn map_point(&self, point: Point) -> Point {
        Point::new(self.sx * point.x + self.tx, self.sy * point.y + self.ty)
    }

    /// Maps a rectangle through the transform. Scales may be negative, so
    /// the mapped corners are normalized back into an origin+size rect.
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        let a = self.map_point(rect.origin());
        let b = self.map_point(Point::new(rect.right(), rect.bottom()));
        let x0 = a.x.min(b.x);
        let y0 = a.y.min(b.y);
        let x1 = a.x.max(b.x);
        let y1 = a.y.max(b.y);
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Size;

    #[test]
    fn identity_maps_points_unchanged() {
        let m = Matrix::IDENTITY;
        let p = Point::new(3.0, -7.0);
        assert_eq!(m.map_point(p), p);
    }

    #[test]
    fn post_scale_keeps_pivot_fixed() {
        let mut m = Matrix::from_scale(2.0);
        m.post_translate(10.0, -4.0);
        let pivot = Point::new(25.0, 40.0);
        let before = pivot;
        m.post_scale(1.7, 1.7, pivot.x, pivot.y);
        // A point currently mapped onto the pivot must stay there.
        let source = Point::new((before.x - 10.0) / 2.0, (before.y + 4.0) / 2.0);
        let after = m.map_point(source);
        assert!((after.x - before.x).abs() < 1e-4);
        assert!((after.y - before.y).abs() < 1e-4);
    }

    #[test]
    fn pre_translate_moves_in_source_space() {
        let mut m = Matrix::from_scale(2.0);
        m.pre_translate(5.0, 5.0);
        let p = m.map_point(Point::ZERO);
        assert_eq!(p, Point::new(10.0, 10.0));
    }

    #[test]
    fn map_rect_scales_and_offsets() {
        let mut m = Matrix::from_scale(0.5);
        m.post_translate(0.0, 250.0);
        let mapped = m.map_rect(&Rect::from_size(Size::new(2000.0, 1000.0)));
        assert_eq!(mapped, Rect::new(0.0, 250.0, 1000.0, 500.0));
    }
}
