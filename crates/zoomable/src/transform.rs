//! Transform state: the current matrix, its zoom decomposition, and the
//! clamped mutation primitives.
//!
//! The matrix scale is always `zoom * base_zoom`; the content rect is the
//! natural content rect mapped through the matrix and is re-derived after
//! every mutation so the two never drift apart.

use zoomable_graphics::{Matrix, Rect, Size};

use crate::{bounds, AbsolutePan, RealZoom, ScaledPan, Zoom, ZoomOptions};

#[derive(Clone, Debug)]
pub struct TransformState {
    matrix: Matrix,
    viewport: Size,
    content_base: Rect,
    content_rect: Rect,
    zoom: Zoom,
    base_zoom: f32,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformState {
    pub fn new() -> Self {
        Self {
            matrix: Matrix::IDENTITY,
            viewport: Size::ZERO,
            content_base: Rect::default(),
            content_rect: Rect::default(),
            zoom: Zoom(1.0),
            base_zoom: 0.0,
        }
    }

    pub fn matrix(&self) -> Matrix {
        self.matrix
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn content_base_size(&self) -> Size {
        self.content_base.size()
    }

    pub fn content_rect(&self) -> Rect {
        self.content_rect
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn base_zoom(&self) -> f32 {
        self.base_zoom
    }

    pub fn real_zoom(&self) -> RealZoom {
        self.zoom.to_real(self.base_zoom)
    }

    /// The transform's translation component, i.e. the content rect origin.
    pub fn scaled_pan(&self) -> ScaledPan {
        ScaledPan::new(self.content_rect.x, self.content_rect.y)
    }

    /// The translation in content coordinates.
    pub fn pan(&self) -> AbsolutePan {
        self.scaled_pan().to_absolute(self.real_zoom())
    }

    fn recompute_content_rect(&mut self) {
        self.content_rect = self.matrix.map_rect(&self.content_base);
    }

    /// Stores sizes without touching the transform. Used while the engine
    /// is not yet fully initialized.
    pub fn store_sizes(&mut self, viewport: Size, content: Size) {
        self.viewport = viewport;
        self.content_base = Rect::from_size(content);
        self.content_rect = Rect::from_size(content);
    }

    /// First-time initialization: applies the base transformation and the
    /// gravity pan, then clamps into bounds.
    pub fn init_from_scratch(&mut self, viewport: Size, content: Size, options: &ZoomOptions) {
        self.viewport = viewport;
        self.content_base = Rect::from_size(content);
        self.base_zoom = bounds::compute_base_zoom(viewport, content, options.fit_policy);
        self.matrix.set_scale(self.base_zoom, self.base_zoom);
        self.recompute_content_rect();
        self.zoom = Zoom(1.0);
        let corrected = self.ensure_scale_bounds(self.zoom, false, options);
        if corrected != self.zoom {
            self.apply_zoom(corrected, false, options);
        }
        let base_pan = bounds::compute_base_pan(viewport, self.content_rect.size(), options.gravity);
        let delta = base_pan - self.scaled_pan();
        if delta != ScaledPan::ZERO {
            self.apply_scaled_pan(delta, false, options);
        }
        self.ensure_current_translation_bounds(false, options);
    }

    /// Re-initialization after a size change. The base zoom is recomputed
    /// and the logical zoom re-derived so the real zoom (the matrix scale)
    /// is preserved, then the result is clamped back into bounds.
    pub fn reinit_preserving_real_zoom(
        &mut self,
        viewport: Size,
        content: Size,
        options: &ZoomOptions,
    ) {
        let real_zoom = self.real_zoom();
        self.viewport = viewport;
        self.content_base = Rect::from_size(content);
        self.base_zoom = bounds::compute_base_zoom(viewport, content, options.fit_policy);
        self.zoom = real_zoom.to_zoom(self.base_zoom);
        self.recompute_content_rect();
        let corrected = self.ensure_scale_bounds(self.zoom, false, options);
        if corrected != self.zoom {
            self.apply_zoom(corrected, false, options);
        }
        self.ensure_current_translation_bounds(false, options);
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Clamps a logical zoom into the resolved limits, optionally widened
    /// by the overpinch tolerance. Sequential comparisons keep the result
    /// defined even for inverted limit configurations.
    pub fn ensure_scale_bounds(
        &self,
        value: Zoom,
        allow_over_pinch: bool,
        options: &ZoomOptions,
    ) -> Zoom {
        let mut min_zoom = self.resolved_min_zoom(options);
        let mut max_zoom = self.resolved_max_zoom(options);
        if allow_over_pinch && options.over_pinchable {
            let tolerance = bounds::over_pinch_tolerance(min_zoom, max_zoom);
            min_zoom.0 -= tolerance;
            max_zoom.0 += tolerance;
        }
        let mut value = value;
        if value.0 < min_zoom.0 {
            value = min_zoom;
        }
        if value.0 > max_zoom.0 {
            value = max_zoom;
        }
        value
    }

    pub fn resolved_min_zoom(&self, options: &ZoomOptions) -> Zoom {
        bounds::resolve_zoom(options.min_zoom, options.min_zoom_kind, self.base_zoom)
    }

    pub fn resolved_max_zoom(&self, options: &ZoomOptions) -> Zoom {
        bounds::resolve_zoom(options.max_zoom, options.max_zoom_kind, self.base_zoom)
    }

    /// Signed correction bringing `current pan + delta` into bounds on one
    /// axis, honouring the per-axis overscroll flag when allowed.
    pub fn ensure_translation_bounds(
        &self,
        delta: f32,
        horizontal: bool,
        allow_over_scroll: bool,
        options: &ZoomOptions,
    ) -> f32 {
        let value = if horizontal {
            self.scaled_pan().x
        } else {
            self.scaled_pan().y
        };
        let view_size = if horizontal {
            self.viewport.width
        } else {
            self.viewport.height
        };
        let content_size = if horizontal {
            self.content_rect.width
        } else {
            self.content_rect.height
        };
        let over_scrollable = if horizontal {
            options.over_scroll_horizontal
        } else {
            options.over_scroll_vertical
        };
        let over_scroll = if over_scrollable && allow_over_scroll {
            bounds::over_scroll_tolerance(self.viewport, self.zoom)
        } else {
            0.0
        };
        bounds::translation_correction(value + delta, view_size, content_size, over_scroll)
    }

    pub fn ensure_current_translation_bounds(
        &mut self,
        allow_over_scroll: bool,
        options: &ZoomOptions,
    ) {
        let fix_x = self.ensure_translation_bounds(0.0, true, allow_over_scroll, options);
        let fix_y = self.ensure_translation_bounds(0.0, false, allow_over_scroll, options);
        if fix_x != 0.0 || fix_y != 0.0 {
            self.matrix.post_translate(fix_x, fix_y);
            self.recompute_content_rect();
        }
    }

    /// Applies a logical zoom about the viewport center, then re-clamps the
    /// translation without overscroll.
    pub fn apply_zoom(&mut self, new_zoom: Zoom, allow_over_pinch: bool, options: &ZoomOptions) {
        let new_zoom = self.ensure_scale_bounds(new_zoom, allow_over_pinch, options);
        let factor = new_zoom.0 / self.zoom.0;
        self.matrix.post_scale(
            factor,
            factor,
            self.viewport.width / 2.0,
            self.viewport.height / 2.0,
        );
        self.recompute_content_rect();
        self.zoom = new_zoom;
        self.ensure_current_translation_bounds(false, options);
    }

    /// Moves to an exact position: after the call the zoom is `new_zoom`
    /// and the absolute pan is `pan`. The translation happens in content
    /// coordinates, the scale about the content origin.
    pub fn apply_zoom_and_absolute_pan(
        &mut self,
        new_zoom: Zoom,
        pan: AbsolutePan,
        allow_over_scroll: bool,
        options: &ZoomOptions,
    ) {
        let delta = pan - self.pan();
        self.matrix.pre_translate(delta.x, delta.y);
        self.recompute_content_rect();

        let new_zoom = self.ensure_scale_bounds(new_zoom, false, options);
        let factor = new_zoom.0 / self.zoom.0;
        self.matrix.post_scale(factor, factor, 0.0, 0.0);
        self.recompute_content_rect();
        self.zoom = new_zoom;
        self.ensure_current_translation_bounds(allow_over_scroll, options);
    }

    /// Translates directly in view coordinates.
    pub fn apply_scaled_pan(
        &mut self,
        delta: ScaledPan,
        allow_over_scroll: bool,
        options: &ZoomOptions,
    ) {
        self.matrix.post_translate(delta.x, delta.y);
        self.recompute_content_rect();
        self.ensure_current_translation_bounds(allow_over_scroll, options);
    }

    /// Pinch step: scales about the view position of the absolute anchor
    /// `target`, so the point under the gesture focus stays visually fixed.
    /// Only the zoom is clamped here; pan bounds are resolved by the
    /// subsequent drag path.
    pub fn apply_pinch(
        &mut self,
        new_zoom: Zoom,
        target: AbsolutePan,
        allow_over_pinch: bool,
        options: &ZoomOptions,
    ) {
        // The pivot must be expressed in view coordinates: scale the anchor
        // with the current real zoom and remove the current pan.
        let scaled = target.to_scaled(self.real_zoom());
        let pan = self.scaled_pan();
        let new_zoom = self.ensure_scale_bounds(new_zoom, allow_over_pinch, options);
        let factor = new_zoom.0 / self.zoom.0;
        self.matrix
            .post_scale(factor, factor, pan.x - scaled.x, pan.y - scaled.y);
        self.recompute_content_rect();
        self.zoom = new_zoom;
        self.ensure_current_translation_bounds(false, options);
    }
}
