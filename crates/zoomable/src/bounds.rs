//! Pure bounds arithmetic: base zoom/pan from the fit policy, pan
//! containment corrections, and the overscroll/overpinch tolerances.

use zoomable_graphics::{Alignment, Size};

use crate::{FitPolicy, ScaledPan, Zoom, ZoomKind};

/// Base zoom derived from the viewport/content size relationship.
pub fn compute_base_zoom(viewport: Size, content: Size, policy: FitPolicy) -> f32 {
    match policy {
        FitPolicy::CenterInside => {
            let scale_x = viewport.width / content.width;
            let scale_y = viewport.height / content.height;
            scale_x.min(scale_y)
        }
        FitPolicy::CenterCrop => {
            let scale_x = viewport.width / content.width;
            let scale_y = viewport.height / content.height;
            scale_x.max(scale_y)
        }
        FitPolicy::None => 1.0,
    }
}

/// Base translation honouring the gravity on each axis where the scaled
/// content exceeds the viewport. `content` is the content size after the
/// base transformation.
pub fn compute_base_pan(viewport: Size, content: Size, gravity: Alignment) -> ScaledPan {
    let extra_width = content.width - viewport.width;
    let extra_height = content.height - viewport.height;
    ScaledPan::new(
        if extra_width > 0.0 {
            gravity.horizontal.offset_for_excess(extra_width)
        } else {
            0.0
        },
        if extra_height > 0.0 {
            gravity.vertical.offset_for_excess(extra_height)
        } else {
            0.0
        },
    )
}

/// Converts a configured limit into the logical zoom axis.
pub fn resolve_zoom(value: f32, kind: ZoomKind, base_zoom: f32) -> Zoom {
    match kind {
        ZoomKind::Logical => Zoom(value),
        ZoomKind::Real => Zoom(value / base_zoom),
    }
}

/// Signed correction bringing a pan value into its admissible range on one
/// axis. When the content fits inside the viewport the only admissible
/// value is the centered one; otherwise the content must cover the
/// viewport. `over_scroll` widens the range symmetrically, truncated to a
/// whole unit.
pub fn translation_correction(
    value: f32,
    view_size: f32,
    content_size: f32,
    over_scroll: f32,
) -> f32 {
    let tolerance = over_scroll.trunc();
    let (mut min, mut max) = if content_size <= view_size {
        // Stay centered: a positive translation showing some background.
        let centered = (view_size - content_size) / 2.0;
        (centered, centered)
    } else {
        // Don't let edges show: a negative translation hiding content.
        (view_size - content_size, 0.0)
    };
    min -= tolerance;
    max += tolerance;
    let mut desired = value;
    if desired < min {
        desired = min;
    }
    if desired > max {
        desired = max;
    }
    desired - value
}

/// Elastic pan slack while a gesture is active: a twentieth of the smaller
/// viewport side, scaled by the current logical zoom and truncated.
pub fn over_scroll_tolerance(viewport: Size, zoom: Zoom) -> f32 {
    let over_x = viewport.width / 20.0 * zoom.0;
    let over_y = viewport.height / 20.0 * zoom.0;
    over_x.min(over_y).trunc()
}

/// Elastic zoom slack while a pinch is active: a fixed tenth of the
/// resolved zoom range. Unlike the pan slack this does not scale with the
/// current zoom.
pub fn over_pinch_tolerance(min_zoom: Zoom, max_zoom: Zoom) -> f32 {
    0.1 * (max_zoom.0 - min_zoom.0)
}
