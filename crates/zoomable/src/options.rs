//! Engine configuration: fit policy, zoom limits and gesture flags.

use std::fmt;

use zoomable_graphics::Alignment;

/// Rule used to derive the base zoom from the content/viewport size
/// relationship when a size is first applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitPolicy {
    /// Scale the content so it fits completely inside the viewport.
    CenterInside,
    /// Scale the content so its smaller side fills the viewport exactly;
    /// the larger side is partially cropped.
    CenterCrop,
    /// Apply no base transformation; zoom and real zoom coincide.
    None,
}

/// Space a configured zoom limit is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomKind {
    /// The user-facing zoom axis, `1.0` right after the initial fit.
    Logical,
    /// The actual content scale, matching the transform's scale components.
    Real,
}

/// Engine configuration, applied at construction and adjustable through
/// the engine's setters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomOptions {
    pub min_zoom: f32,
    pub min_zoom_kind: ZoomKind,
    pub max_zoom: f32,
    pub max_zoom_kind: ZoomKind,
    /// Allow drags and flings to temporarily exceed the horizontal pan
    /// bounds; the excess is elastically corrected afterwards.
    pub over_scroll_horizontal: bool,
    /// Same as `over_scroll_horizontal`, for the vertical axis.
    pub over_scroll_vertical: bool,
    pub horizontal_pan_enabled: bool,
    pub vertical_pan_enabled: bool,
    /// Allow pinches to temporarily exceed the zoom bounds.
    pub over_pinchable: bool,
    pub zoom_enabled: bool,
    pub fit_policy: FitPolicy,
    /// Placement of content that overflows the viewport after the base
    /// transformation.
    pub gravity: Alignment,
    /// Duration of programmatic zoom/pan transitions.
    pub animation_duration_ms: u64,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self {
            min_zoom: 0.8,
            min_zoom_kind: ZoomKind::Logical,
            max_zoom: 2.5,
            max_zoom_kind: ZoomKind::Logical,
            over_scroll_horizontal: true,
            over_scroll_vertical: true,
            horizontal_pan_enabled: true,
            vertical_pan_enabled: true,
            over_pinchable: true,
            zoom_enabled: true,
            fit_policy: FitPolicy::CenterInside,
            gravity: Alignment::CENTER,
            animation_duration_ms: 280,
        }
    }
}

/// Rejected zoom limit configuration. The failing call leaves the engine
/// unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LimitError {
    NegativeMinZoom(f32),
    NegativeMaxZoom(f32),
}

impl fmt::Display for LimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitError::NegativeMinZoom(value) => {
                write!(f, "min zoom should be >= 0, got {value}")
            }
            LimitError::NegativeMaxZoom(value) => {
                write!(f, "max zoom should be >= 0, got {value}")
            }
        }
    }
}

impl std::error::Error for LimitError {}
