//! Alignment utilities for positioning content inside a viewport

/// Alignment across both axes used for positioning content that overflows
/// the viewport after the base transformation is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alignment {
    /// Horizontal alignment component.
    pub horizontal: HorizontalAlignment,
    /// Vertical alignment component.
    pub vertical: VerticalAlignment,
}

impl Alignment {
    /// Creates a new [`Alignment`] from explicit horizontal and vertical components.
    pub const fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Pin content to the top-start corner.
    pub const TOP_START: Self = Self::new(HorizontalAlignment::Start, VerticalAlignment::Top);

    /// Keep content centered on both axes.
    pub const CENTER: Self = Self::new(
        HorizontalAlignment::CenterHorizontally,
        VerticalAlignment::CenterVertically,
    );

    /// Pin content to the bottom-end corner.
    pub const BOTTOM_END: Self = Self::new(HorizontalAlignment::End, VerticalAlignment::Bottom);
}

impl Default for Alignment {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Alignment along the horizontal axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Align content to the leading edge.
    Start,
    /// Align content to the horizontal center.
    CenterHorizontally,
    /// Align content to the trailing edge.
    End,
}

impl HorizontalAlignment {
    /// Computes the translation that positions content exceeding the
    /// viewport by `excess` units. The offset hides content on the side
    /// opposite to the alignment edge, so it is never positive.
    pub fn offset_for_excess(&self, excess: f32) -> f32 {
        match self {
            HorizontalAlignment::Start => 0.0,
            HorizontalAlignment::CenterHorizontally => -0.5 * excess,
            HorizontalAlignment::End => -excess,
        }
    }
}

/// Alignment along the vertical axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalAlignment {
    /// Align content to the top edge.
    Top,
    /// Align content to the vertical center.
    CenterVertically,
    /// Align content to the bottom edge.
    Bottom,
}

impl VerticalAlignment {
    /// Computes the translation that positions content exceeding the
    /// viewport by `excess` units. See
    /// [`HorizontalAlignment::offset_for_excess`].
    pub fn offset_for_excess(&self, excess: f32) -> f32 {
        match self {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::CenterVertically => -0.5 * excess,
            VerticalAlignment::Bottom => -excess,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_offsets_cover_excess() {
        assert_eq!(HorizontalAlignment::Start.offset_for_excess(100.0), 0.0);
        assert_eq!(
            HorizontalAlignment::CenterHorizontally.offset_for_excess(100.0),
            -50.0
        );
        assert_eq!(HorizontalAlignment::End.offset_for_excess(100.0), -100.0);
    }

    #[test]
    fn vertical_offsets_cover_excess() {
        assert_eq!(VerticalAlignment::Top.offset_for_excess(60.0), 0.0);
        assert_eq!(
            VerticalAlignment::CenterVertically.offset_for_excess(60.0),
            -30.0
        );
        assert_eq!(VerticalAlignment::Bottom.offset_for_excess(60.0), -60.0);
    }

    #[test]
    fn default_alignment_is_centered() {
        assert_eq!(Alignment::default(), Alignment::CENTER);
    }
}
