//! The contract every font backend implements.

use std::fmt;

use tileport_core::{ColorPair, PixelBuffer, Size};

use crate::error::FontError;

/// Vertical line metrics, in whole pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontMetrics {
    /// Distance from the top of the line to the baseline.
    pub ascent: i32,
    /// Distance from the baseline to the bottom of the line, positive.
    pub descent: i32,
    /// `ascent + descent`.
    pub line_skip: i32,
    /// `line_skip` plus the font's line gap.
    pub height: i32,
}

impl FontMetrics {
    /// Build metrics from fractional ascent, descent (positive) and line
    /// gap, rounding each total up.
    pub fn from_line(ascent: f32, descent: f32, line_gap: f32) -> Self {
        Self {
            ascent: ascent.ceil() as i32,
            descent: descent.ceil() as i32,
            line_skip: (ascent + descent).ceil() as i32,
            height: (ascent + descent + line_gap).ceil() as i32,
        }
    }
}

/// Optional rendering features a caller may ask for. A backend that cannot
/// honour one fails the draw with [`FontError::Unsupported`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DrawFeatures {
    /// Per-channel LCD coverage instead of a single grey mask.
    pub subpixel: bool,
}

impl DrawFeatures {
    pub const PLAIN: Self = Self { subpixel: false };
    pub const SUBPIXEL: Self = Self { subpixel: true };

    #[inline]
    pub fn is_plain(self) -> bool {
        self == Self::PLAIN
    }
}

/// A font opened at a fixed size.
///
/// `draw` returns a buffer of exactly `text_extent(text)` grown to at least
/// 1x1, in straight alpha. A transparent background leaves uncovered
/// pixels fully transparent; an opaque one fills the whole rectangle.
pub trait GlyphFont: fmt::Debug {
    /// Family name the font was opened under.
    fn family(&self) -> &str;

    fn metrics(&self) -> FontMetrics;

    /// Size `text` would occupy when drawn. Never rasterizes.
    fn text_extent(&self, text: &str) -> Size;

    fn draw(&self, text: &str, colors: ColorPair, features: DrawFeatures) -> Result<PixelBuffer, FontError>;
}

impl<F: GlyphFont + ?Sized> GlyphFont for Box<F> {
    fn family(&self) -> &str {
        (**self).family()
    }

    fn metrics(&self) -> FontMetrics {
        (**self).metrics()
    }

    fn text_extent(&self, text: &str) -> Size {
        (**self).text_extent(text)
    }

    fn draw(&self, text: &str, colors: ColorPair, features: DrawFeatures) -> Result<PixelBuffer, FontError> {
        (**self).draw(text, colors, features)
    }
}
