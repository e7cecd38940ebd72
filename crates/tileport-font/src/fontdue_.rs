//! Coverage-mask rendering with `fontdue`.

use fontdue::{Font, FontSettings};
use tileport_core::{ColorPair, PixelBuffer, Size};

use crate::error::FontError;
use crate::glyph::{DrawFeatures, FontMetrics, GlyphFont};
use crate::mask::CoverageMask;

/// A font rasterized by `fontdue` at a fixed pixel size.
///
/// Glyphs are laid out left to right on one baseline, `ascent` plus half
/// the line gap below the top of the line.
#[derive(Clone)]
pub struct FontdueFont {
    family: String,
    font: Font,
    px: f32,
    ascent: f32,
    descent: f32,
    line_gap: f32,
}

impl FontdueFont {
    /// Parse `bytes` as a TrueType or OpenType font at `px` pixels per em.
    pub fn from_bytes(family: impl Into<String>, bytes: &[u8], px: f32) -> Result<Self, FontError> {
        Self::from_collection(family, bytes, 0, px)
    }

    /// Like [`from_bytes`](Self::from_bytes), picking face `index` out of a
    /// font collection.
    pub fn from_collection(
        family: impl Into<String>,
        bytes: &[u8],
        index: u32,
        px: f32,
    ) -> Result<Self, FontError> {
        let family = family.into();
        let font = Font::from_bytes(bytes, FontSettings {
            scale: px,
            collection_index: index,
            ..FontSettings::default()
        })
        .map_err(|_| FontError::InvalidFont {
            family: family.clone(),
        })?;

        let (ascent, descent, line_gap) = match font.horizontal_line_metrics(px) {
            Some(m) => (m.ascent, -m.descent, m.line_gap),
            None => (px, 0.0, 0.0),
        };

        Ok(Self {
            family,
            font,
            px,
            ascent,
            descent,
            line_gap,
        })
    }

    /// Pixels per em.
    #[inline]
    pub fn px(&self) -> f32 {
        self.px
    }

    fn baseline(&self) -> i32 {
        (self.ascent + self.line_gap / 2.0).round() as i32
    }

    /// Rasterize `text` into a mask of `text_extent(text)`, at least 1x1.
    pub fn coverage(&self, text: &str, subpixel: bool) -> CoverageMask {
        let size = self.text_extent(text).at_least_one();
        let mut mask = if subpixel {
            CoverageMask::subpixel(size)
        } else {
            CoverageMask::new(size)
        };

        let baseline = self.baseline();
        let mut pen = 0.0f32;
        for ch in text.chars() {
            let (m, bitmap) = if subpixel {
                self.font.rasterize_subpixel(ch, self.px)
            } else {
                self.font.rasterize(ch, self.px)
            };
            let x = pen.round() as i32 + m.xmin;
            let y = baseline - m.ymin - m.height as i32;
            mask.stamp(x, y, m.width, m.height, &bitmap);
            pen += m.advance_width;
        }
        mask
    }
}

impl std::fmt::Debug for FontdueFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontdueFont")
            .field("family", &self.family)
            .field("px", &self.px)
            .finish_non_exhaustive()
    }
}

impl GlyphFont for FontdueFont {
    fn family(&self) -> &str {
        &self.family
    }

    fn metrics(&self) -> FontMetrics {
        FontMetrics::from_line(self.ascent, self.descent, self.line_gap)
    }

    fn text_extent(&self, text: &str) -> Size {
        let width: f32 = text
            .chars()
            .map(|ch| self.font.metrics(ch, self.px).advance_width)
            .sum();
        Size::new(width.ceil() as u32, self.metrics().height.max(0) as u32)
    }

    fn draw(&self, text: &str, colors: ColorPair, features: DrawFeatures) -> Result<PixelBuffer, FontError> {
        // LCD coverage only makes sense against a known opaque colour.
        if features.subpixel && !colors.bg.is_opaque() {
            return Err(FontError::Unsupported("LCD subpixel on a translucent background"));
        }
        let mask = self.coverage(text, features.subpixel);
        let size = mask.size();
        mask.to_pixels(colors).ok_or(FontError::Canvas {
            width: size.width,
            height: size.height,
        })
    }
}
