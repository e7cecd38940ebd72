//! Coverage-mask rendering with `rusttype`.

use rusttype::{Font, Scale, point as rt_point};
use tileport_core::{ColorPair, PixelBuffer, Size};

use crate::error::FontError;
use crate::glyph::{DrawFeatures, FontMetrics, GlyphFont};
use crate::mask::CoverageMask;

/// A font rasterized by `rusttype` at a fixed pixel scale. Kerning is
/// applied by the layout.
#[derive(Clone)]
pub struct RusttypeFont {
    family: String,
    font: Font<'static>,
    scale: Scale,
    ascent: f32,
    descent: f32,
    line_gap: f32,
}

impl RusttypeFont {
    /// Parse `bytes` as a TrueType font at `px` pixels per em.
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
        // The font has to own its data to be 'static.
        let font = Font::try_from_vec_and_index(bytes.to_vec(), index).ok_or_else(|| FontError::InvalidFont {
            family: family.clone(),
        })?;

        let scale = em_scale(&font, px);
        let v = font.v_metrics(scale);
        Ok(Self {
            family,
            font,
            scale,
            ascent: v.ascent,
            descent: -v.descent,
            line_gap: v.line_gap,
        })
    }

    fn baseline(&self) -> f32 {
        (self.ascent + self.line_gap / 2.0).round()
    }
}

/// `rusttype` scales a font so that ascent minus descent spans the given
/// height; convert `px` per em into that height.
fn em_scale(font: &Font<'_>, px: f32) -> Scale {
    let v = font.v_metrics_unscaled();
    let units_per_em = f32::from(font.units_per_em());
    if units_per_em <= 0.0 || v.ascent <= v.descent {
        return Scale::uniform(px);
    }
    Scale::uniform(px * (v.ascent - v.descent) / units_per_em)
}

impl std::fmt::Debug for RusttypeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RusttypeFont")
            .field("family", &self.family)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl GlyphFont for RusttypeFont {
    fn family(&self) -> &str {
        &self.family
    }

    fn metrics(&self) -> FontMetrics {
        FontMetrics::from_line(self.ascent, self.descent, self.line_gap)
    }

    fn text_extent(&self, text: &str) -> Size {
        let width = self
            .font
            .layout(text, self.scale, rt_point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        Size::new(width.ceil().max(0.0) as u32, self.metrics().height.max(0) as u32)
    }

    fn draw(&self, text: &str, colors: ColorPair, features: DrawFeatures) -> Result<PixelBuffer, FontError> {
        if features.subpixel {
            return Err(FontError::Unsupported("LCD subpixel"));
        }

        let size = self.text_extent(text).at_least_one();
        let mut mask = CoverageMask::new(size);
        for glyph in self.font.layout(text, self.scale, rt_point(0.0, self.baseline())) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let coverage = (v * 255.0).round().clamp(0.0, 255.0) as u8;
                    mask.put(bb.min.x + gx as i32, bb.min.y + gy as i32, coverage);
                });
            }
        }

        mask.to_pixels(colors).ok_or(FontError::Canvas {
            width: size.width,
            height: size.height,
        })
    }
}
