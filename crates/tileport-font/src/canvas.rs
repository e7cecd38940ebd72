//! Rendering through a `tiny-skia` canvas.
//!
//! The canvas composites in premultiplied alpha, like the native text
//! engines of most platforms. Pixels read back from it are run through
//! [`unpremultiply`] before they leave this module.

use tiny_skia::{Color, IntSize, Mask, Paint, Pixmap, Rect, Transform};
use tileport_core::{ColorPair, Pixel, PixelBuffer, Size, unpremultiply};

use crate::error::FontError;
use crate::fontdue_::FontdueFont;
use crate::glyph::{DrawFeatures, FontMetrics, GlyphFont};
use crate::mask::CoverageMask;

/// A font whose glyph coverage is painted onto a `tiny-skia` pixmap.
///
/// Glyph shapes come from `fontdue`; the canvas only does the filling.
#[derive(Clone, Debug)]
pub struct CanvasFont {
    glyphs: FontdueFont,
}

impl CanvasFont {
    pub fn from_bytes(family: impl Into<String>, bytes: &[u8], px: f32) -> Result<Self, FontError> {
        Ok(Self {
            glyphs: FontdueFont::from_bytes(family, bytes, px)?,
        })
    }

    /// Face `index` of a font collection.
    pub fn from_collection(
        family: impl Into<String>,
        bytes: &[u8],
        index: u32,
        px: f32,
    ) -> Result<Self, FontError> {
        Ok(Self {
            glyphs: FontdueFont::from_collection(family, bytes, index, px)?,
        })
    }
}

impl GlyphFont for CanvasFont {
    fn family(&self) -> &str {
        self.glyphs.family()
    }

    fn metrics(&self) -> FontMetrics {
        self.glyphs.metrics()
    }

    fn text_extent(&self, text: &str) -> Size {
        self.glyphs.text_extent(text)
    }

    fn draw(&self, text: &str, colors: ColorPair, features: DrawFeatures) -> Result<PixelBuffer, FontError> {
        if features.subpixel {
            return Err(FontError::Unsupported("LCD subpixel"));
        }
        paint(&self.glyphs.coverage(text, false), colors)
    }
}

fn canvas_error(size: Size) -> FontError {
    FontError::Canvas {
        width: size.width,
        height: size.height,
    }
}

#[inline]
fn skia_color(p: Pixel) -> Color {
    Color::from_rgba8(p.r, p.g, p.b, p.a)
}

/// Fill the background, then the foreground through `mask`, and return
/// the result in straight alpha.
pub(crate) fn paint(mask: &CoverageMask, colors: ColorPair) -> Result<PixelBuffer, FontError> {
    let size = mask.size();
    if mask.is_subpixel() {
        return Err(FontError::Unsupported("LCD subpixel"));
    }
    let mut pixmap = Pixmap::new(size.width, size.height).ok_or_else(|| canvas_error(size))?;
    if !colors.has_transparent_bg() {
        pixmap.fill(skia_color(colors.bg));
    }

    let int_size = IntSize::from_wh(size.width, size.height).ok_or_else(|| canvas_error(size))?;
    let clip = Mask::from_vec(mask.as_slice().to_vec(), int_size).ok_or_else(|| canvas_error(size))?;
    let rect = Rect::from_xywh(0.0, 0.0, size.width as f32, size.height as f32).ok_or_else(|| canvas_error(size))?;

    let mut fill = Paint::default();
    fill.set_color(skia_color(colors.fg));
    fill.anti_alias = false;
    pixmap.fill_rect(rect, &fill, Transform::identity(), Some(&clip));

    let data = pixmap
        .pixels()
        .iter()
        .map(|p| unpremultiply(Pixel::rgba(p.red(), p.green(), p.blue(), p.alpha())))
        .collect();
    PixelBuffer::from_vec(size.width, size.height, data).ok_or_else(|| canvas_error(size))
}
