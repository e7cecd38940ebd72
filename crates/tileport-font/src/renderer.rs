//! The caller-facing front over any [`GlyphFont`].

use log::warn;
use tileport_core::{ColorPair, Pixel, PixelBuffer, Size};

use crate::error::FontError;
use crate::glyph::{DrawFeatures, FontMetrics, GlyphFont};
use crate::unicode::sanitize_code_point;

/// Wraps a font backend with the degradation rules windows rely on.
///
/// A draw that fails with optional features is retried once without them;
/// only the second failure reaches the caller. Every returned buffer is at
/// least 1x1.
#[derive(Debug)]
pub struct FontRenderer<F> {
    font: F,
}

impl<F: GlyphFont> FontRenderer<F> {
    pub fn new(font: F) -> Self {
        Self { font }
    }

    #[inline]
    pub fn font(&self) -> &F {
        &self.font
    }

    pub fn into_inner(self) -> F {
        self.font
    }

    #[inline]
    pub fn metrics(&self) -> FontMetrics {
        self.font.metrics()
    }

    pub fn text_extent(&self, text: &str) -> Size {
        self.font.text_extent(text)
    }

    /// Extent of a single code point; invalid ones measure as U+FFFD.
    pub fn char_extent(&self, code: u32) -> Size {
        let mut buf = [0; 4];
        self.font.text_extent(sanitize_code_point(code).encode_utf8(&mut buf))
    }

    /// Draw `text` on `colors.bg`.
    pub fn render_str_bg(
        &self,
        text: &str,
        colors: ColorPair,
        features: DrawFeatures,
    ) -> Result<PixelBuffer, FontError> {
        let drawn = match self.font.draw(text, colors, features) {
            Ok(buf) => buf,
            Err(e) if !features.is_plain() => {
                warn!(
                    "drawing with {features:?} failed on {:?}: {e}; retrying without",
                    self.font.family()
                );
                self.font.draw(text, colors, DrawFeatures::PLAIN)?
            }
            Err(e) => return Err(e),
        };
        Ok(at_least_one_pixel(drawn, colors.bg))
    }

    /// Draw `text` on a transparent background.
    pub fn render_str(&self, text: &str, fg: Pixel) -> Result<PixelBuffer, FontError> {
        self.render_str_bg(text, ColorPair::transparent(fg), DrawFeatures::PLAIN)
    }

    /// Draw one code point on `colors.bg`; invalid code points draw U+FFFD.
    pub fn render_char_bg(
        &self,
        code: u32,
        colors: ColorPair,
        features: DrawFeatures,
    ) -> Result<PixelBuffer, FontError> {
        let mut buf = [0; 4];
        let text = sanitize_code_point(code).encode_utf8(&mut buf);
        self.render_str_bg(text, colors, features)
    }

    /// Draw one code point on a transparent background.
    pub fn render_char(&self, code: u32, fg: Pixel) -> Result<PixelBuffer, FontError> {
        self.render_char_bg(code, ColorPair::transparent(fg), DrawFeatures::PLAIN)
    }

    /// Like [`render_str_bg`](Self::render_str_bg), but a failed draw
    /// yields a background-filled buffer of the text's extent instead of
    /// an error.
    pub fn render_or_placeholder(&self, text: &str, colors: ColorPair, features: DrawFeatures) -> PixelBuffer {
        self.render_str_bg(text, colors, features).unwrap_or_else(|e| {
            warn!("cannot draw {text:?} with {:?}: {e}", self.font.family());
            let size = self.font.text_extent(text).at_least_one();
            PixelBuffer::filled(size.width, size.height, colors.bg)
        })
    }
}

fn at_least_one_pixel(buf: PixelBuffer, bg: Pixel) -> PixelBuffer {
    if buf.is_empty() {
        PixelBuffer::filled(1, 1, bg)
    } else {
        buf
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// A font whose draws fail according to a script, recording every
    /// feature set it was asked for.
    #[derive(Debug)]
    struct ScriptedFont {
        fail_subpixel: bool,
        fail_plain: bool,
        empty_output: bool,
        calls: RefCell<Vec<DrawFeatures>>,
    }

    impl ScriptedFont {
        fn new() -> Self {
            Self {
                fail_subpixel: false,
                fail_plain: false,
                empty_output: false,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl GlyphFont for ScriptedFont {
        fn family(&self) -> &str {
            "Scripted"
        }

        fn metrics(&self) -> FontMetrics {
            FontMetrics::from_line(6.0, 2.0, 1.0)
        }

        fn text_extent(&self, text: &str) -> Size {
            Size::new(text.chars().count() as u32 * 5, 9)
        }

        fn draw(&self, text: &str, colors: ColorPair, features: DrawFeatures) -> Result<PixelBuffer, FontError> {
            self.calls.borrow_mut().push(features);
            if features.subpixel && self.fail_subpixel {
                return Err(FontError::Unsupported("LCD subpixel"));
            }
            if !features.subpixel && self.fail_plain {
                return Err(FontError::Canvas { width: 0, height: 0 });
            }
            if self.empty_output {
                return Ok(PixelBuffer::default());
            }
            let size = self.text_extent(text).at_least_one();
            Ok(PixelBuffer::filled(size.width, size.height, colors.fg))
        }
    }

    const FG: Pixel = Pixel::rgb(200, 100, 0);
    const BG: Pixel = Pixel::rgb(0, 0, 40);

    #[test]
    fn successful_draw_is_single_call() {
        let r = FontRenderer::new(ScriptedFont::new());
        let buf = r.render_str_bg("ab", ColorPair::new(FG, BG), DrawFeatures::SUBPIXEL).unwrap();
        assert_eq!(buf.size(), Size::new(10, 9));
        assert_eq!(*r.font().calls.borrow(), [DrawFeatures::SUBPIXEL]);
    }

    #[test]
    fn unsupported_feature_retries_plain() {
        let mut font = ScriptedFont::new();
        font.fail_subpixel = true;
        let r = FontRenderer::new(font);
        let buf = r.render_str_bg("x", ColorPair::new(FG, BG), DrawFeatures::SUBPIXEL).unwrap();
        assert_eq!(buf.get(0, 0), Some(FG));
        assert_eq!(*r.font().calls.borrow(), [DrawFeatures::SUBPIXEL, DrawFeatures::PLAIN]);
    }

    #[test]
    fn second_failure_is_surfaced() {
        let mut font = ScriptedFont::new();
        font.fail_subpixel = true;
        font.fail_plain = true;
        let r = FontRenderer::new(font);
        let err = r.render_str_bg("x", ColorPair::new(FG, BG), DrawFeatures::SUBPIXEL).unwrap_err();
        assert!(matches!(err, FontError::Canvas { .. }));
        assert_eq!(r.font().calls.borrow().len(), 2);
    }

    #[test]
    fn plain_failure_is_not_retried() {
        let mut font = ScriptedFont::new();
        font.fail_plain = true;
        let r = FontRenderer::new(font);
        assert!(r.render_str("x", FG).is_err());
        assert_eq!(r.font().calls.borrow().len(), 1);
    }

    #[test]
    fn empty_output_grows_to_one_pixel() {
        let mut font = ScriptedFont::new();
        font.empty_output = true;
        let r = FontRenderer::new(font);
        let buf = r.render_str_bg("", ColorPair::new(FG, BG), DrawFeatures::PLAIN).unwrap();
        assert_eq!(buf.size(), Size::new(1, 1));
        assert_eq!(buf.get(0, 0), Some(BG));

        let buf = r.render_str("", FG).unwrap();
        assert_eq!(buf.get(0, 0), Some(Pixel::TRANSPARENT));
    }

    #[test]
    fn placeholder_on_failure() {
        let mut font = ScriptedFont::new();
        font.fail_plain = true;
        let r = FontRenderer::new(font);
        let buf = r.render_or_placeholder("abc", ColorPair::new(FG, BG), DrawFeatures::PLAIN);
        assert_eq!(buf.size(), Size::new(15, 9));
        assert!(buf.as_slice().iter().all(|&p| p == BG));

        let buf = r.render_or_placeholder("", ColorPair::new(FG, BG), DrawFeatures::PLAIN);
        assert_eq!(buf.size(), Size::new(1, 9));
    }

    #[test]
    fn chars_are_sanitized() {
        let r = FontRenderer::new(ScriptedFont::new());
        assert_eq!(r.char_extent(0xD800), Size::new(5, 9));
        let buf = r.render_char(0x110000, FG).unwrap();
        assert_eq!(buf.size(), Size::new(5, 9));
        assert_eq!(r.metrics().height, 9);
    }

    #[test]
    fn boxed_fonts_render() {
        let r: FontRenderer<Box<dyn GlyphFont>> = FontRenderer::new(Box::new(ScriptedFont::new()));
        assert_eq!(r.font().family(), "Scripted");
        assert_eq!(r.text_extent("ab"), Size::new(10, 9));
    }
}
