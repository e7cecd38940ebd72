//! The alpha compositor shared by every font backend.
//!
//! Backends that rasterize a single-channel coverage mask combine it with
//! the caller's colours through [`blend`]; backends whose native API hands
//! back premultiplied RGBA run it through [`unpremultiply`]. Both are free
//! functions so that no backend can substitute its own policy.

use crate::buffer::PixelBuffer;
use crate::pixel::Pixel;

/// Fixed-point alpha of 1.0 used by [`blend`].
const ALPHA_ONE: u32 = 0xFF00;

/// A foreground/background colour pair.
///
/// A background with zero alpha is transparent: where coverage is zero the
/// destination is left untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorPair {
    pub fg: Pixel,
    pub bg: Pixel,
}

impl ColorPair {
    #[inline]
    pub const fn new(fg: Pixel, bg: Pixel) -> Self {
        Self { fg, bg }
    }

    /// Foreground over a transparent background.
    #[inline]
    pub const fn transparent(fg: Pixel) -> Self {
        Self::new(fg, Pixel::TRANSPARENT)
    }

    /// Whether the background is fully transparent.
    #[inline]
    pub const fn has_transparent_bg(self) -> bool {
        self.bg.a == 0
    }
}

/// Combine `coverage` (0..=255) of `fg` over `bg`.
///
/// Zero coverage yields `bg` untouched, and full coverage of an opaque
/// foreground yields `fg` untouched. Otherwise alpha is carried in fixed
/// point, where `0xFF00` is 1.0:
///
/// ```text
/// srcA = fg.a * 256 * coverage / 255
/// dstA = bg.a * 256 * (0xFF00 - srcA) / 0xFF00
/// outA = srcA + dstA
/// out.rgb = (fg.rgb * srcA + bg.rgb * dstA) / outA   (0 when outA == 0)
/// out.a = outA / 256
/// ```
#[inline]
pub fn blend(coverage: u8, fg: Pixel, bg: Pixel) -> Pixel {
    if coverage == 0 {
        return bg;
    }
    if coverage == 255 && fg.a == 255 {
        return fg;
    }

    let src_a = fg.a as u32 * 256 * coverage as u32 / 255;
    let dst_a = bg.a as u32 * 256 * (ALPHA_ONE - src_a) / ALPHA_ONE;
    let out_a = src_a + dst_a;
    if out_a == 0 {
        return Pixel::TRANSPARENT;
    }

    let mix = |f: u8, b: u8| ((f as u32 * src_a + b as u32 * dst_a) / out_a) as u8;
    Pixel::rgba(
        mix(fg.r, bg.r),
        mix(fg.g, bg.g),
        mix(fg.b, bg.b),
        (out_a / 256) as u8,
    )
}

/// Undo alpha premultiplication: each colour channel is scaled by
/// `255 / a`. Fully transparent pixels are returned as-is.
#[inline]
pub fn unpremultiply(p: Pixel) -> Pixel {
    if p.a == 0 {
        return p;
    }
    let a = p.a as u32;
    let channel = |c: u8| (c as u32 * 255 / a).min(255) as u8;
    Pixel::rgba(channel(p.r), channel(p.g), channel(p.b), p.a)
}

/// Apply [`unpremultiply`] to every pixel of a buffer.
pub fn unpremultiply_buffer(buf: &mut PixelBuffer) {
    for p in buf.as_mut_slice() {
        *p = unpremultiply(*p);
    }
}

/// Turn a coverage mask into pixels by blending every coverage value
/// against `colors`. Returns `None` if the mask length is not
/// `width * height`.
pub fn coverage_to_pixels(
    width: u32,
    height: u32,
    coverage: &[u8],
    colors: ColorPair,
) -> Option<PixelBuffer> {
    let data = coverage
        .iter()
        .map(|&c| blend(c, colors.fg, colors.bg))
        .collect();
    PixelBuffer::from_vec(width, height, data)
}

/// Like [`coverage_to_pixels`] but with one coverage value per colour
/// channel (LCD subpixel order R, G, B). Alpha takes the green coverage.
pub fn subpixel_coverage_to_pixels(
    width: u32,
    height: u32,
    coverage: &[u8],
    colors: ColorPair,
) -> Option<PixelBuffer> {
    if coverage.len() != width as usize * height as usize * 3 {
        return None;
    }
    let data = coverage
        .chunks_exact(3)
        .map(|c| {
            let r = blend(c[0], colors.fg, colors.bg);
            let g = blend(c[1], colors.fg, colors.bg);
            let b = blend(c[2], colors.fg, colors.bg);
            Pixel::rgba(r.r, g.g, b.b, g.a)
        })
        .collect();
    PixelBuffer::from_vec(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Pixel = Pixel::rgb(255, 0, 0);
    const BLUE: Pixel = Pixel::rgb(0, 0, 255);

    #[test]
    fn zero_coverage_is_background() {
        for bg in [BLUE, Pixel::TRANSPARENT, Pixel::rgba(9, 8, 7, 6)] {
            assert_eq!(blend(0, RED, bg), bg);
        }
    }

    #[test]
    fn full_coverage_opaque_is_foreground() {
        for bg in [BLUE, Pixel::TRANSPARENT, Pixel::rgba(9, 8, 7, 6)] {
            assert_eq!(blend(255, Pixel::rgb(1, 2, 3), bg), Pixel::rgb(1, 2, 3));
        }
    }

    #[test]
    fn half_red_over_blue() {
        // srcA = 255*256*128/255 = 32768
        // dstA = 255*256*(65280-32768)/65280 = 32512
        // outA = 65280
        // r = 255*32768/65280 = 128, b = 255*32512/65280 = 127
        assert_eq!(blend(128, RED, BLUE), Pixel::rgba(128, 0, 127, 255));
    }

    #[test]
    fn transparent_background_keeps_foreground_color() {
        // dstA is zero, so the colour is pure foreground and alpha is the
        // scaled coverage
        let out = blend(128, RED, Pixel::TRANSPARENT);
        assert_eq!(out, Pixel::rgba(255, 0, 0, 128));
    }

    #[test]
    fn fully_transparent_result() {
        let out = blend(200, Pixel::rgba(10, 20, 30, 0), Pixel::TRANSPARENT);
        assert_eq!(out, Pixel::TRANSPARENT);
    }

    #[test]
    fn translucent_foreground_full_coverage() {
        // srcA = 128*256 = 32768; dstA = 255*256*32512/65280 = 32512
        let out = blend(255, RED.with_alpha(128), BLUE);
        assert_eq!(out, Pixel::rgba(128, 0, 127, 255));
    }

    #[test]
    fn unpremultiply_scales_channels() {
        assert_eq!(
            unpremultiply(Pixel::rgba(64, 32, 0, 128)),
            Pixel::rgba(127, 63, 0, 128)
        );
        assert_eq!(unpremultiply(Pixel::rgba(5, 5, 5, 0)), Pixel::rgba(5, 5, 5, 0));
        assert_eq!(unpremultiply(RED), RED);
    }

    #[test]
    fn coverage_mask_to_pixels() {
        let buf = coverage_to_pixels(2, 1, &[0, 255], ColorPair::new(RED, BLUE)).unwrap();
        assert_eq!(buf.as_slice(), &[BLUE, RED]);
        assert!(coverage_to_pixels(2, 2, &[0, 255], ColorPair::new(RED, BLUE)).is_none());
    }

    #[test]
    fn subpixel_mask_per_channel() {
        let white = Pixel::WHITE;
        let buf = subpixel_coverage_to_pixels(
            1,
            1,
            &[255, 0, 255],
            ColorPair::new(white, Pixel::BLACK),
        )
        .unwrap();
        assert_eq!(buf.as_slice(), &[Pixel::rgba(255, 0, 255, 255)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn color_pair_serde_round_trip() {
        let pair = ColorPair::new(RED, Pixel::rgba(1, 2, 3, 0));
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(serde_json::from_str::<ColorPair>(&json).unwrap(), pair);
    }
}
