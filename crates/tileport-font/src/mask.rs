//! Line-sized coverage masks that glyph bitmaps are stamped into.

use tileport_core::composite::{coverage_to_pixels, subpixel_coverage_to_pixels};
use tileport_core::{ColorPair, PixelBuffer, Size};

/// Coverage for a whole line of text, one byte per pixel, or three (R, G,
/// B) for LCD subpixel coverage.
///
/// Overlapping glyphs keep the higher coverage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoverageMask {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl CoverageMask {
    /// An empty single-channel mask.
    pub fn new(size: Size) -> Self {
        Self::with_channels(size, 1)
    }

    /// An empty three-channel LCD mask.
    pub fn subpixel(size: Size) -> Self {
        Self::with_channels(size, 3)
    }

    fn with_channels(size: Size, channels: usize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            channels,
            data: vec![0; size.area() * channels],
        }
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn is_subpixel(&self) -> bool {
        self.channels == 3
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Merge one coverage value at `(x, y)`, ignoring positions outside the
    /// mask. Applies to every channel.
    pub fn put(&mut self, x: i32, y: i32, coverage: u8) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let start = (y as usize * self.width as usize + x as usize) * self.channels;
        for c in &mut self.data[start..start + self.channels] {
            *c = (*c).max(coverage);
        }
    }

    /// Merge a `width x height` glyph bitmap whose top-left corner lands on
    /// `(x, y)`. The bitmap has as many channels per pixel as the mask;
    /// parts falling outside the mask are clipped.
    pub fn stamp(&mut self, x: i32, y: i32, width: usize, height: usize, bitmap: &[u8]) {
        let ch = self.channels;
        if bitmap.len() < width * height * ch {
            return;
        }
        for gy in 0..height {
            let ty = y + gy as i32;
            if ty < 0 || ty as u32 >= self.height {
                continue;
            }
            for gx in 0..width {
                let tx = x + gx as i32;
                if tx < 0 || tx as u32 >= self.width {
                    continue;
                }
                let src = (gy * width + gx) * ch;
                let dst = (ty as usize * self.width as usize + tx as usize) * ch;
                for c in 0..ch {
                    self.data[dst + c] = self.data[dst + c].max(bitmap[src + c]);
                }
            }
        }
    }

    /// Blend the mask against `colors` through the shared compositor.
    pub fn to_pixels(&self, colors: ColorPair) -> Option<PixelBuffer> {
        if self.is_subpixel() {
            subpixel_coverage_to_pixels(self.width, self.height, &self.data, colors)
        } else {
            coverage_to_pixels(self.width, self.height, &self.data, colors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileport_core::{Pixel, blend};

    #[test]
    fn stamp_clips_and_keeps_max() {
        let mut mask = CoverageMask::new(Size::new(3, 2));
        mask.stamp(-1, 0, 2, 2, &[9, 100, 9, 50]);
        mask.stamp(0, 1, 2, 2, &[80, 200, 7, 7]);
        assert_eq!(mask.as_slice(), &[100, 0, 0, 80, 200, 0]);
    }

    #[test]
    fn short_bitmap_is_ignored() {
        let mut mask = CoverageMask::new(Size::new(2, 2));
        mask.stamp(0, 0, 2, 2, &[255; 3]);
        assert!(mask.as_slice().iter().all(|&c| c == 0));
    }

    #[test]
    fn put_ignores_outside() {
        let mut mask = CoverageMask::subpixel(Size::new(1, 1));
        mask.put(1, 0, 255);
        mask.put(0, -1, 255);
        mask.put(0, 0, 40);
        assert_eq!(mask.as_slice(), &[40, 40, 40]);
    }

    #[test]
    fn pixels_go_through_blend() {
        let colors = ColorPair::new(Pixel::rgb(255, 0, 0), Pixel::rgb(0, 0, 255));
        let mut mask = CoverageMask::new(Size::new(2, 1));
        mask.put(1, 0, 128);
        let px = mask.to_pixels(colors).unwrap();
        assert_eq!(px.as_slice(), &[colors.bg, blend(128, colors.fg, colors.bg)]);
    }

    #[test]
    fn subpixel_mask_uses_channels() {
        let colors = ColorPair::new(Pixel::WHITE, Pixel::BLACK);
        let mut mask = CoverageMask::subpixel(Size::new(1, 1));
        mask.stamp(0, 0, 1, 1, &[255, 0, 0]);
        let px = mask.to_pixels(colors).unwrap();
        // red fully covered, green and blue not; alpha follows green
        assert_eq!(px.as_slice(), &[Pixel::rgba(255, 0, 0, 255)]);
    }
}
