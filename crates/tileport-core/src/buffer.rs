//! Rectangular row-major rasters: [`PixelBuffer`] and [`IndexBuffer`].
//!
//! Both are instances of the generic [`Raster`]. A raster exclusively owns
//! its storage; copies are explicit (`clone`, [`Raster::copy_rect`]) so no
//! two components ever alias the same pixels.

use crate::composite;
use crate::geom::{Point, Size};
use crate::pixel::Pixel;

/// A grid of RGBA pixels.
pub type PixelBuffer = Raster<Pixel>;

/// A grid of palette indices, one per pixel.
pub type IndexBuffer = Raster<u8>;

// ---------------------------------------------------------------------------
// Raster
// ---------------------------------------------------------------------------

/// A `width * height` grid of `T`, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Raster<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Copy> Raster<T> {
    /// Create a raster of the given dimensions with every element set to
    /// `fill`.
    pub fn filled(width: u32, height: u32, fill: T) -> Self {
        Self {
            width,
            height,
            data: vec![fill; Size::new(width, height).area()],
        }
    }

    /// Wrap existing row-major data. Returns `None` if `data.len()` is not
    /// `width * height`.
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Option<Self> {
        if data.len() != Size::new(width, height).area() {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the raster holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major element slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Give up the raster, returning its row-major storage.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Element at (x, y), or `None` outside the raster.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<T> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Set the element at (x, y). Returns `false` (and does nothing) if the
    /// position is outside the raster.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    /// One row as a slice.
    pub fn row(&self, y: u32) -> Option<&[T]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.data[start..start + self.width as usize])
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Copy the sub-rectangle with top-left corner (x, y) and the given
    /// size into a new raster. Returns `None` unless the rectangle lies
    /// entirely inside this raster.
    pub fn copy_rect(&self, x: u32, y: u32, size: Size) -> Option<Self> {
        let x_end = x.checked_add(size.width)?;
        let y_end = y.checked_add(size.height)?;
        if x_end > self.width || y_end > self.height {
            return None;
        }
        let mut data = Vec::with_capacity(size.area());
        for row in y..y_end {
            let start = row as usize * self.width as usize + x as usize;
            data.extend_from_slice(&self.data[start..start + size.width as usize]);
        }
        Some(Self {
            width: size.width,
            height: size.height,
            data,
        })
    }

    /// Copy `src` into this raster with its top-left corner at `at`,
    /// clipping whatever falls outside.
    pub fn blit(&mut self, src: &Self, at: Point) {
        self.for_each_overlap(src, at, |dst, s| *dst = s);
    }

    /// Visit each (destination element, source element) pair where `src`
    /// placed at `at` overlaps this raster.
    fn for_each_overlap(&mut self, src: &Self, at: Point, mut f: impl FnMut(&mut T, T)) {
        let x0 = at.x.max(0);
        let y0 = at.y.max(0);
        let x1 = (at.x as i64 + src.width as i64).min(self.width as i64) as i32;
        let y1 = (at.y as i64 + src.height as i64).min(self.height as i64) as i32;
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for y in y0..y1 {
            let sy = (y - at.y) as usize;
            for x in x0..x1 {
                let sx = (x - at.x) as usize;
                let s = src.data[sy * src.width as usize + sx];
                let d = y as usize * self.width as usize + x as usize;
                f(&mut self.data[d], s);
            }
        }
    }
}

impl Raster<Pixel> {
    /// Blend straight-alpha `src` over this buffer at `at`, clipping.
    ///
    /// Each source pixel's alpha is used as coverage for its opaque colour
    /// through [`composite::blend`], so the result is identical to what a
    /// font backend produces for the same coverage.
    pub fn composite(&mut self, src: &Self, at: Point) {
        self.for_each_overlap(src, at, |dst, s| {
            *dst = composite::blend(s.a, s.with_alpha(255), *dst);
        });
    }

    /// Build a pixel buffer from tightly packed RGBA8 bytes.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Size::new(width, height).area() * 4 {
            return None;
        }
        let data = bytes
            .chunks_exact(4)
            .map(|c| Pixel::rgba(c[0], c[1], c[2], c[3]))
            .collect();
        Self::from_vec(width, height, data)
    }

    /// Tightly packed RGBA8 bytes, row-major.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|p| p.to_array()).collect()
    }
}

#[cfg(feature = "serde")]
impl<'de, T: Copy + serde::Deserialize<'de>> serde::Deserialize<'de> for Raster<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Parts<T> {
            width: u32,
            height: u32,
            data: Vec<T>,
        }

        let parts = <Parts<T> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        Raster::from_vec(parts.width, parts.height, parts.data)
            .ok_or_else(|| serde::de::Error::custom("raster data length is not width * height"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(w: u32, h: u32) -> IndexBuffer {
        let data = (0..w * h).map(|i| i as u8).collect();
        IndexBuffer::from_vec(w, h, data).unwrap()
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(IndexBuffer::from_vec(2, 2, vec![0; 3]).is_none());
        assert!(IndexBuffer::from_vec(2, 2, vec![0; 4]).is_some());
    }

    #[test]
    fn get_set_bounds() {
        let mut b = IndexBuffer::filled(3, 2, 0);
        assert!(b.set(2, 1, 7));
        assert_eq!(b.get(2, 1), Some(7));
        assert!(!b.set(3, 0, 1));
        assert_eq!(b.get(0, 2), None);
    }

    #[test]
    fn copy_rect_inside_and_outside() {
        let b = numbered(4, 3);
        let r = b.copy_rect(1, 1, Size::new(2, 2)).unwrap();
        assert_eq!(r.as_slice(), &[5, 6, 9, 10]);
        assert!(b.copy_rect(3, 0, Size::new(2, 1)).is_none());
    }

    #[test]
    fn blit_clips_negative_origin() {
        let mut dst = IndexBuffer::filled(3, 3, 0);
        let src = numbered(2, 2);
        dst.blit(&src, Point::new(-1, 2));
        // only source (1, 0) lands, at (0, 2)
        assert_eq!(dst.as_slice(), &[0, 0, 0, 0, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn composite_uses_source_alpha() {
        let mut dst = PixelBuffer::filled(2, 1, Pixel::rgb(0, 0, 255));
        let src = PixelBuffer::from_vec(
            2,
            1,
            vec![Pixel::rgba(255, 0, 0, 0), Pixel::rgba(255, 0, 0, 255)],
        )
        .unwrap();
        dst.composite(&src, Point::ZERO);
        assert_eq!(dst.get(0, 0), Some(Pixel::rgb(0, 0, 255)));
        assert_eq!(dst.get(1, 0), Some(Pixel::rgb(255, 0, 0)));
    }

    #[test]
    fn rgba_bytes() {
        let b = PixelBuffer::from_rgba_bytes(1, 2, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(b.get(0, 1), Some(Pixel::rgba(5, 6, 7, 8)));
        assert_eq!(b.to_rgba_bytes(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(PixelBuffer::from_rgba_bytes(1, 2, &[0; 7]).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let b = numbered(3, 2);
        let json = serde_json::to_string(&b).unwrap();
        let back: IndexBuffer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);

        let px = PixelBuffer::filled(2, 1, Pixel::rgba(1, 2, 3, 4));
        let back: PixelBuffer = serde_json::from_str(&serde_json::to_string(&px).unwrap()).unwrap();
        assert_eq!(back, px);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_rejects_mismatched_length() {
        let bad = r#"{"width":2,"height":2,"data":[0,1,2]}"#;
        assert!(serde_json::from_str::<IndexBuffer>(bad).is_err());
    }
}
