//! Indexed colour: the [`Palette`] type and exact first-seen
//! [`quantize`]ation.

use thiserror::Error;

use crate::buffer::{IndexBuffer, PixelBuffer};
use crate::pixel::Pixel;

/// Largest number of entries a palette can hold.
pub const MAX_COLORS: usize = 256;

/// Quantization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuantizeError {
    /// The image has more than [`MAX_COLORS`] distinct colours.
    #[error("image has more than {MAX_COLORS} distinct colors")]
    TooManyColors,
}

/// An ordered table of at most [`MAX_COLORS`] colours.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Palette {
    colors: Vec<Pixel>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a palette from a colour list. Returns `None` if it has more
    /// than [`MAX_COLORS`] entries.
    pub fn from_colors(colors: Vec<Pixel>) -> Option<Self> {
        (colors.len() <= MAX_COLORS).then_some(Self { colors })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colour at `index`, if the palette has that many entries.
    #[inline]
    pub fn get(&self, index: u8) -> Option<Pixel> {
        self.colors.get(index as usize).copied()
    }

    #[inline]
    pub fn colors(&self) -> &[Pixel] {
        &self.colors
    }

    /// Exact-match lookup.
    pub fn position(&self, color: Pixel) -> Option<u8> {
        self.colors.iter().position(|&c| c == color).map(|i| i as u8)
    }

    /// Append a colour, returning its index, or `None` if the palette is
    /// full.
    pub fn push(&mut self, color: Pixel) -> Option<u8> {
        if self.colors.len() >= MAX_COLORS {
            return None;
        }
        self.colors.push(color);
        Some((self.colors.len() - 1) as u8)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Palette {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Parts {
            colors: Vec<Pixel>,
        }

        let parts = <Parts as serde::Deserialize<'de>>::deserialize(deserializer)?;
        Palette::from_colors(parts.colors)
            .ok_or_else(|| serde::de::Error::custom(format!("palette has more than {MAX_COLORS} colors")))
    }
}

/// Derive a palette and index buffer from a true-colour image.
///
/// Pixels are visited in raster order and compared for exact RGBA
/// equality; each new colour is appended, so entry `i` is the `i`-th
/// distinct colour encountered. The result is therefore a pure function of
/// the pixel content. There is no nearest-colour fallback: a 257th distinct
/// colour fails the whole operation.
pub fn quantize(pixels: &PixelBuffer) -> Result<(Palette, IndexBuffer), QuantizeError> {
    let mut palette = Palette::new();
    let mut indexes = Vec::with_capacity(pixels.as_slice().len());

    for &p in pixels.as_slice() {
        let index = match palette.position(p) {
            Some(i) => i,
            None => palette.push(p).ok_or(QuantizeError::TooManyColors)?,
        };
        indexes.push(index);
    }

    let indexes = IndexBuffer::from_vec(pixels.width(), pixels.height(), indexes)
        .unwrap_or_default();
    Ok((palette, indexes))
}
