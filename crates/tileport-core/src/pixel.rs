//! The [`Pixel`] type: one straight-alpha RGBA colour.

// ---------------------------------------------------------------------------
// Pixel
// ---------------------------------------------------------------------------

/// An 8-bit-per-channel RGBA colour.
///
/// The alpha channel is always *straight* (not premultiplied) wherever a
/// `Pixel` crosses a public API. Backends that produce premultiplied data
/// must run it through [`unpremultiply`](crate::composite::unpremultiply)
/// first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque black; the colour of the blank tile.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Construct from individual RGBA components.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Construct an opaque colour.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Same colour with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Whether the pixel is fully opaque.
    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Whether the pixel is fully transparent.
    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Channels in `[r, g, b, a]` order.
    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Pixel {
    #[inline]
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::rgba(r, g, b, a)
    }
}

impl From<Pixel> for [u8; 4] {
    #[inline]
    fn from(p: Pixel) -> Self {
        p.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_conversions() {
        let p = Pixel::from([0xAB, 0xCD, 0xEF, 0x12]);
        assert_eq!(p, Pixel::rgba(0xAB, 0xCD, 0xEF, 0x12));
        assert_eq!(<[u8; 4]>::from(p), [0xAB, 0xCD, 0xEF, 0x12]);
    }

    #[test]
    fn opacity_predicates() {
        assert!(Pixel::BLACK.is_opaque());
        assert!(Pixel::TRANSPARENT.is_transparent());
        assert!(!Pixel::WHITE.with_alpha(128).is_opaque());
    }
}
