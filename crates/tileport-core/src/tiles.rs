//! Tile images and the [`TileSource`] seam between tilesets and map
//! renderers.

use crate::buffer::{IndexBuffer, PixelBuffer};
use crate::geom::Size;
use crate::pixel::Pixel;

/// One map-cell image.
///
/// `indexes`, when present, has the same dimensions as `pixels` and holds
/// palette indices for backends that can only draw indexed colour.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub pixels: PixelBuffer,
    pub indexes: Option<IndexBuffer>,
}

impl Tile {
    /// A tile with no index buffer.
    pub fn new(pixels: PixelBuffer) -> Self {
        Self {
            pixels,
            indexes: None,
        }
    }

    /// A tile with an index buffer. Returns `None` if the two buffers
    /// differ in size.
    pub fn indexed(pixels: PixelBuffer, indexes: IndexBuffer) -> Option<Self> {
        (pixels.size() == indexes.size()).then_some(Self {
            pixels,
            indexes: Some(indexes),
        })
    }

    /// An opaque black tile, with an all-zero index buffer if `indexed`.
    pub fn blank(size: Size, indexed: bool) -> Self {
        Self {
            pixels: PixelBuffer::filled(size.width, size.height, Pixel::BLACK),
            indexes: indexed.then(|| IndexBuffer::filled(size.width, size.height, 0)),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.pixels.size()
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indexes.is_some()
    }
}

/// A source of tile images for a map renderer.
///
/// Lookup never fails: indices outside the catalog resolve to a blank
/// tile of the same size.
pub trait TileSource {
    /// Native tile size in pixels. All tiles have this size.
    fn tile_size(&self) -> Size;

    /// Number of tiles in the catalog.
    fn tile_count(&self) -> usize;

    /// The tile at `index`, or the blank tile when out of range.
    fn get_tile(&self, index: i32) -> &Tile;
}
