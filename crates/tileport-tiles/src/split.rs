//! Splitting a tileset image into its tile catalog.

use tileport_core::{Size, Tile, TileSource};

use crate::decode::TileSetImage;
use crate::error::TilesetError;

/// The fixed set of tiles cut from a tileset image, plus the blank tile
/// returned for out-of-range lookups.
///
/// Tiles are numbered row-major across the tile grid:
/// `index = grid_row * columns + grid_col`.
#[derive(Clone, Debug)]
pub struct TileCatalog {
    tiles: Vec<Tile>,
    blank: Tile,
    tile_size: Size,
    columns: u32,
    rows: u32,
}

impl TileCatalog {
    /// Cut `image` into `tile_width x tile_height` tiles.
    ///
    /// Pixels past the last whole tile column or row are dropped. The blank
    /// tile is opaque black and carries an all-zero index buffer when the
    /// image is indexed.
    pub fn split(image: &TileSetImage) -> Result<Self, TilesetError> {
        let tile_size = image.tile_size();
        if tile_size.is_empty() {
            return Err(TilesetError::InvalidTileSize {
                width: tile_size.width,
                height: tile_size.height,
            });
        }

        let columns = image.width() / tile_size.width;
        let rows = image.height() / tile_size.height;
        let mut tiles = Vec::with_capacity(columns as usize * rows as usize);

        for row in 0..rows {
            for col in 0..columns {
                let (x, y) = (col * tile_size.width, row * tile_size.height);
                let pixels = image
                    .pixels
                    .copy_rect(x, y, tile_size)
                    .ok_or(TilesetError::InvalidTileSize {
                        width: tile_size.width,
                        height: tile_size.height,
                    })?;
                let indexes = image
                    .indexes
                    .as_ref()
                    .and_then(|idx| idx.copy_rect(x, y, tile_size));
                tiles.push(Tile { pixels, indexes });
            }
        }

        Ok(Self {
            tiles,
            blank: Tile::blank(tile_size, image.is_indexed()),
            tile_size,
            columns,
            rows,
        })
    }

    /// Number of tiles in the catalog.
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile grid columns.
    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Tile grid rows.
    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// The fallback tile for out-of-range indices.
    #[inline]
    pub fn blank(&self) -> &Tile {
        &self.blank
    }

    /// Catalog position of `index`, or `None` if it is out of range.
    #[inline]
    pub fn slot(&self, index: i32) -> Option<usize> {
        usize::try_from(index).ok().filter(|&i| i < self.tiles.len())
    }

    /// The tile at `index`; the blank tile when `index` is negative or past
    /// the end.
    pub fn get(&self, index: i32) -> &Tile {
        match self.slot(index) {
            Some(i) => &self.tiles[i],
            None => &self.blank,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}

impl TileSource for TileCatalog {
    fn tile_size(&self) -> Size {
        self.tile_size
    }

    fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    fn get_tile(&self, index: i32) -> &Tile {
        self.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{DecodeOptions, decode_bytes};
    use crate::testutil::{bmp_24bit, bmp_8bit, checkerboard_80x24};
    use tileport_core::Pixel;

    #[test]
    fn catalog_of_80x24_checkerboard() {
        let image = decode_bytes(&checkerboard_80x24(), &DecodeOptions::default()).unwrap();
        let catalog = TileCatalog::split(&image).unwrap();
        assert_eq!(catalog.len(), 480);
        assert_eq!((catalog.columns(), catalog.rows()), (40, 12));
        assert_eq!(catalog.tile_size(), Size::new(2, 2));

        // tile (col 1, row 0) covers x 2..4, y 0..2: black, white / white, black
        let t = catalog.get(1);
        assert_eq!(
            t.pixels.as_slice(),
            &[Pixel::BLACK, Pixel::WHITE, Pixel::WHITE, Pixel::BLACK]
        );
        assert_eq!(t.indexes.as_ref().unwrap().as_slice(), &[0, 1, 1, 0]);

        for i in [-1, 480, 481, i32::MIN, i32::MAX] {
            assert_eq!(catalog.get(i), catalog.blank());
        }
        let blank = catalog.blank();
        assert!(blank.pixels.as_slice().iter().all(|&p| p == Pixel::BLACK));
        assert!(blank.indexes.as_ref().unwrap().as_slice().iter().all(|&i| i == 0));
    }

    #[test]
    fn tiles_match_source_rectangles() {
        // 5x3 image, 2x1 tiles: 2 columns x 3 rows, last column dropped
        let indexes: Vec<u8> = (0..15).collect();
        let palette: Vec<Pixel> = (0..15).map(|i| Pixel::rgb(i * 10, 0, 0)).collect();
        let bytes = bmp_8bit(5, 3, &palette, &indexes);
        let opts = DecodeOptions {
            tile_width: 2,
            tile_height: 1,
            ..Default::default()
        };
        let image = decode_bytes(&bytes, &opts).unwrap();
        let catalog = TileCatalog::split(&image).unwrap();
        assert_eq!(catalog.len(), 6);
        for i in 0..6i32 {
            let (row, col) = (i as u32 / 2, i as u32 % 2);
            let expected = image.pixels.copy_rect(col * 2, row, Size::new(2, 1)).unwrap();
            assert_eq!(catalog.get(i).pixels, expected);
        }
        assert_eq!(catalog.get(5).indexes.as_ref().unwrap().as_slice(), &[12, 13]);
    }

    #[test]
    fn true_color_blank_has_no_indexes() {
        let pixels: Vec<Pixel> = (0..300u32).map(|i| Pixel::rgb(i as u8, (i >> 8) as u8, 1)).collect();
        let image = decode_bytes(&bmp_24bit(30, 10, &pixels), &DecodeOptions {
            tile_width: 10,
            tile_height: 10,
            ..Default::default()
        })
        .unwrap();
        let catalog = TileCatalog::split(&image).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.blank().is_indexed());
        assert!(catalog.iter().all(|t| !t.is_indexed()));
    }

    #[test]
    fn zero_tile_size_rejected() {
        // 30 pixels wide: default tile width 30 / 40 = 0
        let bytes = bmp_8bit(30, 2, &[Pixel::BLACK], &[0; 60]);
        let image = decode_bytes(&bytes, &DecodeOptions::default()).unwrap();
        assert_eq!(
            TileCatalog::split(&image).unwrap_err(),
            TilesetError::InvalidTileSize { width: 0, height: 0 }
        );
    }

    #[test]
    fn image_smaller_than_tile_gives_empty_catalog() {
        let bytes = bmp_8bit(4, 4, &[Pixel::BLACK], &[0; 16]);
        let image = decode_bytes(&bytes, &DecodeOptions {
            tile_width: 8,
            ..Default::default()
        })
        .unwrap();
        let catalog = TileCatalog::split(&image).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.get(0), catalog.blank());
    }
}
