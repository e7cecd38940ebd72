//! A loaded tileset and its rescaled-tile cache.

use std::collections::HashMap;

use log::{debug, info};
use tileport_core::{Palette, Size, Tile, TileSource};

use crate::config::TilesetConfig;
use crate::decode::{ImageFormat, TileSetImage, decode_with};
use crate::error::TilesetError;
use crate::rescale::rescale;
use crate::split::TileCatalog;

/// Everything a graphical backend keeps about its tileset between frames.
///
/// Tiles at the native size come straight from the catalog. Tiles at any
/// other size are rescaled on first use and memoized per `(slot, size)`,
/// where out-of-range indices share the blank tile's slot.
#[derive(Debug)]
pub struct TilesetSession {
    catalog: TileCatalog,
    palette: Option<Palette>,
    format: ImageFormat,
    image_desc: Option<String>,
    scaled: HashMap<(Option<usize>, Size), Tile>,
}

impl TilesetSession {
    /// Decode and split the tileset named by `config`.
    pub fn load(config: &TilesetConfig) -> Result<Self, TilesetError> {
        let path = config.resolved_path();
        let image = decode_with(path, &config.decode_options())?;
        let session = Self::from_image(image)?;
        info!(
            "loaded {} tileset {}: {} tiles of {}",
            session.format,
            path.display(),
            session.catalog.len(),
            session.catalog.tile_size(),
        );
        Ok(session)
    }

    /// Split an already decoded image.
    pub fn from_image(image: TileSetImage) -> Result<Self, TilesetError> {
        let catalog = TileCatalog::split(&image)?;
        Ok(Self {
            catalog,
            palette: image.palette,
            format: image.format,
            image_desc: image.image_desc,
            scaled: HashMap::new(),
        })
    }

    #[inline]
    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    /// The tileset palette, if it has one. Indexed tiles refer to it.
    #[inline]
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    #[inline]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn image_desc(&self) -> Option<&str> {
        self.image_desc.as_deref()
    }

    /// The native-size tile at `index`, or the blank tile.
    #[inline]
    pub fn get_tile(&self, index: i32) -> &Tile {
        self.catalog.get(index)
    }

    /// The tile at `index` resampled to `size`.
    pub fn scaled_tile(&mut self, index: i32, size: Size) -> &Tile {
        let catalog = &self.catalog;
        if size == catalog.tile_size() {
            return catalog.get(index);
        }
        let slot = catalog.slot(index);
        self.scaled.entry((slot, size)).or_insert_with(|| {
            debug!("rescaling tile {index} to {size}");
            rescale(catalog.get(index), size)
        })
    }

    /// Drop every cached rescaled tile, e.g. after the cell size changed.
    pub fn clear_scaled(&mut self) {
        self.scaled.clear();
    }

    /// Number of rescaled tiles currently cached.
    #[inline]
    pub fn scaled_count(&self) -> usize {
        self.scaled.len()
    }
}

impl TileSource for TilesetSession {
    fn tile_size(&self) -> Size {
        self.catalog.tile_size()
    }

    fn tile_count(&self) -> usize {
        self.catalog.len()
    }

    fn get_tile(&self, index: i32) -> &Tile {
        self.catalog.get(index)
    }
}
