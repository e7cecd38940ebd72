//! Tileset loading and tile production for tileport graphical backends.
//!
//! The pipeline runs once at startup and then serves tiles for the rest of
//! the session:
//!
//! 1. [`decode`] reads a BMP, GIF, PNG or XPM tileset (detected by magic
//!    bytes) into a [`TileSetImage`], deriving a palette when the format
//!    has none.
//! 2. [`TileCatalog::split`] cuts the image into equally sized tiles plus a
//!    blank fallback tile.
//! 3. [`rescale`] produces a tile at any other cell size with an exact
//!    integer-ratio box filter.
//!
//! [`TilesetSession`] ties the three together and memoizes rescaled tiles
//! per target size; [`ZoomMode`] computes that target size from the window
//! geometry.

pub mod config;
pub mod decode;
pub mod error;
pub mod rescale;
pub mod session;
pub mod split;
pub mod zoom;

#[cfg(test)]
mod testutil;

pub use config::{DEFAULT_TILE_FILE, TilesetConfig};
pub use decode::{DecodeOptions, ImageFormat, TileSetImage, decode, decode_bytes, decode_with};
pub use error::TilesetError;
pub use rescale::rescale;
pub use session::TilesetSession;
pub use split::TileCatalog;
pub use zoom::{MAP_COLUMNS, MAP_ROWS, ZoomMode, cell_at, map_size};

pub use tileport_core::{Tile, TileSource};
