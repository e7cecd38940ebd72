//! **tileport-core** — Pixel, palette and tile types shared by every
//! tileport window port.
//!
//! This crate provides the backend-independent pieces of the rendering
//! pipeline: straight-alpha [`Pixel`]s and the buffers that hold them,
//! exact first-seen palette quantization, the [`Tile`] type handed to map
//! renderers, and the single fixed-point alpha compositor every font
//! backend routes its coverage through.

pub mod buffer;
pub mod composite;
pub mod geom;
pub mod palette;
pub mod pixel;
pub mod tiles;

pub use buffer::{IndexBuffer, PixelBuffer};
pub use composite::{ColorPair, blend, unpremultiply};
pub use geom::{Point, Size};
pub use palette::{MAX_COLORS, Palette, QuantizeError, quantize};
pub use pixel::Pixel;
pub use tiles::{Tile, TileSource};
