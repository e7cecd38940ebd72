//! **tileport-font** — Text rendering for tileport window ports.
//!
//! Every backend implements the one [`GlyphFont`] contract: line metrics,
//! a text extent that needs no rasterization, and drawing a string into a
//! straight-alpha [`PixelBuffer`](tileport_core::PixelBuffer) against a
//! foreground/background [`ColorPair`](tileport_core::ColorPair).
//!
//! Three backends ship here:
//!
//! * [`FontdueFont`] rasterizes coverage masks with `fontdue`, including
//!   LCD subpixel coverage.
//! * [`RusttypeFont`] rasterizes coverage masks with `rusttype`.
//! * [`CanvasFont`] paints through a `tiny-skia` pixmap, which hands back
//!   premultiplied RGBA.
//!
//! Coverage-mask backends go through [`tileport_core::blend`] and the
//! canvas backend through [`tileport_core::unpremultiply`], so all of them
//! produce identical straight-alpha output. [`FontRenderer`] wraps any
//! backend with the feature-downgrade retry and the placeholder fallback.
//!
//! [`FontLibrary`] turns a family name into font data: fonts registered by
//! the caller first, then the host font database (fontconfig where the
//! platform has it).

pub mod canvas;
pub mod config;
pub mod error;
pub mod fontdue_;
pub mod glyph;
pub mod library;
pub mod mask;
pub mod renderer;
pub mod rusttype_;
pub mod system;
pub mod unicode;

#[cfg(test)]
mod testdata;

pub use canvas::CanvasFont;
pub use config::{DEFAULT_MONO_FONT, DEFAULT_SANS_FONT, DEFAULT_SERIF_FONT, FontConfig};
pub use error::FontError;
pub use fontdue_::FontdueFont;
pub use glyph::{DrawFeatures, FontMetrics, GlyphFont};
pub use library::{FontBackend, FontLibrary};
pub use mask::CoverageMask;
pub use renderer::FontRenderer;
pub use rusttype_::RusttypeFont;
pub use system::SystemFont;
pub use unicode::{latin1_to_string, sanitize_code_point};
