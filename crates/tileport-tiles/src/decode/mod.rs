//! Tileset image decoding.
//!
//! The format is chosen from the file's leading bytes, never from its
//! extension. Formats that are inherently indexed (GIF, palettized BMP,
//! indexed PNG, XPM) keep their own palette; everything else is run
//! through [`quantize`] to try to derive one.

mod bmp;
mod gif_;
mod png_;
mod xpm;

use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use tileport_core::{IndexBuffer, Palette, PixelBuffer, Size, quantize};

use crate::config::DEFAULT_TILE_FILE;
use crate::error::TilesetError;

/// Column count of the tile grid assumed when no tile width is configured.
const DEFAULT_TILE_COLUMNS: u32 = 40;

/// Upper bound on decoded image area, to reject absurd headers before
/// allocating.
const MAX_PIXELS: u64 = 1 << 28;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

// ---------------------------------------------------------------------------
// ImageFormat
// ---------------------------------------------------------------------------

/// The tileset formats understood by [`decode`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageFormat {
    Bmp,
    Gif,
    Png,
    Xpm,
}

impl ImageFormat {
    /// Identify a format from the first bytes of a file.
    pub fn detect(header: &[u8]) -> Option<Self> {
        if header.starts_with(b"BM") {
            Some(Self::Bmp)
        } else if header.starts_with(b"GIF87a") || header.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if header.starts_with(&PNG_SIGNATURE) {
            Some(Self::Png)
        } else if header.starts_with(b"/* XPM */") {
            Some(Self::Xpm)
        } else {
            None
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bmp => "BMP",
            Self::Gif => "GIF",
            Self::Png => "PNG",
            Self::Xpm => "XPM",
        })
    }
}

// ---------------------------------------------------------------------------
// TileSetImage
// ---------------------------------------------------------------------------

/// A decoded tileset, before it is split into tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileSetImage {
    pub format: ImageFormat,
    pub pixels: PixelBuffer,
    /// Per-pixel palette indices; present exactly when `palette` is.
    pub indexes: Option<IndexBuffer>,
    pub palette: Option<Palette>,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Free-form tile-map description carried by the file. Not interpreted.
    pub image_desc: Option<String>,
}

impl TileSetImage {
    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[inline]
    pub fn tile_size(&self) -> Size {
        Size::new(self.tile_width, self.tile_height)
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indexes.is_some()
    }
}

/// What a format decoder hands back.
pub(crate) struct RawImage {
    pub pixels: PixelBuffer,
    pub indexed: Option<(Palette, IndexBuffer)>,
    pub image_desc: Option<String>,
}

impl RawImage {
    pub fn true_color(pixels: PixelBuffer) -> Self {
        Self {
            pixels,
            indexed: None,
            image_desc: None,
        }
    }

    /// Build an indexed image, resolving every index through `palette`.
    pub fn indexed(
        format: ImageFormat,
        palette: Palette,
        indexes: IndexBuffer,
    ) -> Result<Self, TilesetError> {
        let mut data = Vec::with_capacity(indexes.as_slice().len());
        for &i in indexes.as_slice() {
            let color = palette
                .get(i)
                .ok_or_else(|| TilesetError::decode(format, format!("color index {i} out of range")))?;
            data.push(color);
        }
        let pixels = PixelBuffer::from_vec(indexes.width(), indexes.height(), data)
            .ok_or_else(|| TilesetError::decode(format, "pixel count mismatch"))?;
        Ok(Self {
            pixels,
            indexed: Some((palette, indexes)),
            image_desc: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Options for [`decode_with`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Whether the display can draw direct colour. When `false`, an image
    /// without a palette is rejected.
    pub allow_true_color: bool,
    /// Configured tile width; 0 means derive from the image.
    pub tile_width: u32,
    /// Configured tile height; 0 means use the tile width.
    pub tile_height: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            allow_true_color: true,
            tile_width: 0,
            tile_height: 0,
        }
    }
}

/// Decode the tileset at `path` with default tile sizes.
pub fn decode(path: impl AsRef<Path>, allow_true_color: bool) -> Result<TileSetImage, TilesetError> {
    decode_with(
        path,
        &DecodeOptions {
            allow_true_color,
            ..Default::default()
        },
    )
}

/// Decode the tileset at `path`. An empty path means
/// [`DEFAULT_TILE_FILE`].
///
/// The file is read completely and closed before decoding starts. Read
/// failures are reported as [`TilesetError::UnknownFormat`].
pub fn decode_with(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<TileSetImage, TilesetError> {
    let mut path = path.as_ref();
    if path.as_os_str().is_empty() {
        path = Path::new(DEFAULT_TILE_FILE);
    }
    let bytes = fs::read(path).map_err(|e| {
        warn!("cannot read tileset {}: {e}", path.display());
        TilesetError::UnknownFormat
    })?;
    decode_bytes(&bytes, options)
}

/// Decode a tileset held in memory.
pub fn decode_bytes(bytes: &[u8], options: &DecodeOptions) -> Result<TileSetImage, TilesetError> {
    let format = ImageFormat::detect(bytes).ok_or(TilesetError::UnknownFormat)?;
    debug!("tileset format detected as {format}");

    let raw = match format {
        ImageFormat::Bmp => bmp::decode(bytes)?,
        ImageFormat::Gif => gif_::decode(bytes)?,
        ImageFormat::Png => png_::decode(bytes)?,
        ImageFormat::Xpm => xpm::decode(bytes)?,
    };

    let (palette, indexes) = match raw.indexed {
        Some((palette, indexes)) => (Some(palette), Some(indexes)),
        None => match quantize(&raw.pixels) {
            Ok((palette, indexes)) => {
                debug!("derived a {}-color palette", palette.len());
                (Some(palette), Some(indexes))
            }
            Err(e) => {
                debug!("no palette for tileset: {e}");
                (None, None)
            }
        },
    };

    if !options.allow_true_color && indexes.is_none() {
        return Err(TilesetError::PaletteRequired);
    }

    let tile_width = match options.tile_width {
        0 => raw.pixels.width() / DEFAULT_TILE_COLUMNS,
        w => w,
    };
    let tile_height = match options.tile_height {
        0 => tile_width,
        h => h,
    };

    Ok(TileSetImage {
        format,
        pixels: raw.pixels,
        indexes,
        palette,
        tile_width,
        tile_height,
        image_desc: raw.image_desc,
    })
}

// ---------------------------------------------------------------------------
// Shared helpers for the format decoders
// ---------------------------------------------------------------------------

/// Reject zero-sized and implausibly large images.
pub(crate) fn check_dimensions(format: ImageFormat, width: u32, height: u32) -> Result<(), TilesetError> {
    if width == 0 || height == 0 {
        return Err(TilesetError::decode(format, format!("empty image {width}x{height}")));
    }
    if width as u64 * height as u64 > MAX_PIXELS {
        return Err(TilesetError::decode(format, format!("image too large: {width}x{height}")));
    }
    Ok(())
}

/// Extract the `x`-th `bits`-wide value from a packed row, most
/// significant bits first (the layout used by both BMP and PNG).
#[inline]
pub(crate) fn unpack_index(row: &[u8], x: usize, bits: u8) -> u8 {
    match bits {
        8 => row[x],
        _ => {
            let per_byte = 8 / bits as usize;
            let byte = row[x / per_byte];
            let shift = 8 - bits as usize * (x % per_byte + 1);
            (byte >> shift) & ((1u16 << bits) - 1) as u8
        }
    }
}

/// Decode a direct-colour image with the `image` crate.
pub(crate) fn decode_true_color(bytes: &[u8], format: ImageFormat) -> Result<PixelBuffer, TilesetError> {
    let codec = match format {
        ImageFormat::Bmp => image::ImageFormat::Bmp,
        ImageFormat::Gif => image::ImageFormat::Gif,
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Xpm => return Err(TilesetError::decode(format, "no direct-color decoder")),
    };
    let rgba = image::load_from_memory_with_format(bytes, codec)
        .map_err(|e| TilesetError::decode(format, e.to_string()))?
        .to_rgba8();
    check_dimensions(format, rgba.width(), rgba.height())?;
    PixelBuffer::from_rgba_bytes(rgba.width(), rgba.height(), rgba.as_raw())
        .ok_or_else(|| TilesetError::decode(format, "pixel count mismatch"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{bmp_8bit, bmp_24bit};
    use tileport_core::Pixel;

    #[test]
    fn detect_magic() {
        assert_eq!(ImageFormat::detect(b"BM\0\0"), Some(ImageFormat::Bmp));
        assert_eq!(ImageFormat::detect(b"GIF87a..."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect(b"GIF89a..."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect(&PNG_SIGNATURE), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::detect(b"/* XPM */\nstatic"), Some(ImageFormat::Xpm));
        assert_eq!(ImageFormat::detect(b"GIF88a"), None);
        assert_eq!(ImageFormat::detect(b"B"), None);
        assert_eq!(ImageFormat::detect(b""), None);
    }

    #[test]
    fn unknown_bytes_rejected() {
        let err = decode_bytes(b"not an image at all", &DecodeOptions::default()).unwrap_err();
        assert_eq!(err, TilesetError::UnknownFormat);
    }

    #[test]
    fn missing_file_is_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode(dir.path().join("nope.bmp"), true).unwrap_err();
        assert_eq!(err, TilesetError::UnknownFormat);
    }

    #[test]
    fn default_tile_size_from_width() {
        let pixels = vec![0u8; 80 * 24];
        let bytes = bmp_8bit(80, 24, &[Pixel::BLACK, Pixel::WHITE], &pixels);
        let img = decode_bytes(&bytes, &DecodeOptions::default()).unwrap();
        assert_eq!(img.tile_size(), Size::new(2, 2));
    }

    #[test]
    fn configured_tile_size_wins() {
        let bytes = bmp_8bit(80, 24, &[Pixel::BLACK], &[0; 80 * 24]);
        let opts = DecodeOptions {
            tile_width: 16,
            ..Default::default()
        };
        let img = decode_bytes(&bytes, &opts).unwrap();
        assert_eq!(img.tile_size(), Size::new(16, 16));

        let opts = DecodeOptions {
            tile_height: 12,
            ..Default::default()
        };
        let img = decode_bytes(&bytes, &opts).unwrap();
        assert_eq!(img.tile_size(), Size::new(2, 12));
    }

    #[test]
    fn true_color_image_gets_quantized() {
        let colors = [Pixel::rgb(255, 0, 0), Pixel::rgb(0, 255, 0)];
        let bytes = bmp_24bit(2, 2, &[colors[1], colors[0], colors[0], colors[1]]);
        let img = decode_bytes(&bytes, &DecodeOptions::default()).unwrap();
        let palette = img.palette.unwrap();
        assert_eq!(palette.colors(), &[colors[1], colors[0]]);
        assert_eq!(img.indexes.unwrap().as_slice(), &[0, 1, 1, 0]);
    }

    #[test]
    fn palette_required_without_true_color() {
        // 300 distinct colours cannot be quantized
        let pixels: Vec<Pixel> = (0..300u32)
            .map(|i| Pixel::rgb(i as u8, (i >> 8) as u8, 7))
            .collect();
        let bytes = bmp_24bit(20, 15, &pixels);

        let opts = DecodeOptions {
            allow_true_color: false,
            ..Default::default()
        };
        assert_eq!(decode_bytes(&bytes, &opts).unwrap_err(), TilesetError::PaletteRequired);

        let img = decode_bytes(&bytes, &DecodeOptions::default()).unwrap();
        assert!(!img.is_indexed());
        assert!(img.palette.is_none());
    }

    #[test]
    fn unpack_packed_rows() {
        let row = [0b1011_0010u8, 0xF0];
        assert_eq!(unpack_index(&row, 0, 1), 1);
        assert_eq!(unpack_index(&row, 1, 1), 0);
        assert_eq!(unpack_index(&row, 2, 1), 1);
        assert_eq!(unpack_index(&row, 1, 2), 0b11);
        assert_eq!(unpack_index(&row, 0, 4), 0b1011);
        assert_eq!(unpack_index(&row, 2, 4), 0xF);
        assert_eq!(unpack_index(&row, 1, 8), 0xF0);
    }
}
