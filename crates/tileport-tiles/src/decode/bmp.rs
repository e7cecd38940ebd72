//! Windows / OS/2 bitmap decoding.
//!
//! Palettized bitmaps (1, 4 and 8 bits per pixel, uncompressed or RLE)
//! are decoded here so their colour table survives as the tileset
//! palette. Direct-colour bitmaps go through the `image` crate.

use tileport_core::{IndexBuffer, Palette, Pixel};

use super::{ImageFormat, RawImage, check_dimensions, decode_true_color, unpack_index};
use crate::error::TilesetError;

const FILE_HEADER_LEN: usize = 14;
const CORE_HEADER_LEN: usize = 12;
const INFO_HEADER_LEN: usize = 40;

const BI_RGB: u32 = 0;
const BI_RLE8: u32 = 1;
const BI_RLE4: u32 = 2;

fn err(reason: impl Into<String>) -> TilesetError {
    TilesetError::decode(ImageFormat::Bmp, reason)
}

fn u16_at(b: &[u8], off: usize) -> Result<u16, TilesetError> {
    b.get(off..off + 2)
        .map(|s| u16::from_le_bytes([s[0], s[1]]))
        .ok_or_else(|| err("truncated header"))
}

fn u32_at(b: &[u8], off: usize) -> Result<u32, TilesetError> {
    b.get(off..off + 4)
        .map(|s| u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
        .ok_or_else(|| err("truncated header"))
}

/// The fields of the info header this decoder cares about.
struct Header {
    width: u32,
    height: u32,
    top_down: bool,
    bpp: u16,
    compression: u32,
    colors_used: u32,
    /// Bytes per colour-table entry: 3 for OS/2 core headers, else 4.
    entry_len: usize,
    palette_offset: usize,
    data_offset: usize,
}

impl Header {
    fn parse(b: &[u8]) -> Result<Self, TilesetError> {
        let data_offset = u32_at(b, 10)? as usize;
        let header_len = u32_at(b, FILE_HEADER_LEN)? as usize;
        let base = FILE_HEADER_LEN;

        let (width, height, bpp, compression, colors_used, entry_len) = if header_len == CORE_HEADER_LEN {
            let w = u16_at(b, base + 4)? as i32;
            let h = u16_at(b, base + 6)? as i32;
            (w, h, u16_at(b, base + 10)?, BI_RGB, 0, 3)
        } else if header_len >= INFO_HEADER_LEN {
            let w = u32_at(b, base + 4)? as i32;
            let h = u32_at(b, base + 8)? as i32;
            let bpp = u16_at(b, base + 14)?;
            let compression = u32_at(b, base + 16)?;
            let colors_used = u32_at(b, base + 32)?;
            (w, h, bpp, compression, colors_used, 4)
        } else {
            return Err(err(format!("unsupported info header size {header_len}")));
        };

        if width <= 0 {
            return Err(err(format!("invalid width {width}")));
        }
        Ok(Self {
            width: width as u32,
            height: height.unsigned_abs(),
            top_down: height < 0,
            bpp,
            compression,
            colors_used,
            entry_len,
            palette_offset: base + header_len,
            data_offset,
        })
    }

    /// Destination row for the `y`-th row stored in the file.
    #[inline]
    fn image_row(&self, y: u32) -> u32 {
        if self.top_down { y } else { self.height - 1 - y }
    }
}

pub(crate) fn decode(bytes: &[u8]) -> Result<RawImage, TilesetError> {
    let header = Header::parse(bytes)?;
    check_dimensions(ImageFormat::Bmp, header.width, header.height)?;

    if header.bpp > 8 {
        return decode_true_color(bytes, ImageFormat::Bmp).map(RawImage::true_color);
    }
    if !matches!(header.bpp, 1 | 4 | 8) {
        return Err(err(format!("unsupported bit depth {}", header.bpp)));
    }

    let palette = read_palette(bytes, &header)?;
    let data = bytes
        .get(header.data_offset..)
        .ok_or_else(|| err("pixel data offset past end of file"))?;

    let indexes = match (header.compression, header.bpp) {
        (BI_RGB, _) => read_uncompressed(data, &header)?,
        (BI_RLE8, 8) | (BI_RLE4, 4) => read_rle(data, &header)?,
        (c, bpp) => return Err(err(format!("unsupported compression {c} at {bpp} bits"))),
    };

    RawImage::indexed(ImageFormat::Bmp, palette, indexes)
}

fn read_palette(bytes: &[u8], header: &Header) -> Result<Palette, TilesetError> {
    let mut count = match header.colors_used {
        0 => 1usize << header.bpp,
        n => (n as usize).min(1 << header.bpp),
    };
    // Some writers overstate the table; never read into the pixel data.
    if header.data_offset > header.palette_offset {
        count = count.min((header.data_offset - header.palette_offset) / header.entry_len);
    }

    let table = bytes
        .get(header.palette_offset..header.palette_offset + count * header.entry_len)
        .ok_or_else(|| err("truncated color table"))?;
    let colors = table
        .chunks_exact(header.entry_len)
        .map(|e| Pixel::rgb(e[2], e[1], e[0]))
        .collect();
    Palette::from_colors(colors).ok_or_else(|| err("color table too large"))
}

fn read_uncompressed(data: &[u8], header: &Header) -> Result<IndexBuffer, TilesetError> {
    let stride = (header.width as usize * header.bpp as usize).div_ceil(32) * 4;
    if data.len() < stride * header.height as usize {
        return Err(err("truncated pixel data"));
    }

    let mut indexes = IndexBuffer::filled(header.width, header.height, 0);
    for (y, row) in data.chunks_exact(stride).take(header.height as usize).enumerate() {
        let dst = header.image_row(y as u32);
        for x in 0..header.width {
            indexes.set(x, dst, unpack_index(row, x as usize, header.bpp as u8));
        }
    }
    Ok(indexes)
}

/// Decode RLE8 or RLE4 data. Pixels the stream skips keep index 0.
///
/// Decoding stops once the stream moves past the last row, even without an
/// end-of-bitmap marker. Runs past the right edge are dropped.
fn read_rle(data: &[u8], header: &Header) -> Result<IndexBuffer, TilesetError> {
    let four_bit = header.bpp == 4;
    let mut indexes = IndexBuffer::filled(header.width, header.height, 0);
    let (mut x, mut y) = (0u32, 0u32);
    let mut pos = 0usize;

    let mut put = |x: u32, y: u32, v: u8| {
        if y < header.height {
            indexes.set(x, header.image_row(y), v);
        }
    };

    loop {
        let (count, value) = match data.get(pos..pos + 2) {
            Some(pair) => (pair[0], pair[1]),
            None => return Err(err("RLE data ended without end-of-bitmap marker")),
        };
        pos += 2;

        if count > 0 {
            for k in 0..count {
                let v = match (four_bit, k % 2) {
                    (false, _) => value,
                    (true, 0) => value >> 4,
                    (true, _) => value & 0x0F,
                };
                put(x, y, v);
                x = x.saturating_add(1);
            }
            continue;
        }

        match value {
            0 => {
                x = 0;
                y = y.saturating_add(1);
                if y >= header.height {
                    break;
                }
            }
            1 => break,
            2 => {
                let delta = data.get(pos..pos + 2).ok_or_else(|| err("truncated RLE delta"))?;
                x = x.saturating_add(delta[0] as u32);
                y = y.saturating_add(delta[1] as u32);
                pos += 2;
                if y >= header.height {
                    break;
                }
            }
            run => {
                let run = run as usize;
                let len = if four_bit { run.div_ceil(2) } else { run };
                let literal = data.get(pos..pos + len).ok_or_else(|| err("truncated RLE literal"))?;
                for k in 0..run {
                    let v = if four_bit {
                        if k % 2 == 0 { literal[k / 2] >> 4 } else { literal[k / 2] & 0x0F }
                    } else {
                        literal[k]
                    };
                    put(x, y, v);
                    x = x.saturating_add(1);
                }
                // literal runs are padded to a 16-bit boundary
                pos += len + len % 2;
            }
        }
    }
    Ok(indexes)
}
