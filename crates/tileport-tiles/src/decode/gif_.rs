//! GIF decoding (first frame only).

use tileport_core::{IndexBuffer, Palette, Pixel};

use super::{ImageFormat, RawImage, check_dimensions};
use crate::error::TilesetError;

fn err(reason: impl Into<String>) -> TilesetError {
    TilesetError::decode(ImageFormat::Gif, reason)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<RawImage, TilesetError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options.read_info(bytes).map_err(|e| err(e.to_string()))?;

    let screen_width = decoder.width() as u32;
    let screen_height = decoder.height() as u32;
    let global = decoder.global_palette().map(<[u8]>::to_vec);
    let background = decoder.bg_color();

    let frame = decoder
        .read_next_frame()
        .map_err(|e| err(e.to_string()))?
        .ok_or_else(|| err("no image data"))?;

    let table = frame
        .palette
        .clone()
        .or(global)
        .ok_or_else(|| err("no color table"))?;
    let mut colors: Vec<Pixel> = table
        .chunks_exact(3)
        .take(tileport_core::MAX_COLORS)
        .map(|c| Pixel::rgb(c[0], c[1], c[2]))
        .collect();
    if let Some(color) = frame.transparent.and_then(|t| colors.get_mut(t as usize)) {
        color.a = 0;
    }

    // The frame may be smaller than, offset within, or (with sloppy
    // encoders) larger than the logical screen.
    let (left, top) = (frame.left as u32, frame.top as u32);
    let (fw, fh) = (frame.width as u32, frame.height as u32);
    let width = screen_width.max(left + fw);
    let height = screen_height.max(top + fh);
    check_dimensions(ImageFormat::Gif, width, height)?;

    let fill = frame
        .transparent
        .map(usize::from)
        .or(background)
        .filter(|&i| i < colors.len())
        .unwrap_or(0) as u8;
    let mut indexes = IndexBuffer::filled(width, height, fill);

    if frame.buffer.len() < fw as usize * fh as usize {
        return Err(err("truncated frame"));
    }
    for (y, row) in frame.buffer.chunks_exact(fw.max(1) as usize).take(fh as usize).enumerate() {
        for (x, &v) in row.iter().enumerate() {
            indexes.set(left + x as u32, top + y as u32, v);
        }
    }

    let palette = Palette::from_colors(colors).ok_or_else(|| err("color table too large"))?;
    RawImage::indexed(ImageFormat::Gif, palette, indexes)
}
