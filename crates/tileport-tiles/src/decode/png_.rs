//! PNG decoding.
//!
//! Indexed PNGs are decoded with the `png` crate directly so the `PLTE`
//! order and `tRNS` alpha are preserved; every other colour type is
//! expanded to RGBA by the `image` crate.

use tileport_core::{IndexBuffer, Palette, Pixel};

use super::{ImageFormat, RawImage, check_dimensions, decode_true_color, unpack_index};
use crate::error::TilesetError;

/// `tEXt` keyword carrying the tile-map description.
const DESCRIPTION_KEYWORD: &str = "Description";

fn err(reason: impl Into<String>) -> TilesetError {
    TilesetError::decode(ImageFormat::Png, reason)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<RawImage, TilesetError> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info().map_err(|e| err(e.to_string()))?;

    let info = reader.info();
    let image_desc = info
        .uncompressed_latin1_text
        .iter()
        .find(|chunk| chunk.keyword == DESCRIPTION_KEYWORD)
        .map(|chunk| chunk.text.clone());

    if info.color_type != png::ColorType::Indexed {
        let pixels = decode_true_color(bytes, ImageFormat::Png)?;
        return Ok(RawImage {
            image_desc,
            ..RawImage::true_color(pixels)
        });
    }

    let (width, height) = (info.width, info.height);
    check_dimensions(ImageFormat::Png, width, height)?;
    let bits = info.bit_depth as u8;
    let plte = info
        .palette
        .as_deref()
        .ok_or_else(|| err("indexed image without PLTE chunk"))?
        .to_vec();
    let trns = info.trns.as_deref().map(<[u8]>::to_vec).unwrap_or_default();

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).map_err(|e| err(e.to_string()))?;

    let mut indexes = IndexBuffer::filled(width, height, 0);
    for (y, row) in buf.chunks_exact(frame.line_size).take(height as usize).enumerate() {
        for x in 0..width {
            indexes.set(x, y as u32, unpack_index(row, x as usize, bits));
        }
    }

    let colors = plte
        .chunks_exact(3)
        .enumerate()
        .map(|(i, c)| Pixel::rgba(c[0], c[1], c[2], trns.get(i).copied().unwrap_or(255)))
        .collect();
    let palette = Palette::from_colors(colors).ok_or_else(|| err("PLTE has more than 256 entries"))?;

    let mut raw = RawImage::indexed(ImageFormat::Png, palette, indexes)?;
    raw.image_desc = image_desc;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(
        width: u32,
        height: u32,
        color: png::ColorType,
        depth: png::BitDepth,
        setup: impl FnOnce(&mut png::Encoder<'_, &mut Vec<u8>>),
        data: &[u8],
    ) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(depth);
            setup(&mut encoder);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn indexed_with_transparency() {
        let bytes = encode(
            3,
            1,
            png::ColorType::Indexed,
            png::BitDepth::Eight,
            |e| {
                e.set_palette(vec![10, 20, 30, 40, 50, 60]);
                e.set_trns(vec![0]);
            },
            &[1, 0, 1],
        );
        let raw = decode(&bytes).unwrap();
        let (palette, indexes) = raw.indexed.unwrap();
        assert_eq!(palette.colors(), &[Pixel::rgba(10, 20, 30, 0), Pixel::rgb(40, 50, 60)]);
        assert_eq!(indexes.as_slice(), &[1, 0, 1]);
        assert_eq!(raw.pixels.get(1, 0), Some(Pixel::rgba(10, 20, 30, 0)));
    }

    #[test]
    fn two_bit_indexed_rows() {
        // 5 pixels per row at 2 bits: 2 bytes per row
        let bytes = encode(
            5,
            2,
            png::ColorType::Indexed,
            png::BitDepth::Two,
            |e| e.set_palette(vec![0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255]),
            &[0b00_01_10_11, 0b01_000000, 0b11_10_01_00, 0b10_000000],
        );
        let (_, indexes) = decode(&bytes).unwrap().indexed.unwrap();
        assert_eq!(indexes.as_slice(), &[0, 1, 2, 3, 1, 3, 2, 1, 0, 2]);
    }

    #[test]
    fn rgba_goes_through_image_crate() {
        let bytes = encode(
            2,
            1,
            png::ColorType::Rgba,
            png::BitDepth::Eight,
            |_| {},
            &[1, 2, 3, 4, 5, 6, 7, 8],
        );
        let raw = decode(&bytes).unwrap();
        assert!(raw.indexed.is_none());
        assert_eq!(raw.pixels.as_slice(), &[Pixel::rgba(1, 2, 3, 4), Pixel::rgba(5, 6, 7, 8)]);
    }

    #[test]
    fn description_text_chunk_is_kept() {
        let bytes = encode(
            1,
            1,
            png::ColorType::Rgb,
            png::BitDepth::Eight,
            |e| {
                e.add_text_chunk(DESCRIPTION_KEYWORD.to_string(), "tiles 16x16".to_string())
                    .unwrap();
            },
            &[9, 9, 9],
        );
        let raw = decode(&bytes).unwrap();
        assert_eq!(raw.image_desc.as_deref(), Some("tiles 16x16"));
    }

    #[test]
    fn corrupt_stream_fails() {
        let mut bytes = encode(1, 1, png::ColorType::Rgb, png::BitDepth::Eight, |_| {}, &[0, 0, 0]);
        bytes.truncate(20);
        assert!(matches!(decode(&bytes), Err(TilesetError::Decode { .. })));
    }
}
