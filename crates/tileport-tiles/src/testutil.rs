//! Synthetic tileset images for tests.

use tileport_core::Pixel;

/// Wrap DIB data in a BMP file with a 40-byte info header.
fn bmp_file(width: i32, height: i32, bpp: u16, compression: u32, palette: &[Pixel], data: &[u8]) -> Vec<u8> {
    let pal_bytes = palette.len() * 4;
    let offset = 14 + 40 + pal_bytes;
    let mut out = Vec::with_capacity(offset + data.len());
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&((offset + data.len()) as u32).to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&(offset as u32).to_le_bytes());

    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&bpp.to_le_bytes());
    out.extend_from_slice(&compression.to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&2835i32.to_le_bytes());
    out.extend_from_slice(&2835i32.to_le_bytes());
    out.extend_from_slice(&(palette.len() as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    for p in palette {
        out.extend_from_slice(&[p.b, p.g, p.r, 0]);
    }
    out.extend_from_slice(data);
    out
}

/// Row stride of an uncompressed DIB.
fn stride(width: u32, bpp: u32) -> usize {
    (width * bpp).div_ceil(32) as usize * 4
}

/// Bottom-up 8-bit palettized BMP. `indexes` is in top-down raster order.
pub fn bmp_8bit(width: u32, height: u32, palette: &[Pixel], indexes: &[u8]) -> Vec<u8> {
    let s = stride(width, 8);
    let mut data = vec![0u8; s * height as usize];
    for y in 0..height as usize {
        let dst = (height as usize - 1 - y) * s;
        let src = y * width as usize;
        data[dst..dst + width as usize].copy_from_slice(&indexes[src..src + width as usize]);
    }
    bmp_file(width as i32, height as i32, 8, 0, palette, &data)
}

/// Top-down 4-bit palettized BMP.
pub fn bmp_4bit_top_down(width: u32, height: u32, palette: &[Pixel], indexes: &[u8]) -> Vec<u8> {
    let s = stride(width, 4);
    let mut data = vec![0u8; s * height as usize];
    for y in 0..height as usize {
        for x in 0..width as usize {
            let v = indexes[y * width as usize + x] & 0x0F;
            let byte = &mut data[y * s + x / 2];
            if x % 2 == 0 {
                *byte |= v << 4;
            } else {
                *byte |= v;
            }
        }
    }
    bmp_file(width as i32, -(height as i32), 4, 0, palette, &data)
}

/// Bottom-up RLE8 BMP from already encoded RLE data.
pub fn bmp_rle8(width: u32, height: u32, palette: &[Pixel], rle: &[u8]) -> Vec<u8> {
    bmp_file(width as i32, height as i32, 8, 1, palette, rle)
}

/// Bottom-up 24-bit BMP. `pixels` is in top-down raster order.
pub fn bmp_24bit(width: u32, height: u32, pixels: &[Pixel]) -> Vec<u8> {
    let s = stride(width, 24);
    let mut data = vec![0u8; s * height as usize];
    for y in 0..height as usize {
        let row = (height as usize - 1 - y) * s;
        for x in 0..width as usize {
            let p = pixels[y * width as usize + x];
            data[row + x * 3..row + x * 3 + 3].copy_from_slice(&[p.b, p.g, p.r]);
        }
    }
    bmp_file(width as i32, height as i32, 24, 0, &[], &data)
}

/// An 80x24 two-colour BMP whose pixel (x, y) is white when `(x + y)` is
/// odd.
pub fn checkerboard_80x24() -> Vec<u8> {
    let indexes: Vec<u8> = (0..24u32)
        .flat_map(|y| (0..80u32).map(move |x| ((x + y) % 2) as u8))
        .collect();
    bmp_8bit(80, 24, &[Pixel::BLACK, Pixel::WHITE], &indexes)
}
