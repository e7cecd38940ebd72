//! Integer-ratio tile resampling.

use tileport_core::{IndexBuffer, Pixel, PixelBuffer, Size, Tile};

/// Greatest common divisor. `gcd(a, 0) == a`.
fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Reduced resize ratio along one axis: `inp` source pixels map onto `out`
/// output pixels, with `inp / out == source / target` in lowest terms.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Ratio {
    inp: u32,
    out: u32,
}

impl Ratio {
    fn new(source: u32, target: u32) -> Self {
        let d = gcd(target, source);
        Self {
            inp: source / d,
            out: target / d,
        }
    }

    /// Source coordinate of the `step`-th sample for output coordinate `o`.
    #[inline]
    fn sample(self, o: u32, step: u32) -> u32 {
        ((o as u64 * self.inp as u64 + step as u64) / self.out as u64) as u32
    }
}

/// Resample `tile` to `size` with an exact box filter.
///
/// Each output pixel is the truncated channel-wise mean of the `inp_x *
/// inp_y` source samples under it, where the per-axis ratio is reduced by
/// its GCD. Integer scale factors therefore reproduce source pixels
/// exactly, and downscales average whole blocks.
///
/// Palette indices cannot be averaged, so an index buffer is resampled by
/// nearest neighbour; its colours may differ from the blended pixels.
///
/// Rescaling an empty tile to a non-empty size gives an opaque black tile.
pub fn rescale(tile: &Tile, size: Size) -> Tile {
    if size.is_empty() {
        return Tile {
            pixels: PixelBuffer::filled(size.width, size.height, Pixel::BLACK),
            indexes: tile.indexes.as_ref().map(|_| IndexBuffer::filled(size.width, size.height, 0)),
        };
    }
    if tile.size().is_empty() {
        return Tile::blank(size, tile.is_indexed());
    }
    if tile.size() == size {
        return tile.clone();
    }

    let src = &tile.pixels;
    let rx = Ratio::new(src.width(), size.width);
    let ry = Ratio::new(src.height(), size.height);
    let divisor = rx.inp as u64 * ry.inp as u64;
    let channels = src.as_slice();
    let src_width = src.width() as usize;

    let mut pixels = Vec::with_capacity(size.area());
    for y_out in 0..size.height {
        for x_out in 0..size.width {
            let mut sum = [0u64; 4];
            for dy in 0..ry.inp {
                let row = ry.sample(y_out, dy) as usize * src_width;
                for dx in 0..rx.inp {
                    let p = channels[row + rx.sample(x_out, dx) as usize];
                    sum[0] += p.r as u64;
                    sum[1] += p.g as u64;
                    sum[2] += p.b as u64;
                    sum[3] += p.a as u64;
                }
            }
            pixels.push(Pixel::rgba(
                (sum[0] / divisor) as u8,
                (sum[1] / divisor) as u8,
                (sum[2] / divisor) as u8,
                (sum[3] / divisor) as u8,
            ));
        }
    }

    let indexes = tile.indexes.as_ref().map(|idx| {
        let data = (0..size.height)
            .flat_map(|y_out| (0..size.width).map(move |x_out| (x_out, y_out)))
            .map(|(x_out, y_out)| {
                idx.get(rx.sample(x_out, 0), ry.sample(y_out, 0)).unwrap_or(0)
            })
            .collect();
        IndexBuffer::from_vec(size.width, size.height, data).unwrap_or_default()
    });

    Tile {
        pixels: PixelBuffer::from_vec(size.width, size.height, pixels).unwrap_or_default(),
        indexes,
    }
}
