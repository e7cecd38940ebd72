//! XPM3 decoding.
//!
//! An XPM file is C source: the image lives in the sequence of string
//! literals, in order. The first holds `width height ncolors cpp`, the
//! next `ncolors` define one colour each, and the remaining `height` are
//! pixel rows of `width * cpp` characters.

use std::collections::HashMap;

use tileport_core::{IndexBuffer, MAX_COLORS, Palette, Pixel, PixelBuffer};

use super::{ImageFormat, RawImage, check_dimensions};
use crate::error::TilesetError;

/// Colour-context keys, in order of preference. `s` (symbolic name) is
/// recognized only so it can be skipped.
const COLOR_KEYS: [&str; 4] = ["c", "g", "g4", "m"];
const ALL_KEYS: [&str; 5] = ["c", "g", "g4", "m", "s"];

fn err(reason: impl Into<String>) -> TilesetError {
    TilesetError::decode(ImageFormat::Xpm, reason)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<RawImage, TilesetError> {
    let text = String::from_utf8_lossy(bytes);
    let strings = string_literals(&text)?;
    let mut lines = strings.iter().map(String::as_str);

    let header = lines.next().ok_or_else(|| err("missing header"))?;
    let values = header
        .split_whitespace()
        .take(4)
        .map(str::parse::<u32>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| err(format!("bad header {header:?}")))?;
    let [width, height, ncolors, cpp] = values[..] else {
        return Err(err(format!("bad header {header:?}")));
    };
    if cpp == 0 {
        return Err(err("zero characters per pixel"));
    }
    check_dimensions(ImageFormat::Xpm, width, height)?;
    let cpp = cpp as usize;

    let mut colors = Vec::with_capacity(ncolors as usize);
    let mut codes: HashMap<&str, usize> = HashMap::with_capacity(ncolors as usize);
    for _ in 0..ncolors {
        let line = lines.next().ok_or_else(|| err("missing color definition"))?;
        let code = line.get(..cpp).ok_or_else(|| err(format!("short color line {line:?}")))?;
        let spec = &line[cpp..];
        codes.insert(code, colors.len());
        colors.push(parse_color_spec(spec)?);
    }

    let mut color_index = Vec::with_capacity(width as usize * height as usize);
    for _ in 0..height {
        let row = lines.next().ok_or_else(|| err("missing pixel row"))?;
        for x in 0..width as usize {
            let code = row
                .get(x * cpp..(x + 1) * cpp)
                .ok_or_else(|| err(format!("short pixel row {row:?}")))?;
            let i = *codes
                .get(code)
                .ok_or_else(|| err(format!("undefined pixel code {code:?}")))?;
            color_index.push(i);
        }
    }

    if colors.len() <= MAX_COLORS {
        let indexes = color_index.iter().map(|&i| i as u8).collect();
        let indexes = IndexBuffer::from_vec(width, height, indexes).ok_or_else(|| err("pixel count mismatch"))?;
        let palette = Palette::from_colors(colors).ok_or_else(|| err("too many colors"))?;
        RawImage::indexed(ImageFormat::Xpm, palette, indexes)
    } else {
        let pixels = color_index.iter().map(|&i| colors[i]).collect();
        let pixels = PixelBuffer::from_vec(width, height, pixels).ok_or_else(|| err("pixel count mismatch"))?;
        Ok(RawImage::true_color(pixels))
    }
}

/// Collect the contents of every C string literal, skipping comments.
fn string_literals(text: &str) -> Result<Vec<String>, TilesetError> {
    let mut out = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                loop {
                    match chars.next() {
                        Some('/') if prev == '*' => break,
                        Some(c) => prev = c,
                        None => return Err(err("unterminated comment")),
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '"' => {
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped) => s.push(escaped),
                            None => return Err(err("unterminated string")),
                        },
                        Some(c) => s.push(c),
                        None => return Err(err("unterminated string")),
                    }
                }
                out.push(s);
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Parse the part of a colour line after the pixel code, e.g.
/// `c #FF0000 m black s wall`.
fn parse_color_spec(spec: &str) -> Result<Pixel, TilesetError> {
    let mut contexts: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut current: Option<&str> = None;
    for token in spec.split_whitespace() {
        if let Some(&key) = ALL_KEYS.iter().find(|&&k| k == token) {
            current = Some(key);
            contexts.entry(key).or_default();
        } else if let Some(key) = current {
            contexts.entry(key).or_default().push(token);
        } else {
            return Err(err(format!("color value without key in {spec:?}")));
        }
    }

    let value = COLOR_KEYS
        .iter()
        .find_map(|k| contexts.get(k).filter(|v| !v.is_empty()))
        .map(|v| v.join(" "))
        .ok_or_else(|| err(format!("no usable color in {spec:?}")))?;
    parse_color(&value).ok_or_else(|| err(format!("unknown color {value:?}")))
}

/// Parse `None`, a `#` hex colour of 1 to 4 digits per channel, or an X11
/// colour name.
fn parse_color(value: &str) -> Option<Pixel> {
    if value.eq_ignore_ascii_case("none") {
        return Some(Pixel::TRANSPARENT);
    }
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    let name: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    named_color(&name)
}

fn parse_hex(hex: &str) -> Option<Pixel> {
    if !matches!(hex.len(), 3 | 6 | 9 | 12) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let n = hex.len() / 3;
    let channel = |i: usize| -> Option<u8> {
        let v = u16::from_str_radix(&hex[i * n..(i + 1) * n], 16).ok()?;
        Some(match n {
            1 => (v * 17) as u8,
            2 => v as u8,
            3 => (v >> 4) as u8,
            _ => (v >> 8) as u8,
        })
    };
    Some(Pixel::rgb(channel(0)?, channel(1)?, channel(2)?))
}

fn named_color(name: &str) -> Option<Pixel> {
    let (r, g, b) = match name {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" => (0, 255, 255),
        "magenta" => (255, 0, 255),
        "gray" | "grey" => (190, 190, 190),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "orange" => (255, 165, 0),
        "brown" => (165, 42, 42),
        "purple" => (160, 32, 240),
        "pink" => (255, 192, 203),
        "navy" | "navyblue" => (0, 0, 128),
        "maroon" => (176, 48, 96),
        "darkred" => (139, 0, 0),
        "darkgreen" => (0, 100, 0),
        "darkblue" => (0, 0, 139),
        _ => return None,
    };
    Some(Pixel::rgb(r, g, b))
}
