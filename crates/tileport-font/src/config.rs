//! Font selection.

/// Family used for the map and for fixed-width windows.
pub const DEFAULT_MONO_FONT: &str = "DejaVu Sans Mono";
pub const DEFAULT_SERIF_FONT: &str = "DejaVu Serif";
pub const DEFAULT_SANS_FONT: &str = "DejaVu Sans";

/// Points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Which font to open and how big.
#[derive(Clone, Debug, PartialEq)]
pub struct FontConfig {
    pub family: String,
    /// Size in typographic points.
    pub point_size: f32,
    /// Display resolution used to turn points into pixels.
    pub dpi: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: DEFAULT_MONO_FONT.to_string(),
            point_size: 12.0,
            dpi: 96.0,
        }
    }
}

impl FontConfig {
    pub fn new(family: impl Into<String>, point_size: f32) -> Self {
        Self {
            family: family.into(),
            point_size,
            ..Default::default()
        }
    }

    /// Em size in pixels.
    #[inline]
    pub fn pixel_size(&self) -> f32 {
        self.point_size * self.dpi / POINTS_PER_INCH
    }
}
