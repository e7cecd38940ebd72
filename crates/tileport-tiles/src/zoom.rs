//! Map cell geometry under the different zoom modes.
//!
//! The map is a fixed [`MAP_COLUMNS`] x [`MAP_ROWS`] grid. The zoom mode
//! decides how big one cell is for a given window, and that cell size is
//! what tiles get rescaled to.

use tileport_core::{Point, Size};

/// Map grid width in cells.
pub const MAP_COLUMNS: u32 = 80;
/// Map grid height in cells.
pub const MAP_ROWS: u32 = 21;

/// How map cells are sized relative to the window.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoomMode {
    /// Cells at the tileset's native size.
    #[default]
    Normal,
    /// Stretch the grid over the whole window, ignoring aspect.
    Fullscreen,
    /// Fit the grid to the window width, keeping the tile aspect.
    Horizontal,
    /// Fit the grid to the window height, keeping the tile aspect.
    Vertical,
}

impl ZoomMode {
    /// The mode after this one in the zoom cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::Fullscreen,
            Self::Fullscreen => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Normal,
        }
    }

    /// Short user-facing label, shown when the mode changes.
    pub fn description(self) -> &'static str {
        match self {
            Self::Normal => "Tileset 1:1",
            Self::Fullscreen => "Scale to screen",
            Self::Horizontal => "Fit horizontally",
            Self::Vertical => "Fit vertically",
        }
    }

    /// Cell size for a map drawn in `window` with tiles of `native` size.
    ///
    /// Every dimension is at least 1, so the result is always a valid
    /// rescale target.
    pub fn cell_size(self, native: Size, window: Size) -> Size {
        let native = native.at_least_one();
        let cell = match self {
            Self::Normal => native,
            Self::Fullscreen => Size::new(window.width / MAP_COLUMNS, window.height / MAP_ROWS),
            Self::Horizontal => {
                let w = window.width / MAP_COLUMNS;
                Size::new(w, scale(w, native.height, native.width))
            }
            Self::Vertical => {
                let h = window.height / MAP_ROWS;
                Size::new(scale(h, native.width, native.height), h)
            }
        };
        cell.at_least_one()
    }
}

/// `v * num / den` without intermediate overflow.
#[inline]
fn scale(v: u32, num: u32, den: u32) -> u32 {
    (v as u64 * num as u64 / den as u64).min(u32::MAX as u64) as u32
}

/// Pixel size of the whole map grid at `cell` size.
pub fn map_size(cell: Size) -> Size {
    Size::new(
        cell.width.saturating_mul(MAP_COLUMNS),
        cell.height.saturating_mul(MAP_ROWS),
    )
}

/// The map cell under pixel `pos`, where `pos` is relative to the map's
/// top-left corner. `None` outside the grid.
pub fn cell_at(pos: Point, cell: Size) -> Option<Point> {
    if pos.x < 0 || pos.y < 0 || cell.is_empty() {
        return None;
    }
    let x = pos.x as u32 / cell.width;
    let y = pos.y as u32 / cell.height;
    (x < MAP_COLUMNS && y < MAP_ROWS).then(|| Point::new(x as i32, y as i32))
}
