//! Error type for tileset loading.

use thiserror::Error;

use crate::decode::ImageFormat;

/// Why a tileset could not be loaded.
///
/// Any of these aborts loading as a unit; callers fall back to text-only
/// map rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TilesetError {
    /// The file could not be read, or its leading bytes match none of the
    /// supported formats.
    #[error("unrecognized or unreadable tileset image")]
    UnknownFormat,

    /// The file has a recognized signature but its contents are corrupt,
    /// truncated or use an unsupported variant of the format.
    #[error("malformed {format} tileset: {reason}")]
    Decode { format: ImageFormat, reason: String },

    /// The backend requires indexed colour and the image has more than 256
    /// distinct colours.
    #[error("tileset has more than 256 colors and the display needs a palette")]
    PaletteRequired,

    /// The effective tile width or height is zero.
    #[error("invalid tile size {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },
}

impl TilesetError {
    pub(crate) fn decode(format: ImageFormat, reason: impl Into<String>) -> Self {
        Self::Decode {
            format,
            reason: reason.into(),
        }
    }
}
