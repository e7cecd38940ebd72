//! Tileset configuration.

use std::path::{Path, PathBuf};

use crate::decode::DecodeOptions;

/// Tileset file used when none is configured.
pub const DEFAULT_TILE_FILE: &str = "nhtiles.bmp";

/// Configuration for loading a tileset.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TilesetConfig {
    /// Path of the tileset image. Empty means [`DEFAULT_TILE_FILE`].
    pub tile_file: PathBuf,
    /// Whether the display can draw direct colour.
    pub true_color: bool,
    /// Tile width in pixels; 0 = derive from the image width.
    pub tile_width: u32,
    /// Tile height in pixels; 0 = same as the tile width.
    pub tile_height: u32,
}

impl Default for TilesetConfig {
    fn default() -> Self {
        Self {
            tile_file: PathBuf::from(DEFAULT_TILE_FILE),
            true_color: true,
            tile_width: 0,
            tile_height: 0,
        }
    }
}

impl TilesetConfig {
    /// Path to load, with the default substituted for an empty one.
    pub fn resolved_path(&self) -> &Path {
        if self.tile_file.as_os_str().is_empty() {
            Path::new(DEFAULT_TILE_FILE)
        } else {
            &self.tile_file
        }
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            allow_true_color: self.true_color,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_resolves_to_default() {
        let cfg = TilesetConfig {
            tile_file: PathBuf::new(),
            ..Default::default()
        };
        assert_eq!(cfg.resolved_path(), Path::new(DEFAULT_TILE_FILE));
    }

    #[test]
    fn decode_options_mirror_config() {
        let cfg = TilesetConfig {
            true_color: false,
            tile_width: 16,
            tile_height: 24,
            ..Default::default()
        };
        let opts = cfg.decode_options();
        assert!(!opts.allow_true_color);
        assert_eq!((opts.tile_width, opts.tile_height), (16, 24));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_uses_defaults() {
        let cfg: TilesetConfig = serde_json::from_str(r#"{"tile_width": 32}"#).unwrap();
        assert_eq!(cfg.tile_width, 32);
        assert_eq!(cfg.tile_file, PathBuf::from(DEFAULT_TILE_FILE));
        assert!(cfg.true_color);
    }
}
