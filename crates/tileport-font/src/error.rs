//! Error type for opening fonts and drawing text.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    /// Neither the registered fonts nor the host font database know the
    /// requested family.
    #[error("font family {family:?} is not available")]
    Open { family: String },

    /// The bytes registered for a family are not a usable font.
    #[error("font data for {family:?} could not be parsed")]
    InvalidFont { family: String },

    /// A font file could not be read.
    #[error("cannot read font file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backend cannot draw with the requested feature or colours.
    #[error("{0} drawing is not supported by this font backend")]
    Unsupported(&'static str),

    /// A drawing surface of the given size could not be created.
    #[error("cannot allocate a {width}x{height} drawing surface")]
    Canvas { width: u32, height: u32 },
}
