//! Resolving family names to font data.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::canvas::CanvasFont;
use crate::config::FontConfig;
use crate::error::FontError;
use crate::fontdue_::FontdueFont;
use crate::glyph::GlyphFont;
use crate::renderer::FontRenderer;
use crate::rusttype_::RusttypeFont;
use crate::system;

/// Which rasterizer opens a font.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontBackend {
    #[default]
    Fontdue,
    Rusttype,
    Canvas,
}

/// Resolves family names to font data. Lookups ignore ASCII case.
///
/// Families registered with [`insert`](Self::insert) or
/// [`load_file`](Self::load_file) win; anything else is looked up in the
/// host font database. A family found in neither fails with
/// [`FontError::Open`]; no other family is substituted.
#[derive(Clone, Debug)]
pub struct FontLibrary {
    fonts: HashMap<String, Vec<u8>>,
    system: bool,
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

fn key(family: &str) -> String {
    family.trim().to_ascii_lowercase()
}

impl FontLibrary {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
            system: true,
        }
    }

    /// A library that only knows the fonts registered with it.
    pub fn without_system_fonts() -> Self {
        Self {
            system: false,
            ..Self::new()
        }
    }

    /// Register `bytes` under `family`, replacing earlier data.
    pub fn insert(&mut self, family: &str, bytes: Vec<u8>) {
        self.fonts.insert(key(family), bytes);
    }

    /// Read a font file and register it under `family`.
    pub fn load_file(&mut self, family: &str, path: impl AsRef<Path>) -> Result<(), FontError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("registered font {family:?} from {}", path.display());
        self.insert(family, bytes);
        Ok(())
    }

    pub fn contains(&self, family: &str) -> bool {
        self.fonts.contains_key(&key(family))
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// The data registered for `family`. The host database is not consulted.
    pub fn bytes(&self, family: &str) -> Result<&[u8], FontError> {
        self.fonts
            .get(&key(family))
            .map(Vec::as_slice)
            .ok_or_else(|| FontError::Open {
                family: family.to_string(),
            })
    }

    /// Font data and face index for `family`, registered data first.
    pub fn resolve(&self, family: &str) -> Result<(Cow<'_, [u8]>, u32), FontError> {
        if let Some(bytes) = self.fonts.get(&key(family)) {
            return Ok((Cow::Borrowed(bytes.as_slice()), 0));
        }
        let open_error = || FontError::Open {
            family: family.to_string(),
        };
        if !self.system {
            return Err(open_error());
        }
        let found = system::find_family(family).ok_or_else(open_error)?;
        let bytes = fs::read(&found.path).map_err(|source| FontError::Io {
            path: found.path.clone(),
            source,
        })?;
        debug!("resolved {family:?} to {} from the host fonts", found.family);
        Ok((Cow::Owned(bytes), found.index))
    }

    /// Open the configured family with `backend`.
    pub fn open(&self, config: &FontConfig, backend: FontBackend) -> Result<Box<dyn GlyphFont>, FontError> {
        let (bytes, index) = self.resolve(&config.family)?;
        let px = config.pixel_size();
        let family = config.family.as_str();
        let font: Box<dyn GlyphFont> = match backend {
            FontBackend::Fontdue => Box::new(FontdueFont::from_collection(family, &bytes, index, px)?),
            FontBackend::Rusttype => Box::new(RusttypeFont::from_collection(family, &bytes, index, px)?),
            FontBackend::Canvas => Box::new(CanvasFont::from_collection(family, &bytes, index, px)?),
        };
        debug!("opened {family:?} at {px}px with {backend:?}");
        Ok(font)
    }

    /// [`open`](Self::open) wrapped in a [`FontRenderer`].
    pub fn renderer(
        &self,
        config: &FontConfig,
        backend: FontBackend,
    ) -> Result<FontRenderer<Box<dyn GlyphFont>>, FontError> {
        self.open(config, backend).map(FontRenderer::new)
    }
}
