//! Family lookup in the host font database.
//!
//! On fontconfig platforms a family name is matched the way the desktop
//! text stack would match it. fontconfig always answers with *some* font,
//! so a match only counts when the face it picked carries the requested
//! family name, or when a generic alias such as `monospace` was asked for.
//! Elsewhere nothing resolves and callers register font data themselves.

use std::path::{Path, PathBuf};

/// A face found in the host font database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemFont {
    /// Family name as the database spells it.
    pub family: String,
    pub path: PathBuf,
    /// Face index inside a font collection file.
    pub index: u32,
}

const GENERIC_FAMILIES: [&str; 5] = ["monospace", "mono", "sans-serif", "sans", "serif"];

fn is_generic(family: &str) -> bool {
    GENERIC_FAMILIES.iter().any(|g| g.eq_ignore_ascii_case(family))
}

/// Find the face the host would use for `family`.
pub fn find_family(family: &str) -> Option<SystemFont> {
    let family = family.trim();
    if family.is_empty() {
        return None;
    }
    imp::find_family(family)
}

/// Make every font under `dir` visible to [`find_family`] for the rest of
/// the process. Returns whether the database accepted the directory.
pub fn add_font_dir(dir: impl AsRef<Path>) -> bool {
    imp::add_font_dir(dir.as_ref())
}

#[cfg(all(unix, not(target_vendor = "apple")))]
mod imp {
    use std::ffi::{CStr, CString, OsStr, c_char, c_int};
    use std::os::unix::ffi::OsStrExt;
    use std::path::{Path, PathBuf};
    use std::ptr;
    use std::sync::Mutex;

    use fontconfig_sys::constants::{FC_FAMILY, FC_FILE, FC_INDEX};
    use fontconfig_sys::{
        FcChar8, FcConfigAppFontAddDir, FcConfigSubstitute, FcDefaultSubstitute, FcFontMatch, FcMatchPattern,
        FcPattern, FcPatternAddString, FcPatternCreate, FcPatternDestroy, FcPatternGetInteger, FcPatternGetString,
        FcResult, FcResultMatch,
    };
    use log::{debug, trace, warn};

    use super::{SystemFont, is_generic};

    // The default configuration is shared; adding application fonts while
    // another thread matches is not safe.
    static FONTCONFIG: Mutex<()> = Mutex::new(());

    /// An owned fontconfig pattern.
    struct Pattern(*mut FcPattern);

    impl Drop for Pattern {
        fn drop(&mut self) {
            // SAFETY: the pointer is non-null, came from fontconfig and is
            // destroyed exactly once.
            unsafe { FcPatternDestroy(self.0) }
        }
    }

    impl Pattern {
        fn string(&self, object: *const c_char, n: c_int) -> Option<&CStr> {
            let mut value: *mut FcChar8 = ptr::null_mut();
            // SAFETY: `value` points into the pattern, which outlives the
            // returned borrow.
            unsafe {
                let res: FcResult = FcPatternGetString(self.0, object, n, &mut value);
                if res != FcResultMatch || value.is_null() {
                    return None;
                }
                Some(CStr::from_ptr(value.cast_const().cast()))
            }
        }

        fn integer(&self, object: *const c_char) -> Option<c_int> {
            let mut value: c_int = 0;
            // SAFETY: plain out-parameter read from a live pattern.
            let res: FcResult = unsafe { FcPatternGetInteger(self.0, object, 0, &mut value) };
            (res == FcResultMatch).then_some(value)
        }

        fn families(&self) -> impl Iterator<Item = String> + '_ {
            (0..)
                .map_while(|n| self.string(FC_FAMILY.as_ptr().cast(), n))
                .map(|s| s.to_string_lossy().into_owned())
        }
    }

    pub(super) fn find_family(family: &str) -> Option<SystemFont> {
        let name = CString::new(family).ok()?;
        let _guard = FONTCONFIG.lock().unwrap_or_else(|e| e.into_inner());

        // SAFETY: every pattern is owned by a `Pattern` and freed on drop;
        // a null config selects fontconfig's current default.
        let matched = unsafe {
            let raw = FcPatternCreate();
            if raw.is_null() {
                warn!("FcPatternCreate failed looking up {family:?}");
                return None;
            }
            let pattern = Pattern(raw);
            FcPatternAddString(pattern.0, FC_FAMILY.as_ptr().cast(), name.as_ptr().cast());
            FcConfigSubstitute(ptr::null_mut(), pattern.0, FcMatchPattern);
            FcDefaultSubstitute(pattern.0);

            let mut result: FcResult = FcResultMatch;
            let raw = FcFontMatch(ptr::null_mut(), pattern.0, &mut result);
            if raw.is_null() {
                trace!("fontconfig has no match for {family:?}");
                return None;
            }
            Pattern(raw)
        };

        let names: Vec<String> = matched.families().collect();
        let found = if is_generic(family) {
            names.first().cloned()
        } else {
            names.into_iter().find(|n| n.eq_ignore_ascii_case(family))
        };
        let Some(found) = found else {
            trace!("fontconfig substituted another family for {family:?}");
            return None;
        };

        let path = PathBuf::from(OsStr::from_bytes(matched.string(FC_FILE.as_ptr().cast(), 0)?.to_bytes()));
        let index = matched.integer(FC_INDEX.as_ptr().cast()).unwrap_or(0).max(0) as u32;
        debug!("fontconfig resolved {family:?} to {} (face {index})", path.display());
        Some(SystemFont {
            family: found,
            path,
            index,
        })
    }

    pub(super) fn add_font_dir(dir: &Path) -> bool {
        let Ok(c_dir) = CString::new(dir.as_os_str().as_bytes()) else {
            return false;
        };
        let _guard = FONTCONFIG.lock().unwrap_or_else(|e| e.into_inner());
        // SAFETY: `c_dir` is a valid C string for the duration of the call.
        let added = unsafe { FcConfigAppFontAddDir(ptr::null_mut(), c_dir.as_ptr().cast()) } != 0;
        if !added {
            warn!("fontconfig rejected font directory {}", dir.display());
        }
        added
    }
}

#[cfg(not(all(unix, not(target_vendor = "apple"))))]
mod imp {
    use std::path::Path;

    use super::SystemFont;

    pub(super) fn find_family(_family: &str) -> Option<SystemFont> {
        None
    }

    pub(super) fn add_font_dir(_dir: &Path) -> bool {
        false
    }
}
