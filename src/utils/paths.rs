//! Output file naming
//!
//! Dump files are named after their input. Names are reduced to an ASCII-safe
//! stem so they survive every filesystem and the `apoc.cypher.runFiles` call
//! that loads them. Graph identifiers do not go through here (see [`super::ids`]).

use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// ASCII-safe stem of `path`.
///
/// Strips a trailing slash, the directory components and the last extension,
/// decomposes accented characters and drops what is left outside ASCII, then
/// replaces anything outside `[A-Za-z0-9_.-]` with `_`.
pub fn safe_basename(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    let stem = Path::new(trimmed)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    stem.nfkd()
        .filter(char::is_ascii)
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
