//! Label canonicalization and the cross-dataset name index.
//!
//! Boundary files and tabular records spell the same area differently (casing,
//! diacritics, stray spaces). Every join in the crate goes through [`normalize_key`]
//! and [`NameIndex`].

mod index;

pub use index::{IndexMatch, NameIndex};

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Canonical join key for a free-text label.
///
/// Lowercases, decomposes (NFD) and drops combining marks, squashes whitespace runs to
/// a single space and trims.
pub fn normalize_key(label: &str) -> String {
    let stripped: String = label
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}
