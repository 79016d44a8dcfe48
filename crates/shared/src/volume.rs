//! Volume-number extraction from book titles.
//!
//! Serialized volumes in the catalog's title strings follow the
//! "base title, whitespace, trailing digits" convention. Special
//! editions (guides, art books, deluxe reprints) are recognized by a
//! keyword table and excluded from volume tracking entirely.

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker substrings identifying special editions. A title containing
/// one of these is never a numbered series volume, even when it ends in
/// digits (a year, a print run).
const SPECIAL_EDITION_MARKERS: &[&str] = &[
    "ダイズカン",
    "ガイド",
    "ファンブック",
    "イラスト集",
    "公式ブック",
    "設定資料集",
    "カラー版",
    "完全版",
    "総編集",
    "愛蔵版",
];

/// Trailing volume number: whitespace followed by digits at the end.
static VOLUME_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+(\d+)$").expect("volume suffix pattern is valid"));

/// Volume information extracted from a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    /// Base title, with the volume suffix stripped when one was found.
    pub title: String,
    /// Extracted volume number; meaningful only when `has_volume`.
    pub volume: u32,
    pub has_volume: bool,
    /// Special editions never carry a volume number.
    pub is_special: bool,
}

/// Extracts volume information from a raw title.
///
/// Total: always returns a value, worst case an unnumbered, non-special
/// title. The special-edition test runs first because such titles can
/// also end in digits that are not volume numbers.
pub fn extract(title: &str) -> VolumeInfo {
    if SPECIAL_EDITION_MARKERS.iter().any(|m| title.contains(m)) {
        return VolumeInfo {
            title: title.to_string(),
            volume: 0,
            has_volume: false,
            is_special: true,
        };
    }

    if let Some(caps) = VOLUME_SUFFIX.captures(title) {
        if let Ok(volume) = caps[1].parse::<u32>() {
            let base = VOLUME_SUFFIX.replace(title, "");
            return VolumeInfo {
                title: base.trim().to_string(),
                volume,
                has_volume: true,
                is_special: false,
            };
        }
    }

    VolumeInfo {
        title: title.to_string(),
        volume: 0,
        has_volume: false,
        is_special: false,
    }
}

/// Normalizes a title for a series-wide search query.
///
/// Returns the base title when a volume number was detected, else the
/// title unchanged, so that searches are volume-agnostic.
pub fn normalize_for_search(title: &str) -> String {
    let info = extract(title);
    if info.has_volume {
        info.title
    } else {
        title.to_string()
    }
}

/// Whether a book should participate in series volume tracking: not a
/// special edition, and carrying a volume number.
pub fn should_track_as_volume(title: &str, _author: &str) -> bool {
    let info = extract(title);
    !info.is_special && info.has_volume
}
