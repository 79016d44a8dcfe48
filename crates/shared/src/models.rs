//! Data models for the manga catalog.

use serde::{Deserialize, Serialize};

/// A single owned book, keyed by ISBN.
///
/// `volume` is the number extracted from `title` at registration time;
/// 0 means unknown. A record without a series name is standalone and is
/// not tracked for releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MangaRecord {
    pub isbn: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(default)]
    pub volume: u32,
    pub publisher: String,
    /// Source-provided format, passed through verbatim.
    pub publish_date: String,
    /// Purchase URL.
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl MangaRecord {
    /// Series this record is tracked under, if any. An empty series name
    /// counts as standalone.
    pub fn tracked_series(&self) -> Option<&str> {
        self.series.as_deref().filter(|s| !s.is_empty())
    }
}
