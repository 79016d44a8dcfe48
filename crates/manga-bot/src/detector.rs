//! Release detection across tracked series.
//!
//! One pass lists the catalog, groups owned records by series, and asks
//! the search capability whether a newer numbered volume exists for each
//! series.

use books_api::{BookInfo, SearchBooks};
use shared::{Catalog, CatalogError, MangaRecord};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Result page size for per-series searches.
const SEARCH_HITS: u32 = 30;

/// A newly discovered volume for a tracked series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelease {
    pub series_title: String,
    pub previous_volume: u32,
    pub new_volume: u32,
    pub author: String,
    pub isbn: String,
    pub sales_date: String,
    pub url: String,
}

/// Release detector over a catalog and a search capability
pub struct ReleaseDetector<'a> {
    catalog: &'a Catalog,
}

impl<'a> ReleaseDetector<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Run one detection pass over every tracked series.
    ///
    /// Fails only when listing the catalog fails; a search failure for a
    /// single series is logged and that series skipped so one bad series
    /// cannot block detection for the others.
    pub async fn check_new_releases<S: SearchBooks>(
        &self,
        search: &S,
    ) -> Result<Vec<NewRelease>, CatalogError> {
        let all = self.catalog.list()?;

        // Standalone records never participate in release detection.
        let mut by_series: BTreeMap<&str, Vec<&MangaRecord>> = BTreeMap::new();
        for record in &all {
            if let Some(series) = record.tracked_series() {
                by_series.entry(series).or_default().push(record);
            }
        }

        let mut releases = Vec::new();

        for (series, owned) in &by_series {
            let current_latest = owned.iter().map(|r| r.volume).max().unwrap_or(0);
            if current_latest == 0 {
                debug!(series = %series, "No numbered volume on file, skipping");
                continue;
            }

            let candidates = match search.search_latest(series, SEARCH_HITS).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(series = %series, error = %e, "Search failed, skipping series");
                    continue;
                }
            };

            let Some((volume, book)) = latest_numbered(&candidates) else {
                debug!(series = %series, "No numbered candidates");
                continue;
            };

            if volume > current_latest {
                info!(
                    series = %series,
                    previous = current_latest,
                    new = volume,
                    "New volume discovered"
                );
                releases.push(NewRelease {
                    series_title: (*series).to_string(),
                    previous_volume: current_latest,
                    new_volume: volume,
                    author: book.author.clone(),
                    isbn: book.isbn.clone(),
                    sales_date: book.sales_date.clone(),
                    url: book.item_url.clone(),
                });
            }
        }

        Ok(releases)
    }
}

/// Highest numbered volume among candidates. On ties the earliest
/// candidate wins: only a strictly greater volume replaces the running
/// maximum.
fn latest_numbered(candidates: &[BookInfo]) -> Option<(u32, &BookInfo)> {
    let mut best: Option<(u32, &BookInfo)> = None;
    for book in candidates {
        let parsed = shared::volume::extract(&book.title);
        if parsed.has_volume && best.map_or(true, |(v, _)| parsed.volume > v) {
            best = Some((parsed.volume, book));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use books_api::ApiError;
    use shared::Store;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct FakeSearch {
        results: HashMap<String, Vec<BookInfo>>,
        failing: Vec<String>,
    }

    impl FakeSearch {
        fn new() -> Self {
            Self {
                results: HashMap::new(),
                failing: Vec::new(),
            }
        }

        fn with(mut self, series: &str, candidates: Vec<BookInfo>) -> Self {
            self.results.insert(series.to_string(), candidates);
            self
        }

        fn failing_on(mut self, series: &str) -> Self {
            self.failing.push(series.to_string());
            self
        }
    }

    impl SearchBooks for FakeSearch {
        async fn search_latest(
            &self,
            title: &str,
            _hits: u32,
        ) -> Result<Vec<BookInfo>, ApiError> {
            if self.failing.iter().any(|t| t == title) {
                return Err(ApiError::NotFound(title.to_string()));
            }
            Ok(self.results.get(title).cloned().unwrap_or_default())
        }
    }

    fn book(title: &str, isbn: &str) -> BookInfo {
        BookInfo {
            title: title.to_string(),
            author: "龍幸伸".to_string(),
            publisher: "集英社".to_string(),
            isbn: isbn.to_string(),
            sales_date: "2024年06月04日".to_string(),
            item_url: format!("https://books.example/{isbn}"),
        }
    }

    fn owned(isbn: &str, series: &str, volume: u32) -> MangaRecord {
        MangaRecord {
            isbn: isbn.to_string(),
            title: format!("{series} {volume}"),
            author: "龍幸伸".to_string(),
            series: Some(series.to_string()),
            volume,
            publisher: "集英社".to_string(),
            publish_date: "2023年01月04日".to_string(),
            url: String::new(),
            tags: Vec::new(),
        }
    }

    fn catalog_with(records: &[MangaRecord]) -> (TempDir, Catalog) {
        let dir = TempDir::new().expect("temp dir");
        let store = Store::open(dir.path().join("catalog.db")).expect("open store");
        let catalog = Catalog::new(store);
        for record in records {
            catalog.register(record).expect("register record");
        }
        (dir, catalog)
    }

    #[tokio::test]
    async fn emits_event_for_newer_volume() {
        let (_dir, catalog) = catalog_with(&[
            owned("101", "ダンダダン", 1),
            owned("102", "ダンダダン", 2),
            owned("103", "ダンダダン", 3),
        ]);
        let search = FakeSearch::new().with(
            "ダンダダン",
            vec![
                book("ダンダダン 公式ファンブック", "900"),
                book("ダンダダン 4", "104"),
            ],
        );

        let detector = ReleaseDetector::new(&catalog);
        let releases = detector.check_new_releases(&search).await.unwrap();

        assert_eq!(releases.len(), 1);
        let release = &releases[0];
        assert_eq!(release.series_title, "ダンダダン");
        assert_eq!(release.previous_volume, 3);
        assert_eq!(release.new_volume, 4);
        assert_eq!(release.isbn, "104");
    }

    #[tokio::test]
    async fn no_event_when_nothing_newer() {
        let (_dir, catalog) = catalog_with(&[owned("103", "ダンダダン", 3)]);
        let search = FakeSearch::new().with(
            "ダンダダン",
            vec![book("ダンダダン 3", "103"), book("ダンダダン 2", "102")],
        );

        let detector = ReleaseDetector::new(&catalog);
        let releases = detector.check_new_releases(&search).await.unwrap();

        assert!(releases.is_empty());
    }

    #[tokio::test]
    async fn tie_break_keeps_first_seen_candidate() {
        let (_dir, catalog) = catalog_with(&[owned("103", "ダンダダン", 3)]);
        let search = FakeSearch::new().with(
            "ダンダダン",
            vec![
                book("ダンダダン 4", "first"),
                book("ダンダダン 4", "second"),
            ],
        );

        let detector = ReleaseDetector::new(&catalog);
        let releases = detector.check_new_releases(&search).await.unwrap();

        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].isbn, "first");
    }

    #[tokio::test]
    async fn volume_comparison_is_numeric() {
        let (_dir, catalog) = catalog_with(&[owned("109", "チェンソーマン", 9)]);
        let search = FakeSearch::new().with(
            "チェンソーマン",
            vec![book("チェンソーマン 10", "110")],
        );

        let detector = ReleaseDetector::new(&catalog);
        let releases = detector.check_new_releases(&search).await.unwrap();

        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].new_volume, 10);
    }

    #[tokio::test]
    async fn series_without_local_volume_is_skipped() {
        let (_dir, catalog) = catalog_with(&[owned("900", "設定資料だけの作品", 0)]);
        let search = FakeSearch::new().with(
            "設定資料だけの作品",
            vec![book("設定資料だけの作品 5", "905")],
        );

        let detector = ReleaseDetector::new(&catalog);
        let releases = detector.check_new_releases(&search).await.unwrap();

        assert!(releases.is_empty());
    }

    #[tokio::test]
    async fn standalone_records_are_ignored() {
        let mut single = owned("500", "", 1);
        single.series = None;
        let (_dir, catalog) = catalog_with(&[single]);
        let search = FakeSearch::new();

        let detector = ReleaseDetector::new(&catalog);
        let releases = detector.check_new_releases(&search).await.unwrap();

        assert!(releases.is_empty());
    }

    #[tokio::test]
    async fn failed_series_does_not_block_others() {
        let (_dir, catalog) = catalog_with(&[
            owned("103", "ダンダダン", 3),
            owned("201", "ワンピース", 1),
        ]);
        let search = FakeSearch::new()
            .failing_on("ダンダダン")
            .with("ワンピース", vec![book("ワンピース 2", "202")]);

        let detector = ReleaseDetector::new(&catalog);
        let releases = detector.check_new_releases(&search).await.unwrap();

        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].series_title, "ワンピース");
    }

    #[tokio::test]
    async fn unnumbered_candidates_never_trigger() {
        let (_dir, catalog) = catalog_with(&[owned("103", "ダンダダン", 3)]);
        let search = FakeSearch::new().with(
            "ダンダダン",
            vec![
                book("ダンダダン 完全版", "901"),
                book("ダンダダン", "902"),
            ],
        );

        let detector = ReleaseDetector::new(&catalog);
        let releases = detector.check_new_releases(&search).await.unwrap();

        assert!(releases.is_empty());
    }
}
