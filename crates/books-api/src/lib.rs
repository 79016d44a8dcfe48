//! Rakuten Books API client.
//!
//! This library provides typed search endpoints with request pacing,
//! plus the `SearchBooks` capability consumed by release detection.

pub mod client;
pub mod rate_limiter;
pub mod types;

pub use client::{ApiError, RakutenClient};
pub use rate_limiter::RateLimiter;
pub use types::{BookInfo, BooksResponse};

use std::future::Future;

/// Search capability: candidate books for a series title, newest first.
///
/// Implementations return at most `hits` results sorted by descending
/// release date. Injected into the release detector so tests can supply
/// canned results.
pub trait SearchBooks {
    fn search_latest(
        &self,
        title: &str,
        hits: u32,
    ) -> impl Future<Output = Result<Vec<BookInfo>, ApiError>> + Send;
}

impl SearchBooks for RakutenClient {
    async fn search_latest(&self, title: &str, hits: u32) -> Result<Vec<BookInfo>, ApiError> {
        self.search_by_title(title, "-releaseDate", hits).await
    }
}
