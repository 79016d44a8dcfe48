//! Books search client with request pacing.

use crate::rate_limiter::RateLimiter;
use crate::types::{BookInfo, BooksResponse};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure of a search request.
///
/// Callers running a detection pass treat every variant as
/// "skip this series, continue".
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response body not read.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint rejected the request.
    #[error("unexpected status {0}")]
    Status(StatusCode),

    /// The response body was not the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The query matched nothing.
    #[error("no results for {0}")]
    NotFound(String),
}

/// Rakuten Books search API client
pub struct RakutenClient {
    /// HTTP client
    client: Client,
    /// Search endpoint URL
    base_url: String,
    /// Application ID sent with every request
    application_id: String,
    /// Request pacer
    rate_limiter: RateLimiter,
}

impl RakutenClient {
    /// Create a new client
    pub fn new(
        base_url: String,
        application_id: String,
        requests_per_second: f64,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("manga-tracker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            application_id,
            rate_limiter: RateLimiter::new(requests_per_second),
        })
    }

    /// Make a paced GET request against the search endpoint
    async fn get(&self, query: &[(&str, &str)]) -> Result<BooksResponse, ApiError> {
        self.rate_limiter.acquire().await;

        debug!(url = %self.base_url, "Sending search request");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("applicationId", self.application_id.as_str()),
                ("formatVersion", "2"),
            ])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Search request rejected");
            return Err(ApiError::Status(status));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Look up a single book by its ISBN (or JAN) code
    pub async fn search_by_isbn(&self, isbn: &str) -> Result<BookInfo, ApiError> {
        let response = self.get(&[("isbnjan", isbn)]).await?;
        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(isbn.to_string()))
    }

    /// Search books by title with a sort order and bounded result count
    pub async fn search_by_title(
        &self,
        title: &str,
        sort: &str,
        hits: u32,
    ) -> Result<Vec<BookInfo>, ApiError> {
        let hits_param = hits.to_string();
        let response = self
            .get(&[("title", title), ("sort", sort), ("hits", hits_param.as_str())])
            .await?;
        Ok(response.items)
    }
}
