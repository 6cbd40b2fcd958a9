// src/services/fetcher.rs

//! Search page fetcher.
//!
//! Issues one GET per query against the platform's results path and throttles
//! every call through a shared [`RateLimiter`]. There is no retry: a failed
//! request is reported once and the caller moves on.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::ScraperConfig;
use crate::services::RateLimiter;
use crate::utils::http;

/// Path of the platform's search results page.
const RESULTS_PATH: &str = "/results";

/// Source of raw search result pages.
#[async_trait]
pub trait SearchFetcher: Send + Sync {
    /// Fetch the raw body for one query.
    ///
    /// `hint_count` is the number of kept records the caller hopes to get
    /// from this page.
    async fn fetch(&self, query: &str, hint_count: usize) -> Result<String>;
}

/// Fetcher backed by the public search page.
pub struct PlatformFetcher {
    client: Client,
    results_url: Url,
    sort_filter: String,
    limiter: Arc<RateLimiter>,
}

impl PlatformFetcher {
    /// Create a fetcher with its own rate limiter.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let limiter = Arc::new(RateLimiter::from_millis(config.request_delay_ms));
        Self::with_limiter(config, limiter)
    }

    /// Create a fetcher sharing an existing rate limiter.
    pub fn with_limiter(config: &ScraperConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        let results_url = Url::parse(&config.base_url)?.join(RESULTS_PATH)?;
        Ok(Self {
            client: http::create_client(config)?,
            results_url,
            sort_filter: config.sort_filter.clone(),
            limiter,
        })
    }

    /// Build the results URL for a query.
    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.results_url.clone();
        url.query_pairs_mut()
            .append_pair("search_query", query)
            .append_pair("sp", &self.sort_filter);
        url
    }

    async fn request(&self, query: &str) -> Result<String> {
        let response = self
            .client
            .get(self.search_url(query))
            .send()
            .await
            .map_err(|e| AppError::fetch(query, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(query, format!("HTTP {status}")));
        }

        response.text().await.map_err(|e| AppError::fetch(query, e))
    }
}

#[async_trait]
impl SearchFetcher for PlatformFetcher {
    async fn fetch(&self, query: &str, hint_count: usize) -> Result<String> {
        self.limiter.acquire().await;
        log::debug!("Searching '{}' (want {})", query, hint_count);

        let result = self.request(query).await;
        self.limiter.complete().await;
        result
    }
}
