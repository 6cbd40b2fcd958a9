// src/pipeline/scrape.rs

//! Hazard video scraping pipeline.
//!
//! For every planned category the queries are fetched (bounded concurrency,
//! results kept in issue order), extracted, classified and finally merged by
//! the aggregator. A category is only published once all of its queries have
//! finished or failed.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{Config, ScraperConfig, SearchCategory, SearchResults, VideoRecord};
use crate::services::{
    Aggregator, CategoryPlan, Classifier, Extractor, LogObserver, PipelineEvent,
    PipelineObserver, PlatformFetcher, QueryPlanner, SearchFetcher,
};

/// Runs the fetch → extract → classify → aggregate pipeline.
pub struct HazardScraper {
    fetcher: Arc<dyn SearchFetcher>,
    extractor: Extractor,
    classifier: Classifier,
    planner: QueryPlanner,
    settings: ScraperConfig,
    observer: Arc<dyn PipelineObserver>,
}

impl HazardScraper {
    /// Build a scraper around any fetcher.
    pub fn new(config: &Config, fetcher: Arc<dyn SearchFetcher>) -> Result<Self> {
        Ok(Self {
            fetcher,
            extractor: Extractor::for_platform(&config.scraper.base_url)?,
            classifier: Classifier::new(&config.keywords),
            planner: QueryPlanner::from_config(config),
            settings: config.scraper.clone(),
            observer: Arc::new(LogObserver),
        })
    }

    /// Build a scraper that searches the live platform.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = PlatformFetcher::new(&config.scraper)?;
        Self::new(config, Arc::new(fetcher))
    }

    /// Replace the default log-backed observer.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Scrape every planned category with a per-category cap.
    pub async fn scrape_all(&self, cap: usize) -> SearchResults {
        let mut results = SearchResults::default();
        for plan in self.planner.plan() {
            let category = self.scrape_category(&plan, cap).await;
            results.push(category);
        }

        self.observer.on_event(&PipelineEvent::RunCompleted {
            categories: results.category_count(),
            total: results.total_videos(),
        });
        results
    }

    /// Scrape one (hazard, language) category.
    pub async fn scrape_category(&self, plan: &CategoryPlan, cap: usize) -> SearchCategory {
        let key = plan.key.to_string();
        let hint = self.settings.per_variant_hint(cap, plan.queries.len());
        let concurrency = self.settings.max_concurrent.max(1);

        self.observer.on_event(&PipelineEvent::CategoryStarted {
            key: key.clone(),
            queries: plan.queries.len(),
        });

        // `buffered` yields in issue order regardless of completion order.
        let batches: Vec<Vec<VideoRecord>> = stream::iter(plan.queries.clone())
            .map(|query| {
                let key = key.clone();
                async move { self.run_query(&key, &query, hint).await }
            })
            .buffered(concurrency)
            .collect()
            .await;

        let category = Aggregator::new(cap).aggregate(plan.key.clone(), batches);

        self.observer.on_event(&PipelineEvent::CategoryCompleted {
            key,
            size: category.len(),
        });
        category
    }

    /// Fetch, extract and classify one query. Failures yield no records.
    async fn run_query(&self, key: &str, query: &str, hint: usize) -> Vec<VideoRecord> {
        let body = match self.fetcher.fetch(query, hint).await {
            Ok(body) => body,
            Err(e) => {
                self.observer.on_event(&PipelineEvent::QueryFailed {
                    key: key.to_string(),
                    query: query.to_string(),
                    error: e.to_string(),
                });
                return Vec::new();
            }
        };

        let candidates = self
            .extractor
            .extract(&body, hint.saturating_mul(self.settings.oversample_factor));
        let extracted = candidates.len();

        let kept: Vec<VideoRecord> = candidates
            .into_iter()
            .filter(|record| {
                let verdict = self.classifier.verdict(record);
                log::debug!("{:?}: {}", verdict, record.title);
                verdict.is_kept()
            })
            .take(hint)
            .collect();

        self.observer.on_event(&PipelineEvent::QueryCompleted {
            key: key.to_string(),
            query: query.to_string(),
            extracted,
            kept: kept.len(),
        });
        kept
    }
}

/// Run the scraper against the live platform with the configured cap.
pub async fn run_scraper(config: &Config) -> Result<SearchResults> {
    config.validate()?;
    let scraper = HazardScraper::from_config(config)?;
    Ok(scraper
        .scrape_all(config.scraper.max_results_per_category)
        .await)
}
