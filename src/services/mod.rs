//! Service layer for the scraper application.
//!
//! This module contains the business logic for:
//! - Search page fetching (`SearchFetcher`, `PlatformFetcher`)
//! - Video record extraction (`Extractor`)
//! - Keyword classification (`Classifier`)
//! - Query planning (`QueryPlanner`)
//! - Per-category aggregation (`Aggregator`)
//! - Progress events (`PipelineObserver`)
//! - Recent tweet lookup (`TwitterClient`)

mod aggregator;
mod classifier;
mod events;
mod extractor;
mod fetcher;
mod planner;
mod throttle;
pub mod twitter;

pub use aggregator::{Admission, Aggregator, CategoryBuilder};
pub use classifier::{Classifier, Verdict};
pub use events::{LogObserver, PipelineEvent, PipelineObserver, RecordingObserver};
pub use extractor::{ExtractionStrategy, Extractor, InitialDataStrategy, MarkupStrategy};
pub use fetcher::{PlatformFetcher, SearchFetcher};
pub use planner::{CategoryPlan, QueryPlanner};
pub use throttle::RateLimiter;
pub use twitter::{TweetItem, TweetSearch, TwitterClient};
