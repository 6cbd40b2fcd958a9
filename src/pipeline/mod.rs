//! Pipeline entry points.
//!
//! - `run_scraper`: Search every hazard/language category and aggregate results

pub mod scrape;

pub use scrape::{HazardScraper, run_scraper};
