// src/models/mod.rs

//! Domain models for the scraper application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod category;
mod config;
mod hazard;
mod video;

// Re-export all public types
pub use category::{SearchCategory, SearchResults};
pub use config::{
    ApiConfig, Config, HAZARD_PLACEHOLDER, KeywordConfig, OutputConfig, QueryTemplates,
    ScraperConfig,
};
pub use hazard::{CategoryKey, HazardTerm, Language};
pub use video::VideoRecord;
