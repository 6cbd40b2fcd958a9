// src/lib.rs

//! Coastwatch: coastal hazard emergency video scraper

#[cfg(feature = "server")]
pub mod api;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
