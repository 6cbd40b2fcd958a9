//! Pipeline progress events.
//!
//! The pipeline never writes progress output itself; it emits
//! [`PipelineEvent`]s to a [`PipelineObserver`]. [`LogObserver`] renders them
//! through the `log` facade.

use std::sync::Mutex;

/// Something that happened during a scrape run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A category's queries are about to be issued.
    CategoryStarted { key: String, queries: usize },
    /// A search page was fetched and processed.
    QueryCompleted {
        key: String,
        query: String,
        extracted: usize,
        kept: usize,
    },
    /// A search request failed; the query contributes no records.
    QueryFailed {
        key: String,
        query: String,
        error: String,
    },
    /// A category was published.
    CategoryCompleted { key: String, size: usize },
    /// Every category was published.
    RunCompleted { categories: usize, total: usize },
}

/// Receives pipeline events.
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// Renders events as log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::CategoryStarted { key, queries } => {
                log::info!("Searching {} ({} queries)", key, queries);
            }
            PipelineEvent::QueryCompleted {
                query,
                extracted,
                kept,
                ..
            } => {
                log::info!(
                    "Found {} total videos, {} emergency videos for '{}'",
                    extracted,
                    kept,
                    query
                );
            }
            PipelineEvent::QueryFailed { query, error, .. } => {
                log::warn!("Search failed for '{}': {}", query, error);
            }
            PipelineEvent::CategoryCompleted { key, size } => {
                log::info!("{}: {} emergency videos", key, size);
            }
            PipelineEvent::RunCompleted { categories, total } => {
                log::info!(
                    "Scrape complete: {} emergency videos in {} categories",
                    total,
                    categories
                );
            }
        }
    }
}

/// Keeps every event in memory, in emission order.
///
/// Public so downstream crates can assert on pipeline progress in their own
/// tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far.
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_observer_keeps_order() {
        let observer = RecordingObserver::new();
        observer.on_event(&PipelineEvent::CategoryStarted {
            key: "english_tsunami_emergency".into(),
            queries: 5,
        });
        observer.on_event(&PipelineEvent::CategoryCompleted {
            key: "english_tsunami_emergency".into(),
            size: 2,
        });

        let events = observer.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], PipelineEvent::CategoryCompleted { size: 2, .. }));
    }
}
