//! Per-category deduplication and capping.

use std::collections::HashSet;

use crate::models::{CategoryKey, SearchCategory, VideoRecord};

/// What happened to a record offered to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Duplicate,
    Full,
}

/// Grows one category in admission order, bounded by `cap`.
#[derive(Debug)]
pub struct CategoryBuilder {
    key: CategoryKey,
    cap: usize,
    seen: HashSet<String>,
    videos: Vec<VideoRecord>,
}

impl CategoryBuilder {
    pub fn new(key: CategoryKey, cap: usize) -> Self {
        Self {
            key,
            cap,
            seen: HashSet::new(),
            videos: Vec::new(),
        }
    }

    /// Admit a record unless its URL was already admitted or the category is full.
    pub fn admit(&mut self, record: VideoRecord) -> Admission {
        if self.is_full() {
            return Admission::Full;
        }
        if !self.seen.insert(record.url.clone()) {
            return Admission::Duplicate;
        }
        self.videos.push(record);
        Admission::Admitted
    }

    pub fn is_full(&self) -> bool {
        self.videos.len() >= self.cap
    }

    pub fn finish(self) -> SearchCategory {
        SearchCategory {
            key: self.key,
            videos: self.videos,
        }
    }
}

/// Merges classified batches for one category.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    cap: usize,
}

impl Aggregator {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    /// Consume batches in query-issue order and build the category.
    pub fn aggregate<I>(&self, key: CategoryKey, batches: I) -> SearchCategory
    where
        I: IntoIterator<Item = Vec<VideoRecord>>,
    {
        let mut builder = CategoryBuilder::new(key, self.cap);
        for batch in batches {
            for record in batch {
                if builder.admit(record) == Admission::Full {
                    return builder.finish();
                }
            }
        }
        builder.finish()
    }
}
