//! Aggregated search categories.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::{CategoryKey, VideoRecord};

/// Records admitted for one (language, hazard) pair, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCategory {
    pub key: CategoryKey,
    pub videos: Vec<VideoRecord>,
}

impl SearchCategory {
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

/// All categories of a run, in planning order.
///
/// Serializes as a JSON object `{category_key: [VideoRecord]}` preserving order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub categories: Vec<SearchCategory>,
}

impl SearchResults {
    pub fn push(&mut self, category: SearchCategory) {
        self.categories.push(category);
    }

    /// Total number of videos across all categories.
    pub fn total_videos(&self) -> usize {
        self.categories.iter().map(SearchCategory::len).sum()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Look up a category by its rendered key.
    pub fn get(&self, key: &str) -> Option<&SearchCategory> {
        self.categories.iter().find(|c| c.key.to_string() == key)
    }

    /// Iterate `(rendered key, videos)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (String, &[VideoRecord])> {
        self.categories
            .iter()
            .map(|c| (c.key.to_string(), c.videos.as_slice()))
    }
}

impl Serialize for SearchResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (key, videos) in self.iter() {
            map.serialize_entry(&key, videos)?;
        }
        map.end()
    }
}
