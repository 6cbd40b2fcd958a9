//! Video record data structure.

use serde::{Deserialize, Serialize};

/// A video discovered in a search results page.
///
/// `url` is the identity key. Records are never mutated once extracted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoRecord {
    /// Video title
    pub title: String,

    /// Full watch URL
    pub url: String,

    /// Channel display name
    pub channel: String,

    /// View count text as shown by the platform
    pub views: String,

    /// Relative publish time (e.g., "3 hours ago")
    pub upload_time: String,

    /// Duration text (e.g., "4:21")
    pub duration: String,

    /// Largest thumbnail URL
    pub thumbnail: String,

    /// Description snippet
    pub description: String,
}

impl VideoRecord {
    /// Create a record with only the identity fields set.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// A record is valid when both title and URL are present.
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && !self.url.is_empty()
    }

    /// Lowercased title, description and channel joined for keyword matching.
    pub fn searchable_text(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.channel).to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_requires_title_and_url() {
        assert!(VideoRecord::new("Flooding in Kochi", "https://x/watch?v=1").is_valid());
        assert!(!VideoRecord::new("", "https://x/watch?v=1").is_valid());
        assert!(!VideoRecord::new("Flooding in Kochi", "").is_valid());
    }

    #[test]
    fn searchable_text_is_lowercase_and_ordered() {
        let record = VideoRecord {
            title: "Cyclone NOW".into(),
            description: "Odisha Coast".into(),
            channel: "Local User".into(),
            ..VideoRecord::default()
        };
        assert_eq!(record.searchable_text(), "cyclone now odisha coast local user");
    }
}
