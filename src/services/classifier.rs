// src/services/classifier.rs

//! Two-stage keyword classifier.
//!
//! A record is kept when it is *relevant* (mentions a configured locality) and
//! reads as *emergency* content. The emergency stage checks exclusions first:
//! a record naming a news channel or an educational phrase is rejected no
//! matter how many emergency keywords it also contains.
//!
//! All matching is case-insensitive substring search over
//! `"{title} {description} {channel}"`.

use crate::models::{KeywordConfig, VideoRecord};

/// Outcome of classifying one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Relevant and emergency; `score` counts matched emergency keywords.
    Kept { score: usize },
    /// No locality keyword matched.
    Irrelevant,
    /// An exclusion entry matched.
    Excluded { term: String },
    /// Relevant, not excluded, but no emergency keyword matched.
    NoEmergencySignal,
}

impl Verdict {
    pub fn is_kept(&self) -> bool {
        matches!(self, Verdict::Kept { .. })
    }
}

/// Keyword classifier over immutable, lowercased keyword sets.
#[derive(Debug, Clone)]
pub struct Classifier {
    locality: Vec<String>,
    exclusions: Vec<String>,
    emergency: Vec<String>,
}

impl Classifier {
    pub fn new(keywords: &KeywordConfig) -> Self {
        Self {
            locality: lowercase_all(&keywords.locality),
            exclusions: keywords
                .exclude_channels
                .iter()
                .chain(&keywords.exclude_content)
                .map(|k| k.to_lowercase())
                .collect(),
            emergency: lowercase_all(&keywords.emergency),
        }
    }

    /// True when any locality keyword occurs in the record's text.
    pub fn relevant(&self, record: &VideoRecord) -> bool {
        let text = record.searchable_text();
        self.locality.iter().any(|k| text.contains(k.as_str()))
    }

    /// True when the record is not excluded and matches an emergency keyword.
    pub fn emergency(&self, record: &VideoRecord) -> bool {
        let text = record.searchable_text();
        self.excluded_by(&text).is_none() && self.emergency_score(&text) > 0
    }

    /// Keep iff both stages hold.
    pub fn keep(&self, record: &VideoRecord) -> bool {
        self.relevant(record) && self.emergency(record)
    }

    /// Classify with the reason for the decision.
    pub fn verdict(&self, record: &VideoRecord) -> Verdict {
        let text = record.searchable_text();

        if !self.locality.iter().any(|k| text.contains(k.as_str())) {
            return Verdict::Irrelevant;
        }
        if let Some(term) = self.excluded_by(&text) {
            return Verdict::Excluded {
                term: term.to_string(),
            };
        }
        match self.emergency_score(&text) {
            0 => Verdict::NoEmergencySignal,
            score => Verdict::Kept { score },
        }
    }

    fn excluded_by(&self, text: &str) -> Option<&str> {
        self.exclusions
            .iter()
            .find(|k| text.contains(k.as_str()))
            .map(String::as_str)
    }

    fn emergency_score(&self, text: &str) -> usize {
        self.emergency
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .count()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&KeywordConfig::default())
    }
}

fn lowercase_all(keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|k| k.to_lowercase()).collect()
}
