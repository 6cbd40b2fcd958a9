//! Hazard terms, search languages and category keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Suffix shared by every category key.
const INTENT: &str = "emergency";

/// A hazard named canonically (English) and in its localized (Hindi) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HazardTerm {
    /// Canonical name, also used in category keys (e.g., "storm surge")
    pub canonical: String,

    /// Localized search term (e.g., "तूफान")
    pub localized: String,
}

impl HazardTerm {
    pub fn new(canonical: impl Into<String>, localized: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            localized: localized.into(),
        }
    }

    /// The term to search for in the given language.
    pub fn term(&self, language: Language) -> &str {
        match language {
            Language::English => &self.canonical,
            Language::Hindi => &self.localized,
        }
    }
}

/// Search language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hindi,
}

impl Language {
    /// Languages in planning order.
    pub const ALL: [Language; 2] = [Language::English, Language::Hindi];

    /// Lowercase key used in category keys.
    pub fn key(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
        }
    }

    /// Human-readable name used in exports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Identifies one aggregated category: `<language>_<hazard>_emergency`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryKey {
    pub language: Language,
    pub hazard: String,
}

impl CategoryKey {
    pub fn new(language: Language, hazard: &HazardTerm) -> Self {
        Self {
            language,
            hazard: hazard.canonical.clone(),
        }
    }

    /// Split a rendered key into its language display name and hazard type.
    ///
    /// Keys that do not follow the convention yield `("Unknown", key)`.
    pub fn describe(key: &str) -> (String, String) {
        match key.parse::<CategoryKey>() {
            Ok(parsed) => (
                parsed.language.display_name().to_string(),
                parsed.hazard,
            ),
            Err(_) => ("Unknown".to_string(), key.to_string()),
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.language.key(), self.hazard, INTENT)
    }
}

impl FromStr for CategoryKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::validation(format!("Invalid category key: {s}"));

        let (language, rest) = Language::ALL
            .iter()
            .find_map(|lang| {
                s.strip_prefix(lang.key())
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| (*lang, rest))
            })
            .ok_or_else(invalid)?;

        let hazard = rest
            .strip_suffix(INTENT)
            .and_then(|h| h.strip_suffix('_'))
            .filter(|h| !h.is_empty())
            .ok_or_else(invalid)?;

        Ok(Self {
            language,
            hazard: hazard.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_selects_side_of_pair() {
        let hazard = HazardTerm::new("oil spill", "तेल रिसाव");
        assert_eq!(hazard.term(Language::English), "oil spill");
        assert_eq!(hazard.term(Language::Hindi), "तेल रिसाव");
    }

    #[test]
    fn hindi_key_uses_canonical_name() {
        let hazard = HazardTerm::new("storm surge", "तूफान");
        let key = CategoryKey::new(Language::Hindi, &hazard);
        assert_eq!(key.to_string(), "hindi_storm surge_emergency");
    }

    #[test]
    fn parse_key_roundtrips_multiword_hazard() {
        let key: CategoryKey = "english_coastal erosion_emergency".parse().unwrap();
        assert_eq!(key.language, Language::English);
        assert_eq!(key.hazard, "coastal erosion");
    }

    #[test]
    fn parse_rejects_unknown_language_and_missing_intent() {
        assert!("tamil_tsunami_emergency".parse::<CategoryKey>().is_err());
        assert!("english_tsunami".parse::<CategoryKey>().is_err());
        assert!("english__emergency".parse::<CategoryKey>().is_err());
    }

    #[test]
    fn describe_falls_back_to_unknown() {
        assert_eq!(
            CategoryKey::describe("hindi_cyclone_emergency"),
            ("Hindi".to_string(), "cyclone".to_string())
        );
        assert_eq!(
            CategoryKey::describe("misc"),
            ("Unknown".to_string(), "misc".to_string())
        );
    }
}
