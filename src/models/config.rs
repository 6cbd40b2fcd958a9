//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{HazardTerm, Language};

/// Placeholder substituted with the hazard term in query templates.
pub const HAZARD_PLACEHOLDER: &str = "{hazard}";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and search behavior settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Classification keyword sets
    #[serde(default)]
    pub keywords: KeywordConfig,

    /// Canonical/localized hazard pairs
    #[serde(default = "defaults::hazards")]
    pub hazards: Vec<HazardTerm>,

    /// Query templates per language
    #[serde(default)]
    pub queries: QueryTemplates,

    /// HTTP API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Export settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scraper.user_agent.trim().is_empty() {
            return Err(AppError::validation("scraper.user_agent is empty"));
        }
        if self.scraper.timeout_secs == 0 {
            return Err(AppError::validation("scraper.timeout_secs must be > 0"));
        }
        if self.scraper.max_concurrent == 0 {
            return Err(AppError::validation("scraper.max_concurrent must be > 0"));
        }
        if self.scraper.max_results_per_category == 0 {
            return Err(AppError::validation(
                "scraper.max_results_per_category must be > 0",
            ));
        }
        if self.scraper.oversample_factor == 0 {
            return Err(AppError::validation("scraper.oversample_factor must be > 0"));
        }
        url::Url::parse(&self.scraper.base_url)?;

        self.validate_hazards()?;
        self.keywords.validate()?;
        self.queries.validate()?;
        self.api.validate()?;
        Ok(())
    }

    fn validate_hazards(&self) -> Result<()> {
        if self.hazards.is_empty() {
            return Err(AppError::validation("No hazards defined"));
        }
        let mut seen = HashSet::new();
        for hazard in &self.hazards {
            if hazard.canonical.trim().is_empty() || hazard.localized.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "Hazard pair has an empty name: {:?}",
                    hazard
                )));
            }
            if !seen.insert(hazard.canonical.to_lowercase()) {
                return Err(AppError::validation(format!(
                    "Duplicate hazard: {}",
                    hazard.canonical
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig::default(),
            keywords: KeywordConfig::default(),
            hazards: defaults::hazards(),
            queries: QueryTemplates::default(),
            api: ApiConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// HTTP client and search behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Platform origin, e.g. `https://www.youtube.com`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Value of the `sp` parameter selecting recent-upload ordering
    #[serde(default = "defaults::sort_filter")]
    pub sort_filter: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept header for HTTP requests
    #[serde(default = "defaults::accept")]
    pub accept: String,

    /// Accept-Language header for HTTP requests
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Minimum delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent search requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Result cap for each category
    #[serde(default = "defaults::max_results_per_category")]
    pub max_results_per_category: usize,

    /// Added to `cap / variants` when sizing each variant's request
    #[serde(default = "defaults::per_variant_margin")]
    pub per_variant_margin: usize,

    /// Candidates extracted per kept record wanted
    #[serde(default = "defaults::oversample_factor")]
    pub oversample_factor: usize,
}

impl ScraperConfig {
    /// Number of kept records requested from each query variant.
    pub fn per_variant_hint(&self, cap: usize, variants: usize) -> usize {
        cap / variants.max(1) + self.per_variant_margin
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            sort_filter: defaults::sort_filter(),
            user_agent: defaults::user_agent(),
            accept: defaults::accept(),
            accept_language: defaults::accept_language(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
            max_results_per_category: defaults::max_results_per_category(),
            per_variant_margin: defaults::per_variant_margin(),
            oversample_factor: defaults::oversample_factor(),
        }
    }
}

/// Keyword sets used by the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Place names and regional terms that make a video relevant
    #[serde(default = "defaults::locality")]
    pub locality: Vec<String>,

    /// Channel names indicating news, educational or official sources
    #[serde(default = "defaults::exclude_channels")]
    pub exclude_channels: Vec<String>,

    /// Content phrases indicating informational or tourism material
    #[serde(default = "defaults::exclude_content")]
    pub exclude_content: Vec<String>,

    /// Terms indicating live distress or urgency
    #[serde(default = "defaults::emergency")]
    pub emergency: Vec<String>,
}

impl KeywordConfig {
    fn validate(&self) -> Result<()> {
        if self.locality.is_empty() {
            return Err(AppError::validation("No locality keywords defined"));
        }
        if self.emergency.is_empty() {
            return Err(AppError::validation("No emergency keywords defined"));
        }
        let lists = [
            &self.locality,
            &self.exclude_channels,
            &self.exclude_content,
            &self.emergency,
        ];
        if lists.iter().any(|list| list.iter().any(|k| k.trim().is_empty())) {
            return Err(AppError::validation("Keyword lists contain an empty entry"));
        }
        Ok(())
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            locality: defaults::locality(),
            exclude_channels: defaults::exclude_channels(),
            exclude_content: defaults::exclude_content(),
            emergency: defaults::emergency(),
        }
    }
}

/// Query templates per language. Each template carries `{hazard}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryTemplates {
    #[serde(default = "defaults::english_queries")]
    pub english: Vec<String>,

    #[serde(default = "defaults::hindi_queries")]
    pub hindi: Vec<String>,
}

impl QueryTemplates {
    /// Templates for a language.
    pub fn for_language(&self, language: Language) -> &[String] {
        match language {
            Language::English => &self.english,
            Language::Hindi => &self.hindi,
        }
    }

    fn validate(&self) -> Result<()> {
        for language in Language::ALL {
            let templates = self.for_language(language);
            if templates.is_empty() {
                return Err(AppError::validation(format!(
                    "No query templates defined for {}",
                    language
                )));
            }
            if let Some(bad) = templates.iter().find(|t| !t.contains(HAZARD_PLACEHOLDER)) {
                return Err(AppError::validation(format!(
                    "Query template '{}' is missing {}",
                    bad, HAZARD_PLACEHOLDER
                )));
            }
        }
        Ok(())
    }
}

impl Default for QueryTemplates {
    fn default() -> Self {
        Self {
            english: defaults::english_queries(),
            hindi: defaults::hindi_queries(),
        }
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address the API server binds to
    #[serde(default = "defaults::bind")]
    pub bind: String,

    /// Per-category cap used when the request gives none
    #[serde(default = "defaults::default_max_results")]
    pub default_max_results: usize,

    /// Lower clamp for the requested cap
    #[serde(default = "defaults::min_max_results")]
    pub min_max_results: usize,

    /// Upper clamp for the requested cap
    #[serde(default = "defaults::max_max_results")]
    pub max_max_results: usize,

    /// Tweet count used when the request gives none
    #[serde(default = "defaults::twitter_default_limit")]
    pub twitter_default_limit: usize,
}

impl ApiConfig {
    /// Clamp a requested per-category cap into the configured range.
    pub fn clamp_max_results(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_max_results)
            .clamp(self.min_max_results, self.max_max_results)
    }

    fn validate(&self) -> Result<()> {
        if self.min_max_results == 0 || self.min_max_results > self.max_max_results {
            return Err(AppError::validation(
                "api.min_max_results must be in 1..=api.max_max_results",
            ));
        }
        if !(self.min_max_results..=self.max_max_results).contains(&self.default_max_results) {
            return Err(AppError::validation(
                "api.default_max_results is outside the clamp range",
            ));
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
            default_max_results: defaults::default_max_results(),
            min_max_results: defaults::min_max_results(),
            max_max_results: defaults::max_max_results(),
            twitter_default_limit: defaults::twitter_default_limit(),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving CSV/JSON exports
    #[serde(default = "defaults::output_dir")]
    pub dir: String,

    /// File name prefix for exports
    #[serde(default = "defaults::file_prefix")]
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
            file_prefix: defaults::file_prefix(),
        }
    }
}

mod defaults {
    use crate::models::HazardTerm;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // Scraper defaults
    pub fn base_url() -> String {
        "https://www.youtube.com".into()
    }
    pub fn sort_filter() -> String {
        "CAMSAhAB".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".into()
    }
    pub fn accept() -> String {
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".into()
    }
    pub fn accept_language() -> String {
        "en-US,en;q=0.9".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        3000
    }
    pub fn max_concurrent() -> usize {
        1
    }
    pub fn max_results_per_category() -> usize {
        8
    }
    pub fn per_variant_margin() -> usize {
        2
    }
    pub fn oversample_factor() -> usize {
        5
    }

    // Hazard defaults
    pub fn hazards() -> Vec<HazardTerm> {
        [
            ("tsunami", "सुनामी"),
            ("cyclone", "चक्रवात"),
            ("storm surge", "तूफान"),
            ("high waves", "ऊंची लहरें"),
            ("coastal erosion", "तटीय कटाव"),
            ("oil spill", "तेल रिसाव"),
        ]
        .into_iter()
        .map(|(canonical, localized)| HazardTerm::new(canonical, localized))
        .collect()
    }

    // Query defaults
    pub fn english_queries() -> Vec<String> {
        strings(&[
            "{hazard} help rescue India live emergency",
            "{hazard} flooding water rising India help",
            "India {hazard} emergency evacuation live",
            "{hazard} damage India affected people help",
            "live {hazard} India coastal emergency now",
        ])
    }
    pub fn hindi_queries() -> Vec<String> {
        strings(&[
            "{hazard} मदद बचाओ भारत लाइव आपातकाल",
            "{hazard} बाढ़ पानी बढ़ रहा भारत मदद",
            "भारत {hazard} आपातकाल निकासी लाइव",
            "{hazard} नुकसान भारत प्रभावित लोग मदद",
            "लाइव {hazard} भारत तटीय आपातकाल अभी",
        ])
    }

    // Keyword defaults
    pub fn locality() -> Vec<String> {
        strings(&[
            // Country
            "india", "भारत", "indian", "भारतीय",
            // Coastal states
            "gujarat", "गुजरात", "maharashtra", "महाराष्ट्र", "goa", "गोवा",
            "karnataka", "कर्नाटक", "kerala", "केरल", "tamil nadu", "तमिल नाडु",
            "andhra pradesh", "आंध्र प्रदेश", "telangana", "तेलंगाना",
            "odisha", "ओडिशा", "west bengal", "पश्चिम बंगाल",
            // Coastal cities
            "mumbai", "मुंबई", "chennai", "चेन्नई", "kochi", "कोच्चि", "cochin",
            "visakhapatnam", "विशाखापत्तनम", "kolkata", "कोलकाता", "calcutta",
            "surat", "सूरत", "vadodara", "वडोदरा", "rajkot", "राजकोट",
            "ahmedabad", "अहमदाबाद", "pune", "पुणे", "panaji", "पणजी",
            "mangalore", "मंगलौर", "udupi", "उडुपी", "thiruvananthapuram", "तिरुवनंतपुरम",
            "kozhikode", "कोझीकोड", "calicut", "कालीकट", "puducherry", "पुडुचेरी",
            "pondicherry", "पांडिचेरी", "tuticorin", "तूतीकोरिन", "madurai", "मदुराई",
            "coimbatore", "कोयंबटूर", "salem", "सलेम", "vellore", "वेल्लोर",
            "tirunelveli", "तिरुनेलवेली", "nellore", "नेल्लोर", "guntur", "गुंटूर",
            "vijayawada", "विजयवाड़ा", "kakinada", "काकीनाडा", "rajahmundry", "राजमुंद्री",
            "cuttack", "कटक", "bhubaneswar", "भुवनेश्वर", "puri", "पुरी",
            "balasore", "बालासोर", "paradip", "पारादीप", "haldia", "हल्दिया",
            "digha", "दीघा", "daman", "दमन", "diu", "दीव", "silvassa", "सिलवासा",
            // Coastal regions
            "arabian sea", "अरब सागर", "bay of bengal", "बंगाल की खाड़ी",
            "indian ocean", "हिंद महासागर", "malabar coast", "मालाबार तट",
            "coromandel coast", "कोरोमंडल तट", "konkan coast", "कोंकण तट",
            "coastal", "तटीय", "sea", "समुद्र", "ocean", "महासागर",
            // Weather systems
            "monsoon", "मानसून", "southwest monsoon", "दक्षिणपश्चिम मानसून",
            "northeast monsoon", "उत्तरपूर्व मानसून", "imd", "भारतीय मौसम विभाग",
            "cyclone warning", "चक्रवात चेतावनी", "ndma", "राष्ट्रीय आपदा प्रबंधन प्राधिकरण",
        ])
    }
    pub fn exclude_channels() -> Vec<String> {
        strings(&[
            // National news
            "zee news", "aaj tak", "ndtv", "india today", "times now", "republic",
            "cnn news18", "news18", "abp news", "dd news", "ani", "pti",
            // Regional news
            "tv9", "eenadu", "sakshi", "v6 news", "hmtv", "ntv", "manorama news",
            "asianet news", "mathrubhumi news", "kairali news", "janam tv",
            "puthiya thalaimurai", "polimer news", "news7 tamil", "thanthi tv",
            "sun news", "vijay news", "zee tamil", "news18 tamil nadu",
            // International news and education
            "bbc", "cnn", "discovery", "national geographic", "history channel",
            "documentary", "explained", "educational", "informative",
            // Government
            "doordarshan", "pib india", "ministry", "government", "official",
        ])
    }
    pub fn exclude_content() -> Vec<String> {
        strings(&[
            // Educational
            "why", "how", "what is", "explained", "documentary", "facts about",
            "history of", "science behind", "causes of", "formation of",
            "education", "learning", "tutorial", "guide", "information",
            "knowledge", "study", "research", "analysis", "explainer",
            // Tourism and infrastructure
            "tourist", "tourism", "visit", "travel", "bridge", "construction",
            "infrastructure", "development", "project", "plan", "proposal",
            "glass bridge", "sea bridge", "places to visit", "attractions",
            // General informative terms
            "first", "biggest", "largest", "amazing", "incredible", "facts",
            "top 10", "top 5", "list of", "compilation", "collection",
        ])
    }
    pub fn emergency() -> Vec<String> {
        strings(&[
            // Emergency situations
            "help", "emergency", "rescue", "trapped", "stuck", "flood", "flooding",
            "water rising", "evacuate", "evacuation", "shelter", "relief",
            "disaster", "damage", "destroyed", "affected", "victims",
            // Live content
            "live", "now", "happening now", "current", "ongoing", "breaking",
            "alert", "warning", "urgent", "immediate", "real time",
            // Hindi distress terms
            "मदद", "बचाओ", "आपातकाल", "बाढ़", "तूफान आ रहा है", "खतरा", "चेतावनी",
            "तत्काल", "अभी", "लाइव", "मौजूदा", "राहत", "नुकसान", "प्रभावित",
            // Weather emergencies
            "cyclone approaching", "tsunami warning", "high tide", "storm coming",
            "waves hitting", "water level rising", "coastal flooding", "sea surge",
        ])
    }

    // API defaults
    pub fn bind() -> String {
        "0.0.0.0:8000".into()
    }
    pub fn default_max_results() -> usize {
        8
    }
    pub fn min_max_results() -> usize {
        1
    }
    pub fn max_max_results() -> usize {
        30
    }
    pub fn twitter_default_limit() -> usize {
        10
    }

    // Output defaults
    pub fn output_dir() -> String {
        "output".into()
    }
    pub fn file_prefix() -> String {
        "emergency_ocean_hazards".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.scraper.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.scraper.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_hazards() {
        let mut config = Config::default();
        config.hazards.push(HazardTerm::new("Tsunami", "सुनामी"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_template_without_placeholder() {
        let mut config = Config::default();
        config.queries.hindi.push("भारत लाइव".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn shipped_config_loads_and_validates() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/config.toml");
        let config = Config::load(path).unwrap();
        config.validate().unwrap();
        assert_eq!(config.hazards.len(), 6);
        assert_eq!(config.queries.hindi.len(), 5);
        assert!(!config.keywords.locality.is_empty());
    }

    #[test]
    fn default_hazards_are_explicit_pairs() {
        let config = Config::default();
        let cyclone = config
            .hazards
            .iter()
            .find(|h| h.localized == "चक्रवात")
            .unwrap();
        assert_eq!(cyclone.canonical, "cyclone");
        assert_eq!(config.hazards.len(), 6);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [scraper]
            request_delay_ms = 0

            [[hazards]]
            canonical = "tsunami"
            localized = "सुनामी"
            "#,
        )
        .unwrap();
        assert_eq!(config.scraper.request_delay_ms, 0);
        assert_eq!(config.scraper.max_results_per_category, 8);
        assert_eq!(config.hazards.len(), 1);
        assert_eq!(config.queries.english.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn per_variant_hint_divides_cap() {
        let scraper = ScraperConfig::default();
        assert_eq!(scraper.per_variant_hint(8, 5), 3);
        assert_eq!(scraper.per_variant_hint(30, 5), 8);
        assert_eq!(scraper.per_variant_hint(8, 0), 10);
    }

    #[test]
    fn clamp_max_results_respects_range() {
        let api = ApiConfig::default();
        assert_eq!(api.clamp_max_results(None), 8);
        assert_eq!(api.clamp_max_results(Some(0)), 1);
        assert_eq!(api.clamp_max_results(Some(100)), 30);
        assert_eq!(api.clamp_max_results(Some(12)), 12);
    }
}
