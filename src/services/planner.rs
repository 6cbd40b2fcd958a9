//! Query planning.
//!
//! Expands every configured hazard, per language, into the fixed list of
//! search queries built from that language's templates.

use crate::models::{
    CategoryKey, Config, HAZARD_PLACEHOLDER, HazardTerm, Language, QueryTemplates,
};

/// One (hazard, language) pipeline: its category key and queries in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPlan {
    pub key: CategoryKey,
    pub hazard: HazardTerm,
    pub queries: Vec<String>,
}

/// Builds query variants from injected templates and hazard pairs.
#[derive(Debug, Clone)]
pub struct QueryPlanner {
    templates: QueryTemplates,
    hazards: Vec<HazardTerm>,
}

impl QueryPlanner {
    pub fn new(templates: QueryTemplates, hazards: Vec<HazardTerm>) -> Self {
        Self { templates, hazards }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.queries.clone(), config.hazards.clone())
    }

    /// Queries for one hazard in one language, in template order.
    pub fn queries(&self, hazard: &HazardTerm, language: Language) -> Vec<String> {
        let term = hazard.term(language);
        self.templates
            .for_language(language)
            .iter()
            .map(|template| template.replace(HAZARD_PLACEHOLDER, term))
            .collect()
    }

    /// Number of variants issued per hazard in a language.
    pub fn variant_count(&self, language: Language) -> usize {
        self.templates.for_language(language).len()
    }

    /// Every category in planning order: all English hazards, then all Hindi.
    pub fn plan(&self) -> Vec<CategoryPlan> {
        Language::ALL
            .iter()
            .flat_map(|&language| {
                self.hazards.iter().map(move |hazard| CategoryPlan {
                    key: CategoryKey::new(language, hazard),
                    hazard: hazard.clone(),
                    queries: self.queries(hazard, language),
                })
            })
            .collect()
    }
}

impl Default for QueryPlanner {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
