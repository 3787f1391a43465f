//! Nutrition lookup resolver
//!
//! An ordered chain of lookup strategies. The first strategy returning
//! anything wins; its records are deduplicated by title.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::catalog::Catalog;
use super::knowledge::NutritionFact;

/// One tier of the lookup chain
#[async_trait]
pub trait LookupStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Records for `query`; failures inside a tier yield an empty result
    async fn attempt(&self, query: &str) -> Vec<NutritionFact>;
}

/// Keyword search over the static knowledgebase, with synonym expansion
pub struct KnowledgebaseLookup {
    catalog: Arc<Catalog>,
}

impl KnowledgebaseLookup {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl LookupStrategy for KnowledgebaseLookup {
    fn name(&self) -> &'static str {
        "knowledgebase"
    }

    async fn attempt(&self, query: &str) -> Vec<NutritionFact> {
        let keywords = self.catalog.synonyms.expand(query);
        self.catalog.knowledgebase.search(&keywords)
    }
}

/// Last resort: a single generic record echoing the query
pub struct StubLookup {
    timestamp: String,
}

impl StubLookup {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
        }
    }
}

#[async_trait]
impl LookupStrategy for StubLookup {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn attempt(&self, query: &str) -> Vec<NutritionFact> {
        vec![NutritionFact::new(
            format!("Nutrition information about {}", query),
            format!(
                "No detailed guidance was found for \"{}\". Aim for a balanced diet with \
                 adequate protein, complex carbohydrates and healthy fats, and check with a \
                 registered dietitian for personal advice.",
                query
            ),
            "Nutrition database",
            "search",
            self.timestamp.clone(),
        )]
    }
}

#[derive(Clone)]
pub struct NutritionResolver {
    strategies: Vec<Arc<dyn LookupStrategy>>,
}

impl NutritionResolver {
    pub fn new(strategies: Vec<Arc<dyn LookupStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Results of the first non-empty tier, deduplicated by title
    pub async fn resolve(&self, query: &str) -> Vec<NutritionFact> {
        for strategy in &self.strategies {
            let results = strategy.attempt(query).await;
            if !results.is_empty() {
                debug!("{} tier answered {:?} with {} records", strategy.name(), query, results.len());
                return dedupe_by_title(results);
            }
            debug!("{} tier had nothing for {:?}", strategy.name(), query);
        }
        Vec::new()
    }
}

/// Keep the first record of each title, preserving order. Untitled records are dropped.
pub fn dedupe_by_title(records: Vec<NutritionFact>) -> Vec<NutritionFact> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| !r.title.trim().is_empty() && seen.insert(r.title.clone()))
        .collect()
}
