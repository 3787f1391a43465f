//! Static nutrition knowledgebase, curated tips and the synonym table

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single piece of nutrition guidance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionFact {
    pub title: String,
    pub content: String,
    pub source: String,
    pub category: String,
    /// ISO-8601; catalog entries are stamped when the catalog loads
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NutritionFact {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
        category: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source: source.into(),
            category: category.into(),
            timestamp: timestamp.into(),
            url: None,
        }
    }

    /// Case-insensitive substring match of any keyword against title, content or category
    pub fn matches_any(&self, keywords: &[String]) -> bool {
        let title = self.title.to_lowercase();
        let content = self.content.to_lowercase();
        let category = self.category.to_lowercase();
        keywords.iter().any(|k| {
            let k = k.to_lowercase();
            title.contains(&k) || content.contains(&k) || category.contains(&k)
        })
    }
}

/// The fixed list of nutrition facts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Knowledgebase {
    facts: Vec<NutritionFact>,
}

impl Knowledgebase {
    pub fn new(facts: Vec<NutritionFact>) -> Self {
        Self { facts }
    }

    pub fn all(&self) -> &[NutritionFact] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Facts whose category tag equals `category` (case-insensitive)
    pub fn by_category(&self, category: &str) -> Vec<NutritionFact> {
        self.facts
            .iter()
            .filter(|f| f.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }

    /// Facts matching any of the keywords, in catalog order
    pub fn search(&self, keywords: &[String]) -> Vec<NutritionFact> {
        self.facts
            .iter()
            .filter(|f| f.matches_any(keywords))
            .cloned()
            .collect()
    }

    pub(crate) fn stamp(&mut self, timestamp: &str) {
        for fact in &mut self.facts {
            fact.timestamp = timestamp.to_string();
        }
    }
}

/// Groups of equivalent spellings for micronutrients, keyed by canonical term
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynonymTable {
    groups: BTreeMap<String, Vec<String>>,
}

impl SynonymTable {
    pub fn new(groups: BTreeMap<String, Vec<String>>) -> Self {
        Self { groups }
    }

    /// The lowercased, trimmed query plus every spelling of the first group it belongs to
    pub fn expand(&self, query: &str) -> Vec<String> {
        let query = query.trim().to_lowercase();
        let mut keywords = vec![query.clone()];

        let group = self.groups.iter().find(|(key, variants)| {
            **key == query || variants.iter().any(|v| v.to_lowercase() == query)
        });

        if let Some((key, variants)) = group {
            for word in variants.iter().map(|v| v.to_lowercase()).chain([key.clone()]) {
                if !keywords.contains(&word) {
                    keywords.push(word);
                }
            }
        }

        keywords
    }
}

/// Tip categories; anything unrecognised reads the general tips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    General,
    WeightLoss,
    MuscleGain,
    Endurance,
}

impl TipCategory {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "weight_loss" => TipCategory::WeightLoss,
            "muscle_gain" => TipCategory::MuscleGain,
            "endurance" => TipCategory::Endurance,
            _ => TipCategory::General,
        }
    }
}

/// Curated tips per category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tips {
    pub general: Vec<NutritionFact>,
    pub weight_loss: Vec<NutritionFact>,
    pub muscle_gain: Vec<NutritionFact>,
    pub endurance: Vec<NutritionFact>,
}

impl Tips {
    pub fn get(&self, category: TipCategory) -> &[NutritionFact] {
        match category {
            TipCategory::General => &self.general,
            TipCategory::WeightLoss => &self.weight_loss,
            TipCategory::MuscleGain => &self.muscle_gain,
            TipCategory::Endurance => &self.endurance,
        }
    }

    pub(crate) fn stamp(&mut self, timestamp: &str) {
        for fact in self
            .general
            .iter_mut()
            .chain(self.weight_loss.iter_mut())
            .chain(self.muscle_gain.iter_mut())
            .chain(self.endurance.iter_mut())
        {
            fact.timestamp = timestamp.to_string();
        }
    }
}
