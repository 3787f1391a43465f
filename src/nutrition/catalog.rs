//! Fixed nutrition catalog
//!
//! Knowledgebase, tips, synonyms, meal-plan parameters, workout plans and
//! live sites live in one JSON document. The built-in copy is embedded at
//! compile time; a file can replace it at startup. The loaded catalog is
//! immutable and shared behind an `Arc`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::knowledge::{Knowledgebase, SynonymTable, Tips};
use super::live::LiveSite;
use super::meal_plan::{BasicMealPlans, MealPlanConfig, MealSlot};
use super::profile::Goal;
use super::workout::WorkoutPlans;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// One value per goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerGoal<T> {
    pub weight_loss: T,
    pub maintenance: T,
    pub muscle_gain: T,
}

impl<T> PerGoal<T> {
    pub fn get(&self, goal: Goal) -> &T {
        match goal {
            Goal::WeightLoss => &self.weight_loss,
            Goal::Maintenance => &self.maintenance,
            Goal::MuscleGain => &self.muscle_gain,
        }
    }
}

/// One value per meal slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerSlot<T> {
    pub breakfast: T,
    pub lunch: T,
    pub dinner: T,
    pub snack: T,
}

impl<T> PerSlot<T> {
    pub fn get(&self, slot: MealSlot) -> &T {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Snack => &self.snack,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub knowledgebase: Knowledgebase,
    pub tips: Tips,
    pub synonyms: SynonymTable,
    pub meal_plan: MealPlanConfig,
    pub basic_meal_plans: BasicMealPlans,
    pub workout_plans: WorkoutPlans,
    pub live_sites: Vec<LiveSite>,
    /// When the catalog was loaded; copied into every fact
    #[serde(skip)]
    pub loaded_at: String,
}

impl Catalog {
    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse, validate and timestamp a catalog document
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let mut catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        catalog.stamp(&crate::nutrition::now_iso());
        Ok(catalog)
    }

    /// Load from `path` if given, otherwise the built-in catalog.
    ///
    /// A broken override file is logged and the built-in catalog is used.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let Some(path) = path else {
            return Self::builtin();
        };

        let loaded = std::fs::read_to_string(path)
            .map_err(CatalogError::from)
            .and_then(|json| Self::from_json(&json));

        match loaded {
            Ok(catalog) => {
                info!(
                    "Loaded catalog from {} ({} facts, {} sites)",
                    path.display(),
                    catalog.knowledgebase.len(),
                    catalog.live_sites.len()
                );
                Ok(catalog)
            }
            Err(e) => {
                warn!("Ignoring catalog {}: {}; using built-in catalog", path.display(), e);
                Self::builtin()
            }
        }
    }

    /// Structural checks the generator and resolver rely on.
    ///
    /// Empty meal pools are allowed; the suggestion endpoint falls back to
    /// the basic plan for them.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let fractions = &self.meal_plan.slot_fractions;
        let sum: f64 = MealSlot::ALL.iter().map(|s| fractions.get(*s)).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(CatalogError::Invalid(format!(
                "slot fractions sum to {sum}, expected 1.0"
            )));
        }
        if MealSlot::ALL.iter().any(|s| *fractions.get(*s) < 0.0) {
            return Err(CatalogError::Invalid("negative slot fraction".into()));
        }

        for (name, (low, high)) in [
            ("calorie_jitter", self.meal_plan.calorie_jitter),
            ("gram_jitter", self.meal_plan.gram_jitter),
        ] {
            if !(low > 0.0 && low <= high) {
                return Err(CatalogError::Invalid(format!(
                    "{name} must satisfy 0 < low <= high, got [{low}, {high}]"
                )));
            }
        }

        for site in &self.live_sites {
            if !site.base_url.starts_with("http://") && !site.base_url.starts_with("https://") {
                return Err(CatalogError::Invalid(format!(
                    "live site {} has no http(s) base URL",
                    site.name
                )));
            }
        }

        Ok(())
    }

    fn stamp(&mut self, timestamp: &str) {
        self.knowledgebase.stamp(timestamp);
        self.tips.stamp(timestamp);
        self.loaded_at = timestamp.to_string();
    }
}
