//! Nutrition domain
//!
//! Energy and macro calculators, the meal-plan generator, the static
//! knowledgebase and the tiered lookup resolver.

pub mod advice;
pub mod catalog;
pub mod energy;
pub mod knowledge;
pub mod live;
pub mod macros;
pub mod meal_plan;
pub mod profile;
pub mod random;
pub mod resolver;
pub mod workout;

pub use advice::{personalized_advice, AdviceItem};
pub use catalog::{Catalog, CatalogError, PerGoal, PerSlot};
pub use energy::{compute_bmr, compute_tdee, EnergyEstimate};
pub use knowledge::{Knowledgebase, NutritionFact, SynonymTable, TipCategory, Tips};
pub use live::{ArticleExtractor, FetchError, LiveLookup, LiveSite};
pub use macros::{compute_macro_target, MacroTarget};
pub use meal_plan::{basic_meal_plan, MealPlanError, MealPlanGenerator, MealSlot, MealSuggestion};
pub use profile::{ActivityLevel, Gender, Goal, UserProfile};
pub use random::{RandomSource, RngSource, SequenceRandom};
pub use resolver::{dedupe_by_title, KnowledgebaseLookup, LookupStrategy, NutritionResolver, StubLookup};
pub use workout::{WorkoutPhase, WorkoutPlan, WorkoutPlans, WorkoutType};

/// Current local time as ISO-8601, the timestamp format of every record
pub fn now_iso() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
