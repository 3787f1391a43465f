//! Nutrition advice tools
//!
//! Tips, search, meal suggestions, personalized advice, workout plans and
//! the raw knowledgebase, shared by the HTTP routes and the MCP server.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::nutrition::{
    basic_meal_plan, now_iso, personalized_advice as build_advice, AdviceItem, Catalog, Goal,
    LiveLookup, MealPlanGenerator, MealSuggestion, NutritionFact, NutritionResolver, RandomSource,
    TipCategory, UserProfile, WorkoutPlan, WorkoutType,
};

pub const DEFAULT_DAILY_CALORIES: i64 = 2000;
pub const DEFAULT_WORKOUT_MINUTES: i64 = 60;
pub const DEFAULT_SCRAPE_QUERY: &str = "nutrition tips";

#[derive(Debug, Serialize)]
pub struct TipsResponse {
    pub tips: Vec<NutritionFact>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<NutritionFact>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<MealSuggestion>,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub advice: Vec<AdviceItem>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutPlanResponse {
    pub plan: WorkoutPlan,
    pub workout_type: WorkoutType,
    /// Echoed back; the plan does not depend on it
    pub duration: i64,
}

#[derive(Debug, Serialize)]
pub struct DatabaseResponse {
    pub data: Vec<NutritionFact>,
}

/// Curated tips; unknown categories read the general tips
pub fn nutrition_tips(catalog: &Catalog, category: Option<&str>) -> TipsResponse {
    let category = TipCategory::parse(category.unwrap_or("general"));
    TipsResponse {
        tips: catalog.tips.get(category).to_vec(),
    }
}

/// Run the lookup chain for a non-blank query
pub async fn search_nutrition(resolver: &NutritionResolver, query: &str) -> AppResult<SearchResponse> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::validation("Please provide a search query"));
    }

    let results = resolver.resolve(query).await;
    debug!("Search {:?} returned {} results", query, results.len());
    Ok(SearchResponse { results })
}

/// Four randomized meal suggestions, or the basic plan if the generator cannot run
pub fn meal_suggestions(
    catalog: &Catalog,
    daily_calories: i64,
    goal: Goal,
    random: &mut dyn RandomSource,
) -> SuggestionsResponse {
    let generator = MealPlanGenerator::new(&catalog.meal_plan);
    let suggestions = match generator.generate(daily_calories, goal, random) {
        Ok(plan) => plan,
        Err(e) => {
            warn!("{}; serving the basic meal plan", e);
            basic_meal_plan(
                &catalog.basic_meal_plans,
                &catalog.meal_plan.slot_fractions,
                daily_calories,
                goal,
            )
        }
    };
    SuggestionsResponse { suggestions }
}

/// Advice for a profile; missing profile fields take their defaults
pub fn personalized_advice(profile: &UserProfile) -> AdviceResponse {
    AdviceResponse {
        advice: build_advice(profile, &now_iso()),
    }
}

/// Advice for a JSON request body. A missing, `null` or empty body is rejected.
pub fn personalized_advice_from_body(body: Option<Value>) -> AppResult<AdviceResponse> {
    let body = match body {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) if map.is_empty() => None,
        Some(other) => Some(other),
    }
    .ok_or_else(|| AppError::validation("Please provide user profile data"))?;

    let profile: UserProfile = serde_json::from_value(body)
        .map_err(|e| AppError::validation(format!("Invalid user profile: {}", e)))?;
    Ok(personalized_advice(&profile))
}

pub fn workout_plan(catalog: &Catalog, workout_type: Option<&str>, duration: Option<i64>) -> WorkoutPlanResponse {
    let workout_type = WorkoutType::parse(workout_type.unwrap_or("strength_training"));
    WorkoutPlanResponse {
        plan: catalog.workout_plans.get(workout_type).clone(),
        workout_type,
        duration: duration.unwrap_or(DEFAULT_WORKOUT_MINUTES),
    }
}

/// The whole static knowledgebase
pub fn nutrition_database(catalog: &Catalog) -> DatabaseResponse {
    DatabaseResponse {
        data: catalog.knowledgebase.all().to_vec(),
    }
}

/// Live tier only; empty when live lookups are disabled
pub async fn scrape_websites(live: Option<&LiveLookup>, query: Option<&str>) -> SearchResponse {
    let query = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(DEFAULT_SCRAPE_QUERY);

    let results = match live {
        Some(live) => live.scrape(query).await,
        None => {
            debug!("Scrape requested with live lookup disabled");
            Vec::new()
        }
    };
    SearchResponse { results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{KnowledgebaseLookup, LookupStrategy, MealSlot, SequenceRandom, StubLookup};
    use std::sync::Arc;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_tips_fallback_to_general() {
        let catalog = catalog();
        let tips = nutrition_tips(&catalog, Some("crossfit")).tips;
        assert_eq!(tips, catalog.tips.general);
        assert_eq!(nutrition_tips(&catalog, None).tips.len(), 3);
        assert_eq!(
            nutrition_tips(&catalog, Some("endurance")).tips,
            catalog.tips.endurance
        );
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let catalog = Arc::new(catalog());
        let resolver = NutritionResolver::new(vec![
            Arc::new(KnowledgebaseLookup::new(catalog)) as Arc<dyn LookupStrategy>,
            Arc::new(StubLookup::new("t")),
        ]);
        assert!(matches!(
            search_nutrition(&resolver, "   ").await,
            Err(AppError::Validation(_))
        ));
        let found = search_nutrition(&resolver, "Calcium").await.unwrap();
        assert!(found.results.iter().any(|r| r.category == "calcium"));
    }

    #[test]
    fn test_suggestions_fall_back_to_basic_plan() {
        let mut catalog = catalog();
        catalog.meal_plan.pools.snack.weight_loss.clear();
        let response = meal_suggestions(&catalog, 1800, Goal::WeightLoss, &mut SequenceRandom::midpoint());
        assert_eq!(response.suggestions.len(), 4);
        assert_eq!(response.suggestions[3].meal_slot, MealSlot::Snack);
        assert_eq!(
            response.suggestions[0].item_name,
            catalog.basic_meal_plans.weight_loss.breakfast.name
        );
        assert_eq!(response.suggestions[0].calories, 450);
    }

    #[test]
    fn test_advice_body_handling() {
        assert!(matches!(personalized_advice_from_body(None), Err(AppError::Validation(_))));
        assert!(matches!(
            personalized_advice_from_body(Some(Value::Null)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            personalized_advice_from_body(Some(serde_json::json!({}))),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            personalized_advice_from_body(Some(serde_json::json!({"age": "old"}))),
            Err(AppError::Validation(_))
        ));

        let advice = personalized_advice_from_body(Some(serde_json::json!({"goal": "muscle_gain"})))
            .unwrap()
            .advice;
        assert_eq!(advice.len(), 3);
        assert!(advice[0].title.contains("muscle gain"));
    }

    #[test]
    fn test_workout_plan_defaults() {
        let catalog = catalog();
        let response = workout_plan(&catalog, None, None);
        assert_eq!(response.workout_type, WorkoutType::StrengthTraining);
        assert_eq!(response.duration, 60);

        let response = workout_plan(&catalog, Some("cardio"), Some(25));
        assert_eq!(response.plan, catalog.workout_plans.cardio);
        assert_eq!(response.duration, 25);
    }

    #[test]
    fn test_database_lists_everything() {
        let catalog = catalog();
        assert_eq!(nutrition_database(&catalog).data.len(), catalog.knowledgebase.len());
    }

    #[tokio::test]
    async fn test_scrape_without_live_lookup() {
        assert!(scrape_websites(None, None).await.results.is_empty());
    }
}
