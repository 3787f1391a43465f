//! Calorie Counter MCP Server Implementation

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::nutrition::{ActivityLevel, Gender, Goal, RngSource, UserProfile};
use crate::state::AppState;
use crate::tools::{meals, nutrition};

/// Calorie Counter MCP Service
#[derive(Clone)]
pub struct CalorieService {
    state: Arc<AppState>,
    tool_router: ToolRouter<CalorieService>,
}

impl CalorieService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TipsParams {
    /// general, weight_loss, muscle_gain or endurance (default general)
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    /// Nutrient or topic to look up, e.g. "iron" or "鐵"
    pub query: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SuggestionParams {
    /// Daily calorie budget (default 2000)
    pub calories: Option<i64>,
    /// weight_loss, maintenance or muscle_gain (default maintenance)
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProfileParams {
    /// Age in years (default 25)
    pub age: Option<u32>,
    /// Weight in kg (default 70)
    pub weight: Option<f64>,
    /// Height in cm (default 170)
    pub height: Option<f64>,
    /// male or female (default male)
    pub gender: Option<String>,
    /// sedentary, light, moderate, active or very_active (default moderate)
    pub activity_level: Option<String>,
    /// weight_loss, maintenance or muscle_gain (default maintenance)
    pub goal: Option<String>,
}

impl From<ProfileParams> for UserProfile {
    fn from(p: ProfileParams) -> Self {
        let defaults = UserProfile::default();
        Self {
            age: p.age.unwrap_or(defaults.age),
            weight: p.weight.unwrap_or(defaults.weight),
            height: p.height.unwrap_or(defaults.height),
            gender: p.gender.as_deref().map(Gender::parse).unwrap_or(defaults.gender),
            activity_level: p
                .activity_level
                .as_deref()
                .map(ActivityLevel::parse)
                .unwrap_or(defaults.activity_level),
            goal: p.goal.as_deref().map(Goal::parse).unwrap_or(defaults.goal),
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WorkoutParams {
    /// strength_training, cardio or endurance (default strength_training)
    pub workout_type: Option<String>,
    /// Session length in minutes (default 60)
    pub duration: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealsParams {
    /// Page number, starting at 1
    pub page: Option<i64>,
    /// Records per page (default 10, max 100)
    pub per_page: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteMealParams {
    /// Meal record ID to delete
    pub id: i64,
}

fn to_mcp_error(e: AppError) -> McpError {
    match e {
        AppError::Validation(_) | AppError::NotFound(_) => McpError::invalid_params(e.to_string(), None),
        _ => McpError::internal_error(e.to_string(), None),
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl CalorieService {
    // --- Status ---

    #[tool(description = "Get the current status of the calorie counter including build info, database status, lookup tiers and process information")]
    async fn status(&self) -> Result<CallToolResult, McpError> {
        json_result(&self.state.service_status())
    }

    // --- Nutrition ---

    #[tool(description = "Get curated nutrition tips for a category: general, weight_loss, muscle_gain or endurance")]
    fn nutrition_tips(&self, Parameters(p): Parameters<TipsParams>) -> Result<CallToolResult, McpError> {
        json_result(&nutrition::nutrition_tips(&self.state.catalog, p.category.as_deref()))
    }

    #[tool(description = "Search nutrition guidance. Tries live fitness sites, then the built-in knowledgebase (with synonyms such as 鐵 for iron), then a generic answer")]
    async fn search_nutrition(&self, Parameters(p): Parameters<SearchParams>) -> Result<CallToolResult, McpError> {
        let result = nutrition::search_nutrition(&self.state.resolver, &p.query)
            .await
            .map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Suggest breakfast, lunch, dinner and snack for a daily calorie budget and goal. Each call draws a new randomized plan")]
    fn meal_suggestions(&self, Parameters(p): Parameters<SuggestionParams>) -> Result<CallToolResult, McpError> {
        let calories = p.calories.unwrap_or(nutrition::DEFAULT_DAILY_CALORIES);
        let goal = Goal::parse(p.goal.as_deref().unwrap_or("maintenance"));
        let mut random = RngSource::from_entropy();
        json_result(&nutrition::meal_suggestions(&self.state.catalog, calories, goal, &mut random))
    }

    #[tool(description = "Personalized calorie, protein and carbohydrate advice from age, weight, height, gender, activity level and goal")]
    fn personalized_advice(&self, Parameters(p): Parameters<ProfileParams>) -> Result<CallToolResult, McpError> {
        let profile = UserProfile::from(p);
        json_result(&nutrition::personalized_advice(&profile))
    }

    #[tool(description = "Pre-, during- and post-workout nutrition plan for strength_training, cardio or endurance")]
    fn workout_plan(&self, Parameters(p): Parameters<WorkoutParams>) -> Result<CallToolResult, McpError> {
        json_result(&nutrition::workout_plan(
            &self.state.catalog,
            p.workout_type.as_deref(),
            p.duration,
        ))
    }

    #[tool(description = "List every entry of the built-in nutrition knowledgebase")]
    fn nutrition_database(&self) -> Result<CallToolResult, McpError> {
        json_result(&nutrition::nutrition_database(&self.state.catalog))
    }

    // --- Meal Records ---

    #[tool(description = "Save a meal record with its foods. total_calories defaults to the sum of the foods; a differing total is stored and reported as inconsistent")]
    fn save_meal(&self, Parameters(p): Parameters<meals::SaveMealRequest>) -> Result<CallToolResult, McpError> {
        let result = meals::save_meal(&self.state.database, p).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "List saved meal records, newest first, with pagination")]
    fn list_meals(&self, Parameters(p): Parameters<ListMealsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_meals(&self.state.database, p.page, p.per_page).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Delete a meal record and all of its foods")]
    fn delete_meal(&self, Parameters(p): Parameters<DeleteMealParams>) -> Result<CallToolResult, McpError> {
        let result = meals::delete_meal(&self.state.database, p.id).map_err(to_mcp_error)?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for CalorieService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "calorie-counter".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Calorie Counter".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Calorie Counter - meal records and nutrition guidance. \
                 Meals: save_meal/list_meals/delete_meal. \
                 Guidance: nutrition_tips, search_nutrition, meal_suggestions, personalized_advice, \
                 workout_plan, nutrition_database. \
                 Service: status."
                    .into(),
            ),
        }
    }
}
