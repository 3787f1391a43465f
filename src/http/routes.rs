//! Route handlers
//!
//! Query parameters are read as strings and parsed leniently: a value that
//! does not parse is treated as absent.

use std::str::FromStr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::nutrition::{Goal, RngSource};
use crate::state::AppState;
use crate::tools::{meals, nutrition};

type SharedState = State<Arc<AppState>>;

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionQuery {
    calories: Option<String>,
    goal: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkoutQuery {
    #[serde(rename = "type")]
    workout_type: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
    per_page: Option<String>,
}

fn parse_lenient<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Run blocking database work off the async executor
async fn blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Worker task failed: {}", e)))?
}

/// Meal endpoints report failures as `{success: false, message}`
pub struct MealFailure(AppError);

impl From<AppError> for MealFailure {
    fn from(e: AppError) -> Self {
        MealFailure(e)
    }
}

impl IntoResponse for MealFailure {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self.0);
        }
        (
            status,
            Json(json!({ "success": false, "message": self.0.to_string() })),
        )
            .into_response()
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn status(State(state): SharedState) -> impl IntoResponse {
    Json(state.service_status())
}

pub async fn upload(State(state): SharedState, body: Bytes) -> AppResult<Json<Value>> {
    if body.is_empty() {
        return Err(AppError::validation("No image uploaded"));
    }
    let calories = state.estimator.estimate(&body).await?;
    Ok(Json(json!({ "calories": calories })))
}

pub async fn save_meal(
    State(state): SharedState,
    payload: Result<Json<meals::SaveMealRequest>, JsonRejection>,
) -> Result<impl IntoResponse, MealFailure> {
    let Json(request) =
        payload.map_err(|e| AppError::validation(format!("Invalid meal data: {}", e.body_text())))?;
    let saved = blocking(move || meals::save_meal(&state.database, request)).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn list_meals(
    State(state): SharedState,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let page = parse_lenient(query.page.as_deref());
    let per_page = parse_lenient(query.per_page.as_deref());
    let listing = blocking(move || meals::list_meals(&state.database, page, per_page)).await?;
    Ok(Json(listing))
}

pub async fn delete_meal(
    State(state): SharedState,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, MealFailure> {
    let deleted = blocking(move || meals::delete_meal(&state.database, id)).await?;
    Ok(Json(deleted))
}

pub async fn nutrition_tips(
    State(state): SharedState,
    Query(query): Query<CategoryQuery>,
) -> impl IntoResponse {
    Json(nutrition::nutrition_tips(&state.catalog, query.category.as_deref()))
}

pub async fn search_nutrition(
    State(state): SharedState,
    Query(query): Query<SearchQuery>,
) -> AppResult<impl IntoResponse> {
    let response =
        nutrition::search_nutrition(&state.resolver, query.query.as_deref().unwrap_or_default())
            .await?;
    Ok(Json(response))
}

pub async fn meal_suggestions(
    State(state): SharedState,
    Query(query): Query<SuggestionQuery>,
) -> impl IntoResponse {
    let calories =
        parse_lenient(query.calories.as_deref()).unwrap_or(nutrition::DEFAULT_DAILY_CALORIES);
    let goal = Goal::parse(query.goal.as_deref().unwrap_or("maintenance"));
    let mut random = RngSource::from_entropy();
    Json(nutrition::meal_suggestions(&state.catalog, calories, goal, &mut random))
}

pub async fn personalized_advice(body: Bytes) -> AppResult<impl IntoResponse> {
    let body: Option<Value> = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        Some(
            serde_json::from_slice(&body)
                .map_err(|e| AppError::validation(format!("Invalid JSON body: {}", e)))?,
        )
    };
    Ok(Json(nutrition::personalized_advice_from_body(body)?))
}

pub async fn workout_plan(
    State(state): SharedState,
    Query(query): Query<WorkoutQuery>,
) -> impl IntoResponse {
    let duration = parse_lenient(query.duration.as_deref());
    Json(nutrition::workout_plan(
        &state.catalog,
        query.workout_type.as_deref(),
        duration,
    ))
}

pub async fn scrape_websites(
    State(state): SharedState,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    Json(nutrition::scrape_websites(state.live.as_deref(), query.query.as_deref()).await)
}

pub async fn nutrition_database(State(state): SharedState) -> impl IntoResponse {
    Json(nutrition::nutrition_database(&state.catalog))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lenient() {
        assert_eq!(parse_lenient::<i64>(Some(" 1800 ")), Some(1800));
        assert_eq!(parse_lenient::<i64>(Some("lots")), None);
        assert_eq!(parse_lenient::<i64>(Some("12.5")), None);
        assert_eq!(parse_lenient::<i64>(None), None);
    }
}
