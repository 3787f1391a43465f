//! HTTP surface
//!
//! JSON endpoints over the shared [`AppState`](crate::state::AppState).

mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Largest accepted food photo
pub const MAX_IMAGE_BYTES: usize = 16 * 1024 * 1024;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/status", get(routes::status))
        .route(
            "/upload",
            post(routes::upload).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
        .route("/save_meal", post(routes::save_meal))
        .route("/api/meals", get(routes::list_meals))
        .route("/delete_meal/:id", delete(routes::delete_meal))
        .route("/api/nutrition/tips", get(routes::nutrition_tips))
        .route("/api/nutrition/search", get(routes::search_nutrition))
        .route("/api/nutrition/meal-suggestions", get(routes::meal_suggestions))
        .route("/api/nutrition/personalized", post(routes::personalized_advice))
        .route("/api/nutrition/workout-plan", get(routes::workout_plan))
        .route("/api/nutrition/scrape-websites", get(routes::scrape_websites))
        .route("/api/nutrition/database", get(routes::nutrition_database))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
