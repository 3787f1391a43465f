//! Meal record tools
//!
//! Save, list and delete meal records with their food items.

use rmcp::schemars;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{FoodItem, FoodItemCreate, MealRecord, MealRecordCreate, MealRecordPage};

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;
pub const MAX_PAGE: i64 = 1_000_000;

/// One food in a meal being saved
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct FoodEntry {
    /// Food name
    pub name: String,
    /// Calories of this food
    pub calories: i64,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct SaveMealRequest {
    /// Foods eaten in this meal
    #[serde(default)]
    pub foods: Vec<FoodEntry>,
    /// Declared meal total; defaults to the sum of the foods
    pub total_calories: Option<i64>,
}

/// Response for save_meal
#[derive(Debug, Serialize)]
pub struct SaveMealResponse {
    pub success: bool,
    pub message: String,
    pub id: i64,
    pub date: String,
    pub total_calories: i64,
    /// Sum of the food items' calories
    pub items_total: i64,
    /// Whether the declared total equals `items_total`
    pub consistent: bool,
    pub foods: Vec<FoodItem>,
}

/// Response for delete_meal
#[derive(Debug, Serialize)]
pub struct DeleteMealResponse {
    pub success: bool,
    pub message: String,
}

/// Store a meal and its foods in one transaction
pub fn save_meal(db: &Database, request: SaveMealRequest) -> AppResult<SaveMealResponse> {
    let mut foods = Vec::with_capacity(request.foods.len());
    for food in request.foods {
        let name = food.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Food name cannot be empty"));
        }
        if food.calories < 0 {
            return Err(AppError::validation(format!(
                "Calories for {} cannot be negative",
                name
            )));
        }
        foods.push(FoodItemCreate {
            name: name.to_string(),
            calories: food.calories,
        });
    }

    if foods.is_empty() && request.total_calories.is_none() {
        return Err(AppError::validation(
            "Provide at least one food or a total_calories value",
        ));
    }

    let items_total = foods
        .iter()
        .try_fold(0i64, |sum, f| sum.checked_add(f.calories))
        .ok_or_else(|| AppError::validation("Total calories of the foods is too large"))?;
    let total_calories = request.total_calories.unwrap_or(items_total);
    if total_calories < 0 {
        return Err(AppError::validation("total_calories cannot be negative"));
    }

    let data = MealRecordCreate {
        total_calories,
        foods,
    };
    let record = db.in_transaction(|tx| MealRecord::create(tx, &data).map_err(AppError::from))?;

    let consistent = record.total_calories == items_total;
    info!(
        id = record.id,
        total_calories, items_total, "Saved meal record with {} foods",
        record.foods.len()
    );

    Ok(SaveMealResponse {
        success: true,
        message: "Meal record saved".to_string(),
        id: record.id,
        date: record.date,
        total_calories: record.total_calories,
        items_total,
        consistent,
        foods: record.foods,
    })
}

/// A page of meal records, newest first
pub fn list_meals(db: &Database, page: Option<i64>, per_page: Option<i64>) -> AppResult<MealRecordPage> {
    let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);

    let conn = db.get_conn()?;
    Ok(MealRecord::list_page(&conn, page, per_page)?)
}

/// Delete a meal record and its foods
pub fn delete_meal(db: &Database, id: i64) -> AppResult<DeleteMealResponse> {
    let deleted = db.in_transaction(|tx| MealRecord::delete(tx, id).map_err(AppError::from))?;
    if !deleted {
        return Err(AppError::NotFound(format!("Meal record {} not found", id)));
    }

    info!(id, "Deleted meal record");
    Ok(DeleteMealResponse {
        success: true,
        message: "Meal record deleted".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("meals.db")).unwrap();
        (dir, db)
    }

    fn request(foods: &[(&str, i64)], total: Option<i64>) -> SaveMealRequest {
        SaveMealRequest {
            foods: foods
                .iter()
                .map(|(name, calories)| FoodEntry {
                    name: name.to_string(),
                    calories: *calories,
                })
                .collect(),
            total_calories: total,
        }
    }

    #[test]
    fn test_save_defaults_total_to_item_sum() {
        let (_dir, db) = setup();
        let saved = save_meal(&db, request(&[("rice", 300), (" egg ", 90)], None)).unwrap();
        assert_eq!(saved.total_calories, 390);
        assert!(saved.consistent);
        assert_eq!(saved.foods[1].name, "egg");
    }

    #[test]
    fn test_save_reports_inconsistent_total() {
        let (_dir, db) = setup();
        let saved = save_meal(&db, request(&[("rice", 300)], Some(500))).unwrap();
        assert_eq!(saved.total_calories, 500);
        assert_eq!(saved.items_total, 300);
        assert!(!saved.consistent);
    }

    #[test]
    fn test_save_validation() {
        let (_dir, db) = setup();
        assert!(matches!(
            save_meal(&db, request(&[("", 100)], None)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            save_meal(&db, request(&[("soup", -5)], None)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            save_meal(&db, request(&[], None)),
            Err(AppError::Validation(_))
        ));
        assert_eq!(list_meals(&db, None, None).unwrap().total, 0);
    }

    #[test]
    fn test_list_clamps_paging() {
        let (_dir, db) = setup();
        for i in 0..3 {
            save_meal(&db, request(&[("item", 100 + i)], None)).unwrap();
        }

        let page = list_meals(&db, Some(0), Some(500)).unwrap();
        assert_eq!(page.current_page, 1);
        assert_eq!(page.meals.len(), 3);
        assert_eq!(page.meals[0].total_calories, 102);

        let page = list_meals(&db, Some(2), Some(-1)).unwrap();
        assert_eq!(page.pages, 3);
        assert_eq!(page.meals.len(), 1);
    }

    #[test]
    fn test_save_rejects_calorie_overflow() {
        let (_dir, db) = setup();
        assert!(matches!(
            save_meal(&db, request(&[("a", i64::MAX), ("b", 1)], None)),
            Err(AppError::Validation(_))
        ));
        assert_eq!(list_meals(&db, None, None).unwrap().total, 0);
    }

    #[test]
    fn test_list_huge_page_is_empty() {
        let (_dir, db) = setup();
        save_meal(&db, request(&[("toast", 120)], None)).unwrap();

        let page = list_meals(&db, Some(i64::MAX), Some(MAX_PER_PAGE)).unwrap();
        assert_eq!(page.current_page, MAX_PAGE);
        assert!(page.meals.is_empty());
        assert_eq!(page.total, 1);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_delete_meal() {
        let (_dir, db) = setup();
        let saved = save_meal(&db, request(&[("apple", 95)], None)).unwrap();
        assert!(delete_meal(&db, saved.id).unwrap().success);
        assert!(matches!(delete_meal(&db, saved.id), Err(AppError::NotFound(_))));
    }
}
