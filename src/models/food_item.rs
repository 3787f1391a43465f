//! Food Item model
//!
//! A single food inside a saved meal record.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A food item belonging to a meal record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub calories: i64,
    pub meal_record_id: i64,
}

/// Data for creating a food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemCreate {
    pub name: String,
    pub calories: i64,
}

impl FoodItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            calories: row.get("calories")?,
            meal_record_id: row.get("meal_record_id")?,
        })
    }

    /// Insert a food item under an existing meal record
    pub fn create(conn: &Connection, meal_record_id: i64, data: &FoodItemCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO food_items (name, calories, meal_record_id) VALUES (?1, ?2, ?3)",
            params![data.name, data.calories, meal_record_id],
        )?;

        Ok(Self {
            id: conn.last_insert_rowid(),
            name: data.name.clone(),
            calories: data.calories,
            meal_record_id,
        })
    }

    /// All food items of a meal record, in insertion order
    pub fn list_for_meal(conn: &Connection, meal_record_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_items WHERE meal_record_id = ?1 ORDER BY id ASC",
        )?;

        let items = stmt
            .query_map([meal_record_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }
}
