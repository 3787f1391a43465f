//! Meal Record model
//!
//! A saved meal: a declared calorie total plus the foods it was made of.
//! The declared total is stored as given; whether it matches the sum of the
//! food items is reported alongside, never enforced.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use super::{FoodItem, FoodItemCreate};
use crate::db::DbResult;

const STORED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A meal record row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: i64,
    pub date: String,
    pub total_calories: i64,
}

/// Data for creating a meal record together with its foods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecordCreate {
    pub total_calories: i64,
    pub foods: Vec<FoodItemCreate>,
}

/// Meal record with its food items, as listed to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecordDetail {
    pub id: i64,
    pub date: String,
    pub total_calories: i64,
    pub foods: Vec<FoodItem>,
}

/// One page of meal records, newest first
#[derive(Debug, Clone, Serialize)]
pub struct MealRecordPage {
    pub meals: Vec<MealRecordDetail>,
    pub total: i64,
    pub pages: i64,
    pub current_page: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl MealRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            total_calories: row.get("total_calories")?,
        })
    }

    /// Insert a meal record and all of its food items.
    ///
    /// Callers wanting all-or-nothing behaviour pass a transaction.
    pub fn create(conn: &Connection, data: &MealRecordCreate) -> DbResult<MealRecordDetail> {
        conn.execute(
            "INSERT INTO meal_records (total_calories) VALUES (?1)",
            params![data.total_calories],
        )?;
        let id = conn.last_insert_rowid();

        let foods = data
            .foods
            .iter()
            .map(|food| FoodItem::create(conn, id, food))
            .collect::<DbResult<Vec<_>>>()?;

        let record = Self::get_by_id(conn, id)?
            .ok_or(crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))?;

        Ok(MealRecordDetail {
            id,
            date: display_date(&record.date),
            total_calories: record.total_calories,
            foods,
        })
    }

    /// Get a meal record by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let record = conn
            .query_row(
                "SELECT * FROM meal_records WHERE id = ?1",
                [id],
                Self::from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Count all meal records
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM meal_records", [], |row| row.get(0))?;
        Ok(count)
    }

    /// List a page of meal records, newest first.
    ///
    /// `page` is 1-based; both arguments are expected to be clamped already.
    pub fn list_page(conn: &Connection, page: i64, per_page: i64) -> DbResult<MealRecordPage> {
        let total = Self::count(conn)?;
        let offset = (page - 1).saturating_mul(per_page);

        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM meal_records
            ORDER BY date DESC, id DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )?;
        let records = stmt
            .query_map(params![per_page, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let meals = records
            .into_iter()
            .map(|record| record.into_detail(conn))
            .collect::<DbResult<Vec<_>>>()?;

        let pages = (total + per_page - 1) / per_page;

        Ok(MealRecordPage {
            meals,
            total,
            pages,
            current_page: page,
            has_next: page < pages,
            has_prev: page > 1,
        })
    }

    /// Delete a meal record; its food items go with it. Returns false if absent.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let affected = conn.execute("DELETE FROM meal_records WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    fn into_detail(self, conn: &Connection) -> DbResult<MealRecordDetail> {
        let foods = FoodItem::list_for_meal(conn, self.id)?;
        Ok(MealRecordDetail {
            id: self.id,
            date: display_date(&self.date),
            total_calories: self.total_calories,
            foods,
        })
    }
}

/// `2025-01-09 12:30:45` becomes `2025-01-09 12:30`; unknown formats pass through
fn display_date(stored: &str) -> String {
    NaiveDateTime::parse_from_str(stored, STORED_DATE_FORMAT)
        .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| stored.to_string())
}
