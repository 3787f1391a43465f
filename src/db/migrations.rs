//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    if current_version < SCHEMA_VERSION {
        info!(from = current_version, to = SCHEMA_VERSION, "Schema migrated");
    }

    Ok(())
}

/// Migration v1: meal records and their food items
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- MEAL RECORDS
        -- One saved meal with its declared total
        -- ============================================
        CREATE TABLE meal_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL DEFAULT (datetime('now')),
            total_calories INTEGER NOT NULL
        );

        CREATE INDEX idx_meal_records_date ON meal_records(date);

        -- ============================================
        -- FOOD ITEMS
        -- Individual foods inside a meal record
        -- ============================================
        CREATE TABLE food_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            calories INTEGER NOT NULL,
            meal_record_id INTEGER NOT NULL REFERENCES meal_records(id) ON DELETE CASCADE
        );

        CREATE INDEX idx_food_items_meal_record ON food_items(meal_record_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: Option<i32> = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(version.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_food_items_cascade_with_record() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();

        conn.execute("INSERT INTO meal_records (total_calories) VALUES (500)", [])
            .unwrap();
        let id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO food_items (name, calories, meal_record_id) VALUES ('rice', 300, ?1), ('egg', 200, ?1)",
            [id],
        )
        .unwrap();
        conn.execute("DELETE FROM meal_records WHERE id = ?1", [id]).unwrap();

        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM food_items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
