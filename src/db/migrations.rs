//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;
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
    if current_version >= SCHEMA_VERSION {
        return Ok(());
    }

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        info!(version = 1, "applied schema migration");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- MACROS
        -- Running totals, one row per tracked day.
        -- The date index is not UNIQUE: the repository
        -- keeps one row per day, not the store.
        -- ============================================
        CREATE TABLE macros (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            calories INTEGER NOT NULL DEFAULT 0,
            fat REAL NOT NULL DEFAULT 0,         -- grams
            carbs REAL NOT NULL DEFAULT 0,       -- grams
            fiber REAL NOT NULL DEFAULT 0,       -- grams
            protein REAL NOT NULL DEFAULT 0,     -- grams
            water REAL NOT NULL DEFAULT 0,       -- grams
            sodium REAL NOT NULL DEFAULT 0,      -- milligrams
            date INTEGER NOT NULL                -- epoch day
        );

        CREATE INDEX idx_macros_date ON macros(date);

        -- ============================================
        -- MEALS
        -- Groups food log entries sharing a date
        -- ============================================
        CREATE TABLE meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date INTEGER NOT NULL                -- epoch day
        );

        CREATE INDEX idx_meals_date ON meals(date);

        -- ============================================
        -- FOODS
        -- One row per addition event. meal_id is a plain
        -- column: removing a meal never cascades here.
        -- ============================================
        CREATE TABLE foods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,                  -- catalog key
            weight INTEGER NOT NULL CHECK(weight > 0), -- grams
            meal_id INTEGER NOT NULL
        );

        CREATE INDEX idx_foods_name ON foods(name);
        CREATE INDEX idx_foods_meal ON foods(meal_id);

        -- ============================================
        -- TARGETS
        -- Daily macro goals
        -- ============================================
        CREATE TABLE targets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            calories INTEGER NOT NULL DEFAULT 0,
            fat REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,
            fiber REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,
            water REAL NOT NULL DEFAULT 0,
            sodium REAL NOT NULL DEFAULT 0,
            date INTEGER NOT NULL UNIQUE         -- epoch day
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}
