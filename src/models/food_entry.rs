//! Food log entry model
//!
//! One row per food addition, grouped under a meal.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A logged quantity of a catalog food
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodLogEntry {
    pub id: i64,
    pub name: String,
    pub weight: i64, // grams
    pub meal_id: i64,
}

impl FoodLogEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            weight: row.get("weight")?,
            meal_id: row.get("meal_id")?,
        })
    }

    /// Insert a new entry
    pub fn create(conn: &Connection, name: &str, weight: i64, meal_id: i64) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO foods (name, weight, meal_id) VALUES (?1, ?2, ?3)",
            params![name, weight, meal_id],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get an entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM foods WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All entries with this name, across every meal
    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM foods WHERE name = ?1 ORDER BY id")?;

        let entries = stmt
            .query_map([name], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// All entries of a meal
    pub fn get_by_meal_id(conn: &Connection, meal_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM foods WHERE meal_id = ?1 ORDER BY id")?;

        let entries = stmt
            .query_map([meal_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// The oldest entry of `name` within a meal
    pub fn get_by_name_and_meal_id(
        conn: &Connection,
        name: &str,
        meal_id: i64,
    ) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM foods WHERE name = ?1 AND meal_id = ?2 ORDER BY id LIMIT 1",
        )?;

        let result = stmt.query_row(params![name, meal_id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Number of entries in a meal
    pub fn count_for_meal(conn: &Connection, meal_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM foods WHERE meal_id = ?1",
            [meal_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Set the stored weight
    pub fn update_weight(conn: &Connection, id: i64, weight: i64) -> DbResult<Option<Self>> {
        conn.execute(
            "UPDATE foods SET weight = ?1 WHERE id = ?2",
            params![weight, id],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Delete an entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM foods WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Delete every entry
    pub fn delete_all(conn: &Connection) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM foods", [])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_lookup_by_name_and_meal() {
        let conn = conn();
        FoodLogEntry::create(&conn, "carrot", 100, 1).unwrap();
        FoodLogEntry::create(&conn, "carrot", 50, 2).unwrap();
        FoodLogEntry::create(&conn, "apple", 80, 1).unwrap();

        assert_eq!(FoodLogEntry::get_by_name(&conn, "carrot").unwrap().len(), 2);
        assert_eq!(FoodLogEntry::get_by_meal_id(&conn, 1).unwrap().len(), 2);

        let entry = FoodLogEntry::get_by_name_and_meal_id(&conn, "carrot", 2)
            .unwrap()
            .unwrap();
        assert_eq!(entry.weight, 50);
        assert!(FoodLogEntry::get_by_name_and_meal_id(&conn, "apple", 2)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_update_weight_and_delete() {
        let conn = conn();
        let entry = FoodLogEntry::create(&conn, "rice", 200, 3).unwrap();

        let updated = FoodLogEntry::update_weight(&conn, entry.id, 120).unwrap().unwrap();
        assert_eq!(updated.weight, 120);
        assert_eq!(FoodLogEntry::count_for_meal(&conn, 3).unwrap(), 1);

        assert!(FoodLogEntry::delete(&conn, entry.id).unwrap());
        assert!(!FoodLogEntry::delete(&conn, entry.id).unwrap());
        assert_eq!(FoodLogEntry::count_for_meal(&conn, 3).unwrap(), 0);
    }
}
