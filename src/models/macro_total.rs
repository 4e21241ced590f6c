//! Macro total model
//!
//! Running macro totals for a tracked day.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::Macros;

/// Aggregated macros for one epoch day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroTotal {
    pub id: i64,
    pub macros: Macros,
    pub date: i64, // epoch day
}

impl MacroTotal {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            macros: Macros::from_row(row)?,
            date: row.get("date")?,
        })
    }

    /// Insert a new total for `date`
    pub fn create(conn: &Connection, date: i64, macros: &Macros) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO macros (calories, fat, carbs, fiber, protein, water, sodium, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                macros.calories,
                macros.fat,
                macros.carbs,
                macros.fiber,
                macros.protein,
                macros.water,
                macros.sodium,
                date,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a total by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM macros WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(total) => Ok(Some(total)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the total for a date, lowest id first if several exist
    pub fn get_by_date(conn: &Connection, date: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM macros WHERE date = ?1 ORDER BY id LIMIT 1")?;

        let result = stmt.query_row([date], Self::from_row);
        match result {
            Ok(total) => Ok(Some(total)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List totals, optionally only those for one date
    pub fn list(conn: &Connection, date: Option<i64>) -> DbResult<Vec<Self>> {
        let totals = match date {
            Some(date) => {
                let mut stmt = conn.prepare("SELECT * FROM macros WHERE date = ?1 ORDER BY id")?;
                let rows = stmt
                    .query_map([date], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare("SELECT * FROM macros ORDER BY date, id")?;
                let rows = stmt
                    .query_map([], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(totals)
    }

    /// List totals with `start <= date <= end`
    pub fn list_by_date_range(conn: &Connection, start: i64, end: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM macros WHERE date >= ?1 AND date <= ?2 ORDER BY date, id",
        )?;

        let totals = stmt
            .query_map(params![start, end], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    /// Replace the macro values of a row, keeping id and date
    pub fn update(conn: &Connection, id: i64, macros: &Macros) -> DbResult<Option<Self>> {
        conn.execute(
            r#"
            UPDATE macros SET
                calories = ?1,
                fat = ?2,
                carbs = ?3,
                fiber = ?4,
                protein = ?5,
                water = ?6,
                sodium = ?7
            WHERE id = ?8
            "#,
            params![
                macros.calories,
                macros.fat,
                macros.carbs,
                macros.fiber,
                macros.protein,
                macros.water,
                macros.sodium,
                id,
            ],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Delete every total
    pub fn delete_all(conn: &Connection) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM macros", [])?)
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

    fn macros(calories: i64) -> Macros {
        Macros {
            calories,
            fat: 1.5,
            ..Macros::zero()
        }
    }

    #[test]
    fn test_create_and_get_by_date() {
        let conn = conn();
        let created = MacroTotal::create(&conn, 19000, &macros(100)).unwrap();

        let found = MacroTotal::get_by_date(&conn, 19000).unwrap().unwrap();
        assert_eq!(found, created);
        assert!(MacroTotal::get_by_date(&conn, 19001).unwrap().is_none());
    }

    #[test]
    fn test_store_allows_duplicate_dates() {
        let conn = conn();
        MacroTotal::create(&conn, 5, &macros(1)).unwrap();
        MacroTotal::create(&conn, 5, &macros(2)).unwrap();

        assert_eq!(MacroTotal::list(&conn, Some(5)).unwrap().len(), 2);
    }

    #[test]
    fn test_list_by_date_range_is_inclusive() {
        let conn = conn();
        for date in 1..=4 {
            MacroTotal::create(&conn, date, &macros(date * 10)).unwrap();
        }

        let dates: Vec<i64> = MacroTotal::list_by_date_range(&conn, 2, 3)
            .unwrap()
            .into_iter()
            .map(|t| t.date)
            .collect();
        assert_eq!(dates, vec![2, 3]);
    }

    #[test]
    fn test_update_keeps_id_and_date() {
        let conn = conn();
        let created = MacroTotal::create(&conn, 7, &macros(10)).unwrap();

        let updated = MacroTotal::update(&conn, created.id, &macros(25)).unwrap().unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.date, 7);
        assert_eq!(updated.macros.calories, 25);
    }

    #[test]
    fn test_delete_all() {
        let conn = conn();
        MacroTotal::create(&conn, 1, &macros(1)).unwrap();
        MacroTotal::create(&conn, 2, &macros(2)).unwrap();

        assert_eq!(MacroTotal::delete_all(&conn).unwrap(), 2);
        assert!(MacroTotal::list(&conn, None).unwrap().is_empty());
    }
}
