//! Macro target model
//!
//! Daily macro goals. A target applies from its date until the next one.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::Macros;

/// A macro goal effective from `date`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroTarget {
    pub id: i64,
    pub macros: Macros,
    pub date: i64, // epoch day
}

impl MacroTarget {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            macros: Macros::from_row(row)?,
            date: row.get("date")?,
        })
    }

    /// Insert or replace the target for `date`
    pub fn upsert(conn: &Connection, date: i64, macros: &Macros) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO targets (calories, fat, carbs, fiber, protein, water, sodium, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(date) DO UPDATE SET
                calories = excluded.calories,
                fat = excluded.fat,
                carbs = excluded.carbs,
                fiber = excluded.fiber,
                protein = excluded.protein,
                water = excluded.water,
                sodium = excluded.sodium
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

        Self::get_by_date(conn, date)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get the target set exactly on `date`
    pub fn get_by_date(conn: &Connection, date: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM targets WHERE date = ?1")?;

        let result = stmt.query_row([date], Self::from_row);
        match result {
            Ok(target) => Ok(Some(target)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the most recent target dated on or before `date`
    pub fn get_effective(conn: &Connection, date: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM targets WHERE date <= ?1 ORDER BY date DESC LIMIT 1",
        )?;

        let result = stmt.query_row([date], Self::from_row);
        match result {
            Ok(target) => Ok(Some(target)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All targets, newest first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM targets ORDER BY date DESC")?;

        let targets = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(targets)
    }

    /// Delete every target
    pub fn delete_all(conn: &Connection) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM targets", [])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn goal(calories: i64) -> Macros {
        Macros {
            calories,
            protein: 120.0,
            ..Macros::zero()
        }
    }

    #[test]
    fn test_upsert_replaces_same_date() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let first = MacroTarget::upsert(&conn, 100, &goal(2000)).unwrap();
        let second = MacroTarget::upsert(&conn, 100, &goal(1800)).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.macros.calories, 1800);
        assert_eq!(MacroTarget::list(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_effective_target_is_latest_before_date() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        MacroTarget::upsert(&conn, 10, &goal(2000)).unwrap();
        MacroTarget::upsert(&conn, 20, &goal(2200)).unwrap();

        assert!(MacroTarget::get_effective(&conn, 9).unwrap().is_none());
        assert_eq!(MacroTarget::get_effective(&conn, 15).unwrap().unwrap().macros.calories, 2000);
        assert_eq!(MacroTarget::get_effective(&conn, 20).unwrap().unwrap().macros.calories, 2200);

        let dates: Vec<i64> = MacroTarget::list(&conn).unwrap().iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![20, 10]);
    }
}
