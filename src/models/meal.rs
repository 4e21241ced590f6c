//! Meal group model

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A meal on a given day, grouping food log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealGroup {
    pub id: i64,
    pub date: i64, // epoch day
}

impl MealGroup {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
        })
    }

    /// Insert a new meal for `date`
    pub fn create(conn: &Connection, date: i64) -> DbResult<Self> {
        conn.execute("INSERT INTO meals (date) VALUES (?1)", [date])?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a meal by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(meal) => Ok(Some(meal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All meals on a date, in creation order
    pub fn get_by_date(conn: &Connection, date: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE date = ?1 ORDER BY id")?;

        let meals = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    /// Delete a meal
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meals WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Delete every meal
    pub fn delete_all(conn: &Connection) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM meals", [])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_meal_lifecycle() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let breakfast = MealGroup::create(&conn, 20000).unwrap();
        let lunch = MealGroup::create(&conn, 20000).unwrap();
        MealGroup::create(&conn, 20001).unwrap();

        assert_eq!(MealGroup::get_by_date(&conn, 20000).unwrap(), vec![breakfast, lunch]);

        assert!(MealGroup::delete(&conn, breakfast.id).unwrap());
        assert!(MealGroup::get_by_id(&conn, breakfast.id).unwrap().is_none());
        assert_eq!(MealGroup::get_by_id(&conn, lunch.id).unwrap(), Some(lunch));
    }
}
