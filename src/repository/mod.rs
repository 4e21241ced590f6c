//! Macro aggregation repository
//!
//! The only write path to the tracker tables. Keeps each day's row in
//! `macros` equal to the sum of the food log for that day.
//!
//! Every mutation runs in a single `BEGIN IMMEDIATE` transaction on the
//! blocking thread pool. SQLite's write lock is taken before the day's total is
//! read, so concurrent adds and removes for the same date cannot lose updates.
//! Subscribers are notified from the blocking task right after commit, so a
//! caller that stops awaiting still publishes the change.

mod error;
mod subscription;


use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::db::{migrations, Database};
use crate::models::{FoodLogEntry, MacroTarget, MacroTotal, Macros, MealGroup, NutrientProfile};
use crate::nutrition::{macros_for_weight, ScalingMode};

pub use error::{RepositoryError, RepositoryResult};
pub use subscription::{Subscription, Table};

/// Buffered change notifications per subscriber before it is marked lagged
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// A meal with its logged foods
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealDetail {
    pub meal: MealGroup,
    pub foods: Vec<FoodLogEntry>,
}

/// Everything tracked on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: i64,
    pub totals: Macros,
    pub meals: Vec<MealDetail>,
    pub target: Option<MacroTarget>,
}

/// Result of a removal that found something to remove
struct Removal {
    remaining_weight: i64,
    meal_deleted: bool,
}

/// Run blocking database work off the async executor
pub(crate) async fn run_blocking<F, T>(f: F) -> RepositoryResult<T>
where
    F: FnOnce() -> RepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// Publish table changes. No receivers is not an error.
fn notify(changes: &broadcast::Sender<Table>, tables: &[Table]) {
    for table in tables {
        let _ = changes.send(*table);
    }
}

fn validate_weight(weight: i64) -> RepositoryResult<()> {
    if weight < 1 {
        return Err(RepositoryError::invalid("weight must be at least 1"));
    }
    Ok(())
}

/// Repository over the macro, food, meal, and target tables
#[derive(Clone)]
pub struct MacroRepository {
    db: Database,
    scaling: ScalingMode,
    changes: broadcast::Sender<Table>,
}

impl MacroRepository {
    /// Wrap an already migrated database
    pub fn new(db: Database, scaling: ScalingMode) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { db, scaling, changes }
    }

    /// Open the database described by `config`, apply migrations, and build
    /// the repository. The database file's directory must already exist.
    pub fn open(config: &TrackerConfig) -> RepositoryResult<Self> {
        let db = match &config.database_path {
            Some(path) => {
                info!(path = %path.display(), pool_size = config.pool_size, "opening database");
                Database::new(path, config.pool_size)?
            }
            None => {
                info!("opening in-memory database");
                Database::in_memory()?
            }
        };

        db.with_conn(migrations::run_migrations)?;
        Ok(Self::new(db, config.scaling))
    }

    pub fn scaling(&self) -> ScalingMode {
        self.scaling
    }

    fn subscribe<T, F>(&self, table: Table, query: F) -> Subscription<T>
    where
        T: Send + 'static,
        F: Fn(&rusqlite::Connection) -> crate::db::DbResult<Vec<T>> + Send + Sync + 'static,
    {
        Subscription::new(self.db.clone(), table, self.changes.subscribe(), query)
    }

    // ========================================================================
    // Food tracking
    // ========================================================================

    /// Track `weight` grams of `item` under `meal`, adding its macros to the
    /// total for the meal's date.
    pub async fn add_food_item(
        &self,
        item: &NutrientProfile,
        weight: i64,
        meal: &MealGroup,
    ) -> RepositoryResult<()> {
        validate_weight(weight)?;

        let delta = macros_for_weight(item, weight, self.scaling);
        let name = item.name.clone();
        let meal = *meal;
        let db = self.db.clone();
        let changes = self.changes.clone();

        let (total, entry) = run_blocking(move || {
            let written = db.write_transaction(|tx| {
                let total = match MacroTotal::get_by_date(tx, meal.date)? {
                    None => MacroTotal::create(tx, meal.date, &delta)?,
                    Some(existing) => {
                        MacroTotal::update(tx, existing.id, &(existing.macros + delta))?
                            .ok_or(crate::db::DbError::Sqlite(
                                rusqlite::Error::QueryReturnedNoRows,
                            ))?
                    }
                };
                let entry = FoodLogEntry::create(tx, &name, weight, meal.id)?;
                Ok::<_, RepositoryError>((total, entry))
            })?;
            notify(&changes, &[Table::Macros, Table::Foods]);
            Ok(written)
        })
        .await?;

        debug!(
            date = total.date,
            meal_id = entry.meal_id,
            name = %entry.name,
            weight,
            calories = total.macros.calories,
            "tracked food"
        );
        Ok(())
    }

    /// Remove `weight` grams of `item` from `meal`, subtracting its macros
    /// from the meal date's total.
    ///
    /// A date with no total is left alone. A meal whose last entry is removed
    /// is deleted. Only the oldest entry of `item` in the meal is drawn from,
    /// so `weight` may not exceed that single entry even when the meal holds
    /// several entries of the same food.
    pub async fn remove_food_item(
        &self,
        item: &NutrientProfile,
        weight: i64,
        meal: &MealGroup,
    ) -> RepositoryResult<()> {
        validate_weight(weight)?;

        let delta = macros_for_weight(item, weight, self.scaling);
        let name = item.name.clone();
        let meal = *meal;
        let db = self.db.clone();
        let changes = self.changes.clone();

        let removal = run_blocking(move || {
            let removal = db.write_transaction(|tx| {
                let Some(total) = MacroTotal::get_by_date(tx, meal.date)? else {
                    return Ok(None);
                };

                let entry = FoodLogEntry::get_by_name_and_meal_id(tx, &name, meal.id)?
                    .ok_or_else(|| RepositoryError::invalid("no matching food entry for this meal"))?;
                if weight > entry.weight {
                    return Err(RepositoryError::invalid("cannot remove more than was tracked"));
                }

                let remaining = total.macros - delta;
                if remaining.has_negative() {
                    warn!(date = meal.date, name = %name, "macro total went negative");
                }
                MacroTotal::update(tx, total.id, &remaining)?;

                let remaining_weight = entry.weight - weight;
                if remaining_weight == 0 {
                    FoodLogEntry::delete(tx, entry.id)?;
                } else {
                    FoodLogEntry::update_weight(tx, entry.id, remaining_weight)?;
                }

                let meal_deleted = FoodLogEntry::count_for_meal(tx, meal.id)? == 0
                    && MealGroup::delete(tx, meal.id)?;

                Ok(Some(Removal {
                    remaining_weight,
                    meal_deleted,
                }))
            })?;
            match &removal {
                Some(r) if r.meal_deleted => {
                    notify(&changes, &[Table::Macros, Table::Foods, Table::Meals])
                }
                Some(_) => notify(&changes, &[Table::Macros, Table::Foods]),
                None => {}
            }
            Ok(removal)
        })
        .await?;

        match removal {
            None => {
                debug!(date = meal.date, name = %item.name, "nothing tracked on date, removal skipped");
            }
            Some(removal) => {
                debug!(
                    date = meal.date,
                    meal_id = meal.id,
                    name = %item.name,
                    weight,
                    remaining_weight = removal.remaining_weight,
                    meal_deleted = removal.meal_deleted,
                    "removed food"
                );
            }
        }
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Live totals for `date`, or for every date when `None`
    pub fn get_tracked_macros(&self, date: Option<i64>) -> Subscription<MacroTotal> {
        self.subscribe(Table::Macros, move |conn| MacroTotal::list(conn, date))
    }

    /// Totals with `start <= date <= end`
    pub async fn get_tracked_macros_by_date_range(
        &self,
        start: i64,
        end: i64,
    ) -> RepositoryResult<Vec<MacroTotal>> {
        if start > end {
            return Err(RepositoryError::invalid("start date must not be after end date"));
        }

        let db = self.db.clone();
        run_blocking(move || Ok(db.with_conn(|conn| MacroTotal::list_by_date_range(conn, start, end))?))
            .await
    }

    /// Every log entry for a food name, across all meals
    pub async fn get_tracked_food_by_name(&self, name: &str) -> RepositoryResult<Vec<FoodLogEntry>> {
        let name = name.to_string();
        let db = self.db.clone();
        run_blocking(move || Ok(db.with_conn(|conn| FoodLogEntry::get_by_name(conn, &name))?)).await
    }

    /// Log entries of a meal
    pub async fn get_food_by_meal_id(&self, meal_id: i64) -> RepositoryResult<Vec<FoodLogEntry>> {
        let db = self.db.clone();
        run_blocking(move || Ok(db.with_conn(|conn| FoodLogEntry::get_by_meal_id(conn, meal_id))?))
            .await
    }

    /// Totals, meals with their foods, and the effective target for a day
    pub async fn get_day_summary(&self, date: i64) -> RepositoryResult<DaySummary> {
        let db = self.db.clone();
        run_blocking(move || {
            let summary = db.with_conn(|conn| {
                let totals = MacroTotal::get_by_date(conn, date)?
                    .map(|t| t.macros)
                    .unwrap_or_default();

                let mut meals = Vec::new();
                for meal in MealGroup::get_by_date(conn, date)? {
                    let foods = FoodLogEntry::get_by_meal_id(conn, meal.id)?;
                    meals.push(MealDetail { meal, foods });
                }

                let target = MacroTarget::get_effective(conn, date)?;

                Ok(DaySummary {
                    date,
                    totals,
                    meals,
                    target,
                })
            })?;
            Ok(summary)
        })
        .await
    }

    // ========================================================================
    // Meals
    // ========================================================================

    /// Create a meal on `date`
    pub async fn add_meal(&self, date: i64) -> RepositoryResult<MealGroup> {
        let db = self.db.clone();
        let changes = self.changes.clone();
        let meal = run_blocking(move || {
            let meal =
                db.write_transaction(|tx| Ok::<_, RepositoryError>(MealGroup::create(tx, date)?))?;
            notify(&changes, &[Table::Meals]);
            Ok(meal)
        })
        .await?;

        debug!(meal_id = meal.id, date, "added meal");
        Ok(meal)
    }

    /// Delete a meal. Its food entries are left in place.
    pub async fn remove_meal(&self, id: i64) -> RepositoryResult<()> {
        let db = self.db.clone();
        let changes = self.changes.clone();
        run_blocking(move || {
            db.write_transaction(|tx| {
                if MealGroup::get_by_id(tx, id)?.is_none() {
                    return Err(RepositoryError::invalid("no meal with this id"));
                }
                MealGroup::delete(tx, id)?;
                Ok(())
            })?;
            notify(&changes, &[Table::Meals]);
            Ok(())
        })
        .await?;

        debug!(meal_id = id, "removed meal");
        Ok(())
    }

    pub async fn get_meal_by_id(&self, id: i64) -> RepositoryResult<Option<MealGroup>> {
        let db = self.db.clone();
        run_blocking(move || Ok(db.with_conn(|conn| MealGroup::get_by_id(conn, id))?)).await
    }

    /// Live list of the meals on `date`
    pub fn get_meals_by_date(&self, date: i64) -> Subscription<MealGroup> {
        self.subscribe(Table::Meals, move |conn| MealGroup::get_by_date(conn, date))
    }

    // ========================================================================
    // Targets
    // ========================================================================

    /// Set the macro goal starting on `date`, replacing one already set there
    pub async fn set_macro_target(&self, date: i64, macros: Macros) -> RepositoryResult<MacroTarget> {
        let db = self.db.clone();
        let changes = self.changes.clone();
        let target = run_blocking(move || {
            let target = db.write_transaction(|tx| {
                Ok::<_, RepositoryError>(MacroTarget::upsert(tx, date, &macros)?)
            })?;
            notify(&changes, &[Table::Targets]);
            Ok(target)
        })
        .await?;

        debug!(date, calories = target.macros.calories, "set macro target");
        Ok(target)
    }

    /// All targets, newest first
    pub async fn get_macro_targets(&self) -> RepositoryResult<Vec<MacroTarget>> {
        let db = self.db.clone();
        run_blocking(move || Ok(db.with_conn(MacroTarget::list)?)).await
    }

    /// The target in effect on `date`
    pub async fn get_macro_target_for(&self, date: i64) -> RepositoryResult<Option<MacroTarget>> {
        let db = self.db.clone();
        run_blocking(move || Ok(db.with_conn(|conn| MacroTarget::get_effective(conn, date))?)).await
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Delete every row of every table
    pub async fn clear_database(&self) -> RepositoryResult<()> {
        let db = self.db.clone();
        let changes = self.changes.clone();
        run_blocking(move || {
            db.write_transaction(|tx| {
                FoodLogEntry::delete_all(tx)?;
                MealGroup::delete_all(tx)?;
                MacroTotal::delete_all(tx)?;
                MacroTarget::delete_all(tx)?;
                Ok::<_, RepositoryError>(())
            })?;
            notify(&changes, &[Table::Macros, Table::Foods, Table::Meals, Table::Targets]);
            Ok(())
        })
        .await?;

        info!("cleared database");
        Ok(())
    }
}
