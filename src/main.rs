//! Macro Tracker
//!
//! Composition root: builds the configuration, database, catalog, and
//! repository once, then reports what is tracked for today.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use macrotracker::config::default_database_path;
use macrotracker::date_utils::{format_epoch_day, today_epoch_day};
use macrotracker::{FoodCatalog, FoodCategory, MacroRepository, TrackerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("macrotracker=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let mut config = TrackerConfig::from_env()?;
    let db_path = config
        .database_path
        .get_or_insert_with(default_database_path)
        .clone();

    // Ensure data directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // A broken catalog aborts startup
    let catalog = match &config.catalog_path {
        Some(path) => FoodCatalog::load(path)?,
        None => FoodCatalog::bundled()?,
    };
    let catalog = Arc::new(if config.sort_catalog { catalog.sorted() } else { catalog });
    for category in FoodCategory::ALL {
        info!(
            category = category.as_str(),
            foods = catalog.by_category(category).len(),
            "catalog category ready"
        );
    }

    let repository = MacroRepository::open(&config)?;
    info!(scaling = repository.scaling().as_str(), "repository ready");

    let today = today_epoch_day();
    let summary = repository.get_day_summary(today).await?;
    let label = format_epoch_day(today, chrono::Local::now().date_naive());

    println!("{}", serde_json::to_string_pretty(&summary)?);
    info!(
        day = %label,
        meals = summary.meals.len(),
        calories = summary.totals.calories,
        "today's totals"
    );

    Ok(())
}
