//! Macro Tracker Library
//!
//! Food catalog, per-day macro aggregation, and the SQLite store behind it.

pub mod catalog;
pub mod config;
pub mod date_utils;
pub mod db;
pub mod models;
pub mod nutrition;
pub mod repository;

pub use catalog::{CatalogLoadError, FoodCatalog, FoodCategory};
pub use config::TrackerConfig;
pub use repository::{MacroRepository, RepositoryError, RepositoryResult, Subscription};
