//! Data models
//!
//! Rust structs representing database rows and catalog values.

mod food_entry;
mod macro_total;
mod macros;
mod meal;
mod nutrient_profile;
mod target;

pub use food_entry::FoodLogEntry;
pub use macro_total::MacroTotal;
pub use macros::Macros;
pub use meal::MealGroup;
pub use nutrient_profile::NutrientProfile;
pub use target::MacroTarget;
