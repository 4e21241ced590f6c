//! Nutrient profile model
//!
//! A catalog food with its per-100g nutrient values. Never persisted.

use serde::{Deserialize, Serialize};

use super::Macros;

/// A food from the catalog, values per 100 grams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub name: String,
    pub calories: i64,
    pub fat: f64,
    pub fiber: f64,
    pub protein: f64,
    pub carbs: f64,
    pub water: f64,
    pub sodium: f64, // milligrams
}

impl NutrientProfile {
    /// The profile's nutrient fields without the name
    pub fn macros(&self) -> Macros {
        Macros {
            calories: self.calories,
            fat: self.fat,
            carbs: self.carbs,
            fiber: self.fiber,
            protein: self.protein,
            water: self.water,
            sodium: self.sodium,
        }
    }
}
