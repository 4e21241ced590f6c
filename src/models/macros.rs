//! Shared macro-nutrient values
//!
//! Used by daily totals, targets, and scaled catalog profiles.

use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// Macro-nutrient amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: i64, // kcal
    pub fat: f64,      // grams
    pub carbs: f64,    // grams
    pub fiber: f64,    // grams
    pub protein: f64,  // grams
    pub water: f64,    // grams
    pub sodium: f64,   // milligrams
}

impl Macros {
    /// All zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Read the seven macro columns from a row of `macros` or `targets`
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            calories: row.get("calories")?,
            fat: row.get("fat")?,
            carbs: row.get("carbs")?,
            fiber: row.get("fiber")?,
            protein: row.get("protein")?,
            water: row.get("water")?,
            sodium: row.get("sodium")?,
        })
    }

    /// True if any field is below zero
    pub fn has_negative(&self) -> bool {
        self.calories < 0
            || [self.fat, self.carbs, self.fiber, self.protein, self.water, self.sodium]
                .iter()
                .any(|v| *v < 0.0)
    }

    /// Field-wise comparison with an absolute float tolerance
    pub fn approx_eq(&self, other: &Macros, epsilon: f64) -> bool {
        self.calories == other.calories
            && (self.fat - other.fat).abs() <= epsilon
            && (self.carbs - other.carbs).abs() <= epsilon
            && (self.fiber - other.fiber).abs() <= epsilon
            && (self.protein - other.protein).abs() <= epsilon
            && (self.water - other.water).abs() <= epsilon
            && (self.sodium - other.sodium).abs() <= epsilon
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros {
            calories: self.calories + other.calories,
            fat: self.fat + other.fat,
            carbs: self.carbs + other.carbs,
            fiber: self.fiber + other.fiber,
            protein: self.protein + other.protein,
            water: self.water + other.water,
            sodium: self.sodium + other.sodium,
        }
    }
}

impl std::ops::Sub for Macros {
    type Output = Macros;

    fn sub(self, other: Macros) -> Macros {
        Macros {
            calories: self.calories - other.calories,
            fat: self.fat - other.fat,
            carbs: self.carbs - other.carbs,
            fiber: self.fiber - other.fiber,
            protein: self.protein - other.protein,
            water: self.water - other.water,
            sodium: self.sodium - other.sodium,
        }
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Macros {
        Macros {
            calories: 41,
            fat: 0.2,
            carbs: 10.0,
            fiber: 2.8,
            protein: 0.9,
            water: 88.0,
            sodium: 69.0,
        }
    }

    #[test]
    fn test_add_then_sub_restores() {
        let m = sample();
        let back = (m + m) - m;
        assert!(back.approx_eq(&m, 1e-9));
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total: Macros = Vec::<Macros>::new().into_iter().sum();
        assert_eq!(total, Macros::zero());
    }

    #[test]
    fn test_has_negative() {
        assert!(!sample().has_negative());
        assert!((Macros::zero() - sample()).has_negative());
    }
}
