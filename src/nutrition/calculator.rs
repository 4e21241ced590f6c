//! Weight-based macro scaling
//!
//! Catalog profiles are per 100 grams; these functions scale them to an
//! actual logged weight.

use serde::{Deserialize, Serialize};

use crate::models::{Macros, NutrientProfile};

/// Grams the catalog values refer to
pub const REFERENCE_WEIGHT_GRAMS: i64 = 100;

/// How a weight is turned into a multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMode {
    /// `weight / 100.0`
    #[default]
    Proportional,
    /// `weight / 100` in integer arithmetic. Anything under 100 g scales to
    /// zero; kept for parity with data tracked by older builds.
    Truncating,
}

impl ScalingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalingMode::Proportional => "proportional",
            ScalingMode::Truncating => "truncating",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "proportional" => Some(ScalingMode::Proportional),
            "truncating" => Some(ScalingMode::Truncating),
            _ => None,
        }
    }
}

/// Scale a profile to `weight_grams`.
///
/// Calories stay integral: in proportional mode the product is truncated
/// toward zero.
pub fn scale(profile: &NutrientProfile, weight_grams: i64, mode: ScalingMode) -> NutrientProfile {
    let (calories, factor) = match mode {
        ScalingMode::Truncating => {
            let factor = weight_grams / REFERENCE_WEIGHT_GRAMS;
            (profile.calories * factor, factor as f64)
        }
        ScalingMode::Proportional => {
            let factor = weight_grams as f64 / REFERENCE_WEIGHT_GRAMS as f64;
            ((profile.calories as f64 * factor) as i64, factor)
        }
    };

    NutrientProfile {
        name: profile.name.clone(),
        calories,
        fat: profile.fat * factor,
        fiber: profile.fiber * factor,
        protein: profile.protein * factor,
        carbs: profile.carbs * factor,
        water: profile.water * factor,
        sodium: profile.sodium * factor,
    }
}

/// Macros contributed by `weight_grams` of a profile
pub fn macros_for_weight(profile: &NutrientProfile, weight_grams: i64, mode: ScalingMode) -> Macros {
    scale(profile, weight_grams, mode).macros()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carrot() -> NutrientProfile {
        NutrientProfile {
            name: "carrot".to_string(),
            calories: 41,
            fat: 0.2,
            fiber: 2.8,
            protein: 0.9,
            carbs: 10.0,
            water: 88.0,
            sodium: 69.0,
        }
    }

    #[test]
    fn test_reference_weight_is_identity() {
        for mode in [ScalingMode::Proportional, ScalingMode::Truncating] {
            assert_eq!(scale(&carrot(), 100, mode), carrot());
        }
    }

    #[test]
    fn test_truncating_zeroes_small_weights() {
        let scaled = scale(&carrot(), 99, ScalingMode::Truncating);
        assert_eq!(scaled.name, "carrot");
        assert_eq!(scaled.macros(), Macros::zero());

        let scaled = scale(&carrot(), 250, ScalingMode::Truncating);
        assert_eq!(scaled.calories, 82);
        assert!((scaled.water - 176.0).abs() < 1e-9);
    }

    #[test]
    fn test_proportional_scales_fractionally() {
        let scaled = scale(&carrot(), 50, ScalingMode::Proportional);
        assert_eq!(scaled.calories, 20);
        assert!((scaled.carbs - 5.0).abs() < 1e-9);
        assert!((scaled.sodium - 34.5).abs() < 1e-9);
    }

    #[test]
    fn test_scaling_mode_parse() {
        assert_eq!(ScalingMode::from_str("Truncating"), Some(ScalingMode::Truncating));
        assert_eq!(ScalingMode::from_str(" proportional "), Some(ScalingMode::Proportional));
        assert_eq!(ScalingMode::from_str("round"), None);
    }
}
