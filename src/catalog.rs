//! Food catalog
//!
//! The bundled, read-only list of foods and their per-100g nutrient profiles,
//! grouped into four fixed categories.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::NutrientProfile;

/// The dataset shipped with the crate
const BUNDLED_CATALOG: &str = include_str!("../assets/food_data.json");

/// Catalog load errors
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Catalog categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Vegetables,
    Fruits,
    Grains,
    Beans,
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 4] = [
        FoodCategory::Vegetables,
        FoodCategory::Fruits,
        FoodCategory::Grains,
        FoodCategory::Beans,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodCategory::Vegetables => "vegetables",
            FoodCategory::Fruits => "fruits",
            FoodCategory::Grains => "grains",
            FoodCategory::Beans => "beans",
        }
    }
}

/// Foods grouped by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodCatalog {
    pub vegetables: Vec<NutrientProfile>,
    pub fruits: Vec<NutrientProfile>,
    pub grains: Vec<NutrientProfile>,
    pub beans: Vec<NutrientProfile>,
}

impl FoodCatalog {
    /// Parse a catalog document
    pub fn from_json(json: &str) -> Result<Self, CatalogLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a catalog file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json(&json)?;
        info!(path = %path.display(), foods = catalog.len(), "loaded food catalog");
        Ok(catalog)
    }

    /// The catalog compiled into the crate
    pub fn bundled() -> Result<Self, CatalogLoadError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Sort every category by name
    pub fn sorted(mut self) -> Self {
        for category in FoodCategory::ALL {
            self.category_mut(category).sort_by(|a, b| a.name.cmp(&b.name));
        }
        self
    }

    /// Foods in one category, in catalog order
    pub fn by_category(&self, category: FoodCategory) -> &[NutrientProfile] {
        match category {
            FoodCategory::Vegetables => &self.vegetables,
            FoodCategory::Fruits => &self.fruits,
            FoodCategory::Grains => &self.grains,
            FoodCategory::Beans => &self.beans,
        }
    }

    fn category_mut(&mut self, category: FoodCategory) -> &mut Vec<NutrientProfile> {
        match category {
            FoodCategory::Vegetables => &mut self.vegetables,
            FoodCategory::Fruits => &mut self.fruits,
            FoodCategory::Grains => &mut self.grains,
            FoodCategory::Beans => &mut self.beans,
        }
    }

    /// Look a food up by exact name in any category
    pub fn find(&self, name: &str) -> Option<&NutrientProfile> {
        FoodCategory::ALL
            .iter()
            .flat_map(|c| self.by_category(*c))
            .find(|p| p.name == name)
    }

    /// Total number of foods
    pub fn len(&self) -> usize {
        FoodCategory::ALL
            .iter()
            .map(|c| self.by_category(*c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"{
        "vegetables": [
            {"name": "spinach", "calories": 23, "fat": 0.4, "fiber": 2.2, "protein": 2.9, "carbs": 3.6, "water": 91.4, "sodium": 79},
            {"name": "carrot", "calories": 41, "fat": 0.2, "fiber": 2.8, "protein": 0.9, "carbs": 10, "water": 88, "sodium": 69}
        ],
        "fruits": [],
        "grains": [],
        "beans": [
            {"name": "lentils", "calories": 116, "fat": 0.4, "fiber": 7.9, "protein": 9.0, "carbs": 20.1, "water": 69.6, "sodium": 2}
        ]
    }"#;

    #[test]
    fn test_parse_and_lookup() {
        let catalog = FoodCatalog::from_json(SMALL).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.by_category(FoodCategory::Vegetables)[0].name, "spinach");

        let carrot = catalog.find("carrot").unwrap();
        assert_eq!(carrot.calories, 41);
        assert!((carrot.sodium - 69.0).abs() < 1e-9);
        assert!(catalog.find("kale").is_none());
    }

    #[test]
    fn test_sorted_orders_by_name() {
        let catalog = FoodCatalog::from_json(SMALL).unwrap().sorted();
        let names: Vec<&str> = catalog
            .by_category(FoodCategory::Vegetables)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["carrot", "spinach"]);
    }

    #[test]
    fn test_missing_category_is_an_error() {
        let result = FoodCatalog::from_json(r#"{"vegetables": [], "fruits": [], "grains": []}"#);
        assert!(matches!(result, Err(CatalogLoadError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = FoodCatalog::load("/nonexistent/food_data.json");
        assert!(matches!(result, Err(CatalogLoadError::Io { .. })));
    }

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = FoodCatalog::bundled().unwrap();
        for category in FoodCategory::ALL {
            assert!(!catalog.by_category(category).is_empty(), "{} empty", category.as_str());
        }
        assert!(catalog.find("carrot").is_some());
    }
}
