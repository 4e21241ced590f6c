//! Nutrition calculation module
//!
//! Scales per-100g catalog values to logged weights.

pub mod calculator;

pub use calculator::{macros_for_weight, scale, ScalingMode, REFERENCE_WEIGHT_GRAMS};
