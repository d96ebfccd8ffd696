//! Quantity derivation ratios.
//!
//! Derived activities estimate their quantity from the parent concrete
//! volume: formwork ≈ 6 m² per m³, reinforcement ≈ 0.12 t per m³. These are
//! domain heuristics without a cited derivation, so they are configuration
//! and may be overridden per project.
//!
//! A ratio applies only when the parent is measured by volume. A formwork or
//! rebar item measured in its own unit keeps its quantity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Derived quantity per unit of parent volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityRatio {
    pub factor: f64,
    /// Unit of the derived quantity.
    pub unit: String,
}

/// Activity type → quantity ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationRatios {
    ratios: BTreeMap<String, QuantityRatio>,
}

impl DerivationRatios {
    /// No ratios: every activity takes the parent quantity.
    pub fn none() -> Self {
        Self {
            ratios: BTreeMap::new(),
        }
    }

    /// Adds or replaces a ratio.
    pub fn with_ratio(mut self, activity_type: impl Into<String>, factor: f64, unit: impl Into<String>) -> Self {
        self.ratios.insert(
            activity_type.into().to_lowercase(),
            QuantityRatio {
                factor,
                unit: unit.into(),
            },
        );
        self
    }

    /// Ratio for an activity type.
    pub fn get(&self, activity_type: &str) -> Option<&QuantityRatio> {
        self.ratios.get(&activity_type.to_lowercase())
    }

    /// Quantity and unit of `activity_type` derived from a parent.
    pub fn derive(&self, activity_type: &str, parent_quantity: f64, parent_unit: &str) -> (f64, String) {
        match self.get(activity_type) {
            Some(ratio) if is_volumetric_unit(parent_unit) => {
                (parent_quantity * ratio.factor, ratio.unit.clone())
            }
            _ => (parent_quantity, parent_unit.to_string()),
        }
    }
}

impl Default for DerivationRatios {
    fn default() -> Self {
        Self::none()
            .with_ratio("formwork", 6.0, "m2")
            .with_ratio("stripping", 6.0, "m2")
            .with_ratio("reinforcement", 0.12, "ton")
            .with_ratio("rebar_fabrication", 0.12, "ton")
    }
}

/// Whether a unit denotes volume (m³).
pub fn is_volumetric_unit(unit: &str) -> bool {
    let unit = unit.trim().to_lowercase();
    matches!(
        unit.as_str(),
        "m3" | "m³" | "cum" | "cu.m" | "cbm" | "م3" | "م٣" | "متر مكعب"
    )
}
