//! Candidate sub-activities produced by decomposition.
//!
//! An `ExtractedActivity` is ephemeral: decomposers emit them, the
//! activity builder turns them into [`ScheduleActivity`](super::ScheduleActivity)
//! records immediately.
//!
//! # Sequence keys
//!
//! The sequence key encodes real-world construction order (lower = earlier).
//! Within one parent item, extracted activities are always ordered by
//! non-decreasing key.

use serde::{Deserialize, Serialize};

use super::ActivityCategory;

/// Well-known sequence keys for specification-text activity types.
pub mod sequence {
    pub const SUPPLY: u32 = 5;
    pub const EXCAVATION: u32 = 10;
    pub const PLAIN_CONCRETE: u32 = 20;
    pub const REINFORCEMENT: u32 = 30;
    pub const FORMWORK: u32 = 35;
    pub const REINFORCED_CONCRETE: u32 = 40;
    pub const WATERPROOFING: u32 = 50;
    pub const PEST_TREATMENT: u32 = 55;
    pub const BACKFILL: u32 = 60;
    pub const COLUMNS: u32 = 70;
    pub const MASONRY: u32 = 80;
    pub const INSTALLATION: u32 = 85;
    pub const PAINTING: u32 = 90;
    /// Catch-all activity emitted when nothing else matched.
    pub const GENERIC: u32 = 100;
}

/// Activity-type tag of the catch-all activity.
pub const GENERIC_ACTIVITY_TYPE: &str = "generic";

/// A candidate sub-activity of a BOQ item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedActivity {
    /// Short activity name (e.g. "Formwork").
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Activity-type tag, used as the productivity catalog key.
    pub activity_type: String,
    /// Trade category of this sub-activity.
    pub category: ActivityCategory,
    /// Quantity derived from the parent quantity.
    pub quantity: f64,
    /// Unit of the derived quantity.
    pub unit: String,
    /// Construction-order key (lower = earlier).
    pub sequence_key: u32,
    /// Description of the parent BOQ item.
    pub parent_item: String,
}

impl ExtractedActivity {
    /// Creates a new extracted activity.
    pub fn new(
        name: impl Into<String>,
        activity_type: impl Into<String>,
        category: ActivityCategory,
        sequence_key: u32,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            activity_type: activity_type.into(),
            category,
            quantity: 0.0,
            unit: String::new(),
            sequence_key,
            parent_item: String::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets quantity and unit.
    pub fn with_quantity(mut self, quantity: f64, unit: impl Into<String>) -> Self {
        self.quantity = quantity;
        self.unit = unit.into();
        self
    }

    /// Sets the parent item back-reference.
    pub fn with_parent(mut self, parent_item: impl Into<String>) -> Self {
        self.parent_item = parent_item.into();
        self
    }

    /// Whether this is the catch-all activity.
    pub fn is_generic(&self) -> bool {
        self.activity_type == GENERIC_ACTIVITY_TYPE
    }
}

/// Whether a list is ordered by non-decreasing sequence key.
pub fn is_sequence_ordered(activities: &[ExtractedActivity]) -> bool {
    activities
        .windows(2)
        .all(|w| w[0].sequence_key <= w[1].sequence_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let act = ExtractedActivity::new("Rebar", "reinforcement", ActivityCategory::Reinforcement, 30)
            .with_description("Cut, bend and fix")
            .with_quantity(6.0, "ton")
            .with_parent("RC columns");

        assert_eq!(act.sequence_key, sequence::REINFORCEMENT);
        assert_eq!(act.unit, "ton");
        assert_eq!(act.parent_item, "RC columns");
        assert!(!act.is_generic());
    }

    #[test]
    fn test_sequence_ordered() {
        let a = ExtractedActivity::new("a", "x", ActivityCategory::Generic, 10);
        let b = ExtractedActivity::new("b", "y", ActivityCategory::Generic, 10);
        let c = ExtractedActivity::new("c", "z", ActivityCategory::Generic, 5);

        assert!(is_sequence_ordered(&[a.clone(), b.clone()]));
        assert!(!is_sequence_ordered(&[a, b, c]));
        assert!(is_sequence_ordered(&[]));
    }
}
