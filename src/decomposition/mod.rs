//! Activity decomposition.
//!
//! Expands one BOQ item into an ordered list of typed sub-activities.
//! Two strategies share the [`Decomposer`] contract:
//!
//! - [`CategoryDecomposer`]: fixed per-category recipes
//!   (Concrete → Formwork, Reinforcement, Pour, Curing, Stripping).
//! - [`SpecificationDecomposer`]: mines specification text against a
//!   keyword rule table and orders hits by sequence key.
//!
//! [`CompositeDecomposer`] chains strategies explicitly, and
//! [`ActivityBuilder`] turns extracted activities into dated, resourced
//! [`ScheduleActivity`](crate::models::ScheduleActivity) records.
//!
//! # Usage
//!
//! ```
//! use boq_schedule::decomposition::{CategoryDecomposer, Decomposer};
//! use boq_schedule::models::BoqItem;
//!
//! let decomposer = CategoryDecomposer::default();
//! let item = BoqItem::new("B1", "Reinforced concrete columns", 50.0, "m3");
//! let names: Vec<String> = decomposer.decompose(&item).into_iter().map(|a| a.name).collect();
//! assert_eq!(names, ["Formwork", "Reinforcement", "Concrete Pour", "Curing", "Formwork Stripping"]);
//! ```

mod builder;
mod category;
mod composite;
mod ratios;
mod specification;

pub use builder::{ActivityBuilder, BuiltItem};
pub use category::{CategoryDecomposer, RecipeStep};
pub use composite::CompositeDecomposer;
pub use ratios::{is_volumetric_unit, DerivationRatios, QuantityRatio};
pub use specification::{SpecificationDecomposer, SpecificationRule};

use crate::models::{BoqItem, ExtractedActivity};
use std::fmt::Debug;

/// A decomposition strategy.
///
/// # Contract
/// The returned list is never empty and is ordered by non-decreasing
/// `sequence_key`. When nothing specific applies, a single Generic activity
/// carrying the parent's quantity and unit is returned.
pub trait Decomposer: Send + Sync + Debug {
    /// Strategy name (e.g. "category", "specification").
    fn name(&self) -> &'static str;

    /// Expands an item into ordered sub-activities.
    fn decompose(&self, item: &BoqItem) -> Vec<ExtractedActivity>;
}

/// Whether a decomposition is the lone catch-all activity.
pub fn is_generic_result(activities: &[ExtractedActivity]) -> bool {
    matches!(activities, [only] if only.is_generic())
}
