//! Category-driven decomposition.
//!
//! Each trade category has a fixed recipe: an ordered list of sub-activity
//! steps following construction logic. Sequence keys are recipe-local
//! (step 1 → 10, step 2 → 20, ...), so recipe order is preserved.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Decomposer, DerivationRatios};
use crate::classifier::ItemClassifier;
use crate::models::{ActivityCategory, BoqItem, ExtractedActivity, GENERIC_ACTIVITY_TYPE, sequence};

/// One step of a category recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub name: String,
    pub activity_type: String,
    pub category: ActivityCategory,
}

impl RecipeStep {
    pub fn new(name: impl Into<String>, activity_type: impl Into<String>, category: ActivityCategory) -> Self {
        Self {
            name: name.into(),
            activity_type: activity_type.into(),
            category,
        }
    }
}

/// Decomposes items by their classified category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDecomposer {
    classifier: ItemClassifier,
    recipes: BTreeMap<ActivityCategory, Vec<RecipeStep>>,
    ratios: DerivationRatios,
}

impl CategoryDecomposer {
    /// Creates a decomposer with the default recipes.
    pub fn new(classifier: ItemClassifier, ratios: DerivationRatios) -> Self {
        Self {
            classifier,
            recipes: default_recipes(),
            ratios,
        }
    }

    /// Replaces the recipe of a category. An empty recipe means the
    /// category decomposes to a single Generic activity.
    pub fn with_recipe(mut self, category: ActivityCategory, steps: Vec<RecipeStep>) -> Self {
        self.recipes.insert(category, steps);
        self
    }

    /// Recipe of a category.
    pub fn recipe(&self, category: ActivityCategory) -> &[RecipeStep] {
        self.recipes.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The classifier used to pick recipes.
    pub fn classifier(&self) -> &ItemClassifier {
        &self.classifier
    }

    /// Decomposes an item whose category is already known.
    pub fn decompose_as(&self, item: &BoqItem, category: ActivityCategory) -> Vec<ExtractedActivity> {
        let steps = self.recipe(category);
        if steps.is_empty() {
            return vec![generic_activity(item, &item.description)];
        }

        steps
            .iter()
            .enumerate()
            .map(|(idx, step)| {
                let (quantity, unit) =
                    self.ratios
                        .derive(&step.activity_type, item.quantity, &item.unit);
                ExtractedActivity::new(
                    step.name.clone(),
                    step.activity_type.clone(),
                    step.category,
                    (idx as u32 + 1) * 10,
                )
                .with_description(format!("{} - {}", step.name, item.description))
                .with_quantity(quantity, unit)
                .with_parent(item.description.clone())
            })
            .collect()
    }
}

impl Default for CategoryDecomposer {
    fn default() -> Self {
        Self::new(ItemClassifier::default(), DerivationRatios::default())
    }
}

impl Decomposer for CategoryDecomposer {
    fn name(&self) -> &'static str {
        "category"
    }

    fn decompose(&self, item: &BoqItem) -> Vec<ExtractedActivity> {
        let category = self.classifier.classify(&item.description);
        self.decompose_as(item, category)
    }
}

/// The catch-all activity for an item.
pub(super) fn generic_activity(item: &BoqItem, text: &str) -> ExtractedActivity {
    let name = if item.description.trim().is_empty() {
        item.id.clone()
    } else {
        item.description.clone()
    };
    ExtractedActivity::new(name, GENERIC_ACTIVITY_TYPE, ActivityCategory::Generic, sequence::GENERIC)
        .with_description(text)
        .with_quantity(item.quantity, item.unit.clone())
        .with_parent(item.description.clone())
}

fn default_recipes() -> BTreeMap<ActivityCategory, Vec<RecipeStep>> {
    use ActivityCategory::*;
    let step = RecipeStep::new;

    BTreeMap::from([
        (
            Excavation,
            vec![
                step("Setting Out", "setting_out", Excavation),
                step("Excavation", "excavation", Excavation),
                step("Backfill & Compaction", "backfill", Excavation),
            ],
        ),
        (
            Concrete,
            vec![
                step("Formwork", "formwork", Formwork),
                step("Reinforcement", "reinforcement", Reinforcement),
                step("Concrete Pour", "concrete_pour", Concrete),
                step("Curing", "curing", Concrete),
                step("Formwork Stripping", "stripping", Formwork),
            ],
        ),
        (
            Reinforcement,
            vec![
                step("Rebar Cutting & Bending", "rebar_fabrication", Reinforcement),
                step("Rebar Fixing", "reinforcement", Reinforcement),
            ],
        ),
        (
            Formwork,
            vec![
                step("Formwork Erection", "formwork", Formwork),
                step("Formwork Stripping", "stripping", Formwork),
            ],
        ),
        (
            Masonry,
            vec![
                step("Setting Out", "setting_out", Masonry),
                step("Block Laying", "masonry", Masonry),
            ],
        ),
        (
            Plastering,
            vec![
                step("Surface Preparation", "surface_preparation", Plastering),
                step("Plastering", "plastering", Plastering),
            ],
        ),
        (
            Tiling,
            vec![
                step("Screed", "screed", Tiling),
                step("Tile Laying", "tiling", Tiling),
                step("Grouting", "grouting", Tiling),
            ],
        ),
        (
            Painting,
            vec![
                step("Surface Preparation", "surface_preparation", Painting),
                step("Primer Coat", "primer", Painting),
                step("Finish Coats", "painting", Painting),
            ],
        ),
        (
            Carpentry,
            vec![
                step("Frame Fixing", "carpentry_frames", Carpentry),
                step("Joinery Installation", "carpentry", Carpentry),
            ],
        ),
        (
            Plumbing,
            vec![
                step("First Fix Piping", "plumbing_first_fix", Plumbing),
                step("Pressure Testing", "pressure_test", Plumbing),
                step("Fixtures Installation", "plumbing_fixtures", Plumbing),
            ],
        ),
        (
            Electrical,
            vec![
                step("Conduit Installation", "electrical_conduit", Electrical),
                step("Wiring", "electrical_wiring", Electrical),
                step("Fixtures & Testing", "electrical_fixtures", Electrical),
            ],
        ),
        (
            Hvac,
            vec![
                step("Ductwork", "hvac_ductwork", Hvac),
                step("Equipment Installation", "hvac_equipment", Hvac),
                step("Testing & Commissioning", "commissioning", Hvac),
            ],
        ),
        (
            Insulation,
            vec![
                step("Surface Preparation", "surface_preparation", Insulation),
                step("Insulation Application", "insulation", Insulation),
            ],
        ),
    ])
}
