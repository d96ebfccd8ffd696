//! Strategy chaining.

use std::sync::Arc;

use super::{is_generic_result, CategoryDecomposer, Decomposer, SpecificationDecomposer};
use crate::models::{BoqItem, ExtractedActivity};

/// Tries strategies in order and keeps the first specific result.
///
/// If every strategy falls back to Generic, the first strategy's generic
/// activity is returned. With no strategies, the item is decomposed by the
/// default category recipes.
#[derive(Debug, Clone, Default)]
pub struct CompositeDecomposer {
    strategies: Vec<Arc<dyn Decomposer>>,
}

impl CompositeDecomposer {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specification text first, then category recipes.
    pub fn specification_then_category() -> Self {
        Self::new()
            .with_strategy(SpecificationDecomposer::default())
            .with_strategy(CategoryDecomposer::default())
    }

    /// Appends a strategy.
    pub fn with_strategy(mut self, strategy: impl Decomposer + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Appends a shared strategy.
    pub fn with_shared_strategy(mut self, strategy: Arc<dyn Decomposer>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Number of strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Decomposer for CompositeDecomposer {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn decompose(&self, item: &BoqItem) -> Vec<ExtractedActivity> {
        let mut fallback: Option<Vec<ExtractedActivity>> = None;

        for strategy in &self.strategies {
            let activities = strategy.decompose(item);
            if !is_generic_result(&activities) {
                tracing::debug!(
                    item = %item.id,
                    strategy = strategy.name(),
                    count = activities.len(),
                    "decomposed"
                );
                return activities;
            }
            if fallback.is_none() {
                fallback = Some(activities);
            }
        }

        fallback.unwrap_or_else(|| CategoryDecomposer::default().decompose(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityCategory;

    #[test]
    fn test_specification_wins_when_it_matches() {
        let chain = CompositeDecomposer::specification_then_category();
        let item = BoqItem::new("B1", "Concrete footings", 30.0, "m3")
            .with_specification("Excavation, lean concrete blinding and backfill");
        let types: Vec<String> = chain
            .decompose(&item)
            .into_iter()
            .map(|a| a.activity_type)
            .collect();
        assert_eq!(types, ["excavation", "plain_concrete", "backfill"]);
    }

    #[test]
    fn test_falls_through_to_category() {
        let chain = CompositeDecomposer::specification_then_category();
        // "tiles" triggers no specification rule but classifies as Tiling.
        let item = BoqItem::new("B2", "Ceramic floor tiles", 200.0, "m2");
        let acts = chain.decompose(&item);
        assert_eq!(acts.len(), 3);
        assert!(acts.iter().all(|a| a.category == ActivityCategory::Tiling));
    }

    #[test]
    fn test_all_generic_keeps_first() {
        let chain = CompositeDecomposer::specification_then_category();
        let item = BoqItem::new("B3", "Site mobilisation", 1.0, "LS")
            .with_specification("Mobilise site team");
        let acts = chain.decompose(&item);
        assert_eq!(acts.len(), 1);
        assert!(acts[0].is_generic());
        // First strategy's generic carries the specification text.
        assert_eq!(acts[0].description, "Mobilise site team");
    }

    #[test]
    fn test_empty_chain_uses_category() {
        let chain = CompositeDecomposer::new();
        assert!(chain.is_empty());
        let acts = chain.decompose(&BoqItem::new("B4", "Paint walls", 100.0, "m2"));
        assert_eq!(acts.len(), 3);
    }
}
