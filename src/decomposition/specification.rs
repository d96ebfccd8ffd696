//! Specification-text decomposition.
//!
//! Scans the item's specification text against a rule table of
//! `(keywords → activity type → sequence key)`. Every rule with a keyword
//! anywhere in the text contributes one activity; results are stably sorted
//! by sequence key, so ties keep rule-table order. No hit → a single Generic
//! activity carrying the full specification text.

use serde::{Deserialize, Serialize};

use super::category::generic_activity;
use super::{Decomposer, DerivationRatios};
use crate::models::{sequence, ActivityCategory, BoqItem, ExtractedActivity};

/// One keyword rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationRule {
    /// Lowercase substrings; any one triggers the rule.
    pub keywords: Vec<String>,
    /// Name of the emitted activity.
    pub name: String,
    pub activity_type: String,
    pub category: ActivityCategory,
    pub sequence_key: u32,
}

impl SpecificationRule {
    pub fn new<I, S>(
        keywords: I,
        name: impl Into<String>,
        activity_type: impl Into<String>,
        category: ActivityCategory,
        sequence_key: u32,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            name: name.into(),
            activity_type: activity_type.into(),
            category,
            sequence_key,
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Mines specification text for sub-activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationDecomposer {
    rules: Vec<SpecificationRule>,
    ratios: DerivationRatios,
}

impl SpecificationDecomposer {
    /// Creates a decomposer with an explicit rule table.
    pub fn new(rules: Vec<SpecificationRule>, ratios: DerivationRatios) -> Self {
        Self { rules, ratios }
    }

    /// Appends a rule.
    pub fn with_rule(mut self, rule: SpecificationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The rule table.
    pub fn rules(&self) -> &[SpecificationRule] {
        &self.rules
    }
}

impl Default for SpecificationDecomposer {
    fn default() -> Self {
        Self::new(default_rules(), DerivationRatios::default())
    }
}

impl Decomposer for SpecificationDecomposer {
    fn name(&self) -> &'static str {
        "specification"
    }

    fn decompose(&self, item: &BoqItem) -> Vec<ExtractedActivity> {
        let text = item.specification_text();
        let lowered = text.to_lowercase();

        let mut activities: Vec<ExtractedActivity> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(&lowered))
            .map(|rule| {
                let (quantity, unit) =
                    self.ratios
                        .derive(&rule.activity_type, item.quantity, &item.unit);
                ExtractedActivity::new(
                    rule.name.clone(),
                    rule.activity_type.clone(),
                    rule.category,
                    rule.sequence_key,
                )
                .with_description(format!("{} - {}", rule.name, item.description))
                .with_quantity(quantity, unit)
                .with_parent(item.description.clone())
            })
            .collect();

        if activities.is_empty() {
            return vec![generic_activity(item, text)];
        }

        // Stable: equal keys keep rule-table order.
        activities.sort_by_key(|a| a.sequence_key);
        activities
    }
}

fn rule<const N: usize>(
    keywords: [&str; N],
    name: &str,
    activity_type: &str,
    category: ActivityCategory,
    sequence_key: u32,
) -> SpecificationRule {
    SpecificationRule::new(keywords, name, activity_type, category, sequence_key)
}

fn default_rules() -> Vec<SpecificationRule> {
    use ActivityCategory::*;

    vec![
        rule(["supply", "توريد"], "Material Supply", "supply", Generic, sequence::SUPPLY),
        rule(["excavat", "حفر", "earthwork"], "Excavation", "excavation", Excavation, sequence::EXCAVATION),
        rule(
            ["plain concrete", "lean concrete", "خرسانة عادية", "نظافة"],
            "Plain Concrete",
            "plain_concrete",
            Concrete,
            sequence::PLAIN_CONCRETE,
        ),
        rule(["reinforc", "rebar", "حديد", "تسليح"], "Reinforcement", "reinforcement", Reinforcement, sequence::REINFORCEMENT),
        rule(["formwork", "shuttering", "شدة", "طوبار"], "Formwork", "formwork", Formwork, sequence::FORMWORK),
        rule(
            ["reinforced concrete", "خرسانة مسلحة"],
            "Reinforced Concrete",
            "reinforced_concrete",
            Concrete,
            sequence::REINFORCED_CONCRETE,
        ),
        rule(["waterproof", "عزل", "membrane"], "Waterproofing", "waterproofing", Insulation, sequence::WATERPROOFING),
        rule(["pest", "termite", "مبيد", "نمل أبيض"], "Pest Treatment", "pest_treatment", Generic, sequence::PEST_TREATMENT),
        rule(["backfill", "ردم"], "Backfill", "backfill", Excavation, sequence::BACKFILL),
        rule(["column", "أعمدة"], "Columns", "columns", Concrete, sequence::COLUMNS),
        rule(["masonry", "block", "بلوك", "مباني"], "Masonry", "masonry", Masonry, sequence::MASONRY),
        rule(["install", "تركيب"], "Installation", "installation", Generic, sequence::INSTALLATION),
        rule(["paint", "دهان"], "Painting", "painting", Painting, sequence::PAINTING),
    ]
}
