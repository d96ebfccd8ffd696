//! BOQ item classification.
//!
//! Maps free-text BOQ descriptions to a trade category using an ordered,
//! data-driven keyword rule table.
//!
//! # Algorithm
//!
//! 1. Lowercase the description.
//! 2. Walk the rules in order; the first rule with any keyword occurring as
//!    a substring wins.
//! 3. No match → [`ActivityCategory::Generic`].
//!
//! Rule order matters: "خرسانة مسلحة" (reinforced concrete) must hit the
//! concrete rule before the reinforcement rule sees it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ActivityCategory, BoqItem};

/// One classification rule: any keyword → category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub category: ActivityCategory,
    /// Lowercase substrings; matched case-insensitively.
    pub keywords: Vec<String>,
}

impl ClassificationRule {
    /// Creates a rule. Keywords are normalized to lowercase.
    pub fn new<I, S>(category: ActivityCategory, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            category,
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Whether any keyword occurs in already-lowercased text.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Keyword-based trade classifier.
///
/// # Example
/// ```
/// use boq_schedule::classifier::ItemClassifier;
/// use boq_schedule::models::ActivityCategory;
///
/// let classifier = ItemClassifier::default();
/// assert_eq!(classifier.classify("Excavation in soft soil"), ActivityCategory::Excavation);
/// assert_eq!(classifier.classify("Mobilisation"), ActivityCategory::Generic);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemClassifier {
    rules: Vec<ClassificationRule>,
}

impl ItemClassifier {
    /// Creates a classifier with an explicit rule table.
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    /// Creates a classifier with no rules (everything is Generic).
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule (lowest precedence).
    pub fn with_rule(mut self, rule: ClassificationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Inserts a rule ahead of all others.
    pub fn with_priority_rule(mut self, rule: ClassificationRule) -> Self {
        self.rules.insert(0, rule);
        self
    }

    /// The rule table, in precedence order.
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Classifies free text.
    pub fn classify(&self, text: &str) -> ActivityCategory {
        self.match_rule(text)
            .map(|r| r.category)
            .unwrap_or(ActivityCategory::Generic)
    }

    /// Classifies a BOQ item by its description.
    pub fn classify_item(&self, item: &BoqItem) -> ActivityCategory {
        let category = self.classify(&item.description);
        debug!(item = %item.id, %category, "classified BOQ item");
        category
    }

    /// Whether some rule matches the text.
    pub fn is_recognized(&self, text: &str) -> bool {
        self.match_rule(text).is_some()
    }

    fn match_rule(&self, text: &str) -> Option<&ClassificationRule> {
        let lowered = text.to_lowercase();
        self.rules.iter().find(|r| r.matches(&lowered))
    }
}

impl Default for ItemClassifier {
    /// Bilingual (Arabic/English) rule table for building works.
    fn default() -> Self {
        use ActivityCategory::*;
        Self::new(vec![
            ClassificationRule::new(
                Excavation,
                ["excavat", "earthwork", "trench", "backfill", "حفر", "ردم", "أعمال ترابية"],
            ),
            ClassificationRule::new(Concrete, ["concrete", "خرسانة", "خرسانه"]),
            ClassificationRule::new(
                Reinforcement,
                ["rebar", "reinforc", "steel bar", "حديد", "تسليح"],
            ),
            ClassificationRule::new(
                Formwork,
                ["formwork", "shuttering", "شدة", "شده", "قوالب", "طوبار"],
            ),
            ClassificationRule::new(
                Masonry,
                ["masonry", "block", "brick", "بلوك", "طوب", "مباني"],
            ),
            ClassificationRule::new(
                Plastering,
                ["plaster", "render", "لياسة", "لياسه", "محارة", "بياض"],
            ),
            ClassificationRule::new(
                Tiling,
                ["tile", "tiling", "ceramic", "porcelain", "marble", "بلاط", "سيراميك", "رخام"],
            ),
            ClassificationRule::new(Painting, ["paint", "emulsion", "دهان", "دهانات"]),
            ClassificationRule::new(
                Carpentry,
                ["carpent", "joinery", "door", "wood", "نجارة", "أبواب", "ابواب", "خشب"],
            ),
            ClassificationRule::new(
                Plumbing,
                ["plumb", "sanitary", "drain", "pipe", "سباكة", "صحي", "مواسير"],
            ),
            ClassificationRule::new(
                Electrical,
                ["electric", "cable", "wiring", "lighting", "كهرباء", "كابلات", "إنارة", "انارة"],
            ),
            ClassificationRule::new(
                Hvac,
                ["hvac", "air condition", "duct", "ventilat", "تكييف", "تهوية"],
            ),
            ClassificationRule::new(
                Insulation,
                ["insulat", "waterproof", "membrane", "عزل"],
            ),
        ])
    }
}
