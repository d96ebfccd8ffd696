//! Schedule (pipeline output) model.
//!
//! A schedule is the leveled activity list together with the leveling report
//! and any data-quality diagnostics recorded while generating it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ResourceLevelingResult, ScheduleActivity};

/// A generated construction schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Activities in generation order (split halves replace their parent in place).
    pub activities: Vec<ScheduleActivity>,
    /// Leveling report for `activities`.
    pub leveling: ResourceLevelingResult,
    /// Number of auto-optimize iterations (splits) applied.
    pub leveling_iterations: usize,
    /// Fallbacks and advisories recorded during generation.
    pub diagnostics: Vec<Diagnostic>,
}

/// A recorded fallback or advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What happened.
    pub kind: DiagnosticKind,
    /// Related entity ID (BOQ item or activity).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// No classification rule matched; the item was classified Generic.
    UnclassifiedItem,
    /// No decomposition rule matched; a single Generic activity was emitted.
    GenericDecomposition,
    /// No productivity rate; the default duration was used.
    MissingProductivityRate,
    /// Activity starts in adverse weather.
    WeatherAdvisory,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(kind: DiagnosticKind, entity_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }

    /// Whether this diagnostic reports a data-quality fallback.
    pub fn is_fallback(&self) -> bool {
        !matches!(self.kind, DiagnosticKind::WeatherAdvisory)
    }
}

impl Schedule {
    /// Earliest activity start.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.activities.iter().map(|a| a.start).min()
    }

    /// Latest activity end.
    pub fn finish_date(&self) -> Option<NaiveDate> {
        self.activities.iter().map(|a| a.end).max()
    }

    /// Finds an activity by ID.
    pub fn activity(&self, id: &str) -> Option<&ScheduleActivity> {
        self.activities.iter().find(|a| a.id == id)
    }

    /// Activities originating from a BOQ item, in schedule order.
    pub fn activities_for_item(&self, boq_item_id: &str) -> Vec<&ScheduleActivity> {
        self.activities
            .iter()
            .filter(|a| a.boq_item_id == boq_item_id)
            .collect()
    }

    /// Diagnostics of a given kind.
    pub fn diagnostics_of(&self, kind: &DiagnosticKind) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| &d.kind == kind).collect()
    }

    /// Number of data-quality fallbacks.
    pub fn fallback_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_fallback()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, d).unwrap()
    }

    fn empty_report() -> ResourceLevelingResult {
        ResourceLevelingResult {
            histogram: Vec::new(),
            peak_labor: 0.0,
            average_labor: 0.0,
            peak_to_average_ratio: 0.0,
            is_balanced: true,
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn test_schedule_queries() {
        let schedule = Schedule {
            activities: vec![
                ScheduleActivity::new("A1", "Excavation", day(2))
                    .with_boq_item("B1")
                    .with_span(3, day(2), day(4)),
                ScheduleActivity::new("A2", "Backfill", day(5))
                    .with_boq_item("B1")
                    .with_span(2, day(5), day(9)),
                ScheduleActivity::new("A3", "Paint", day(3))
                    .with_boq_item("B2")
                    .with_span(1, day(3), day(3)),
            ],
            leveling: empty_report(),
            leveling_iterations: 0,
            diagnostics: vec![
                Diagnostic::new(DiagnosticKind::MissingProductivityRate, "A3", "no rate"),
                Diagnostic::new(DiagnosticKind::WeatherAdvisory, "A1", "rainy season"),
            ],
        };

        assert_eq!(schedule.start_date(), Some(day(2)));
        assert_eq!(schedule.finish_date(), Some(day(9)));
        assert_eq!(schedule.activity("A2").map(|a| a.name.as_str()), Some("Backfill"));
        assert_eq!(schedule.activities_for_item("B1").len(), 2);
        assert_eq!(schedule.diagnostics_of(&DiagnosticKind::WeatherAdvisory).len(), 1);
        assert_eq!(schedule.fallback_count(), 1);
    }

    #[test]
    fn test_empty_schedule_dates() {
        let schedule = Schedule {
            activities: Vec::new(),
            leveling: empty_report(),
            leveling_iterations: 0,
            diagnostics: Vec::new(),
        };
        assert_eq!(schedule.start_date(), None);
        assert_eq!(schedule.finish_date(), None);
    }
}
