//! Schedule summary indicators.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Calendar days | finish − start + 1 |
//! | Working days | working days in [start, finish] |
//! | Total man-hours | sum of activity man-hour estimates |
//! | Critical activities | activities on the driving chain |
//! | Fallbacks | data-quality diagnostics recorded |
//! | Peak / ratio | from the leveling report |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::CalendarEngine;
use crate::models::{ActivityCategory, Schedule};

/// Summary indicators of a generated schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub start: Option<NaiveDate>,
    pub finish: Option<NaiveDate>,
    /// Calendar days spanned, inclusive (0 for an empty schedule).
    pub calendar_days: i64,
    /// Working days spanned under the project calendar.
    pub working_days: u32,
    pub activity_count: usize,
    /// Activity count per category.
    pub activities_by_category: BTreeMap<ActivityCategory, usize>,
    pub total_man_hours: f64,
    pub critical_count: usize,
    /// Data-quality fallbacks (advisories excluded).
    pub fallback_count: usize,
    pub peak_labor: f64,
    pub peak_to_average_ratio: f64,
    pub is_balanced: bool,
    pub leveling_iterations: usize,
}

impl ScheduleSummary {
    /// Computes the summary of a schedule under its calendar.
    pub fn calculate(schedule: &Schedule, calendar: &CalendarEngine) -> Self {
        let start = schedule.start_date();
        let finish = schedule.finish_date();

        let (calendar_days, working_days) = match (start, finish) {
            (Some(s), Some(f)) => ((f - s).num_days() + 1, calendar.working_days_between(s, f)),
            _ => (0, 0),
        };

        let mut activities_by_category = BTreeMap::new();
        for activity in &schedule.activities {
            *activities_by_category.entry(activity.category).or_insert(0) += 1;
        }

        Self {
            start,
            finish,
            calendar_days,
            working_days,
            activity_count: schedule.activities.len(),
            activities_by_category,
            total_man_hours: schedule.activities.iter().map(|a| a.man_hours).sum(),
            critical_count: schedule.activities.iter().filter(|a| a.critical).count(),
            fallback_count: schedule.fallback_count(),
            peak_labor: schedule.leveling.peak_labor,
            peak_to_average_ratio: schedule.leveling.peak_to_average_ratio,
            is_balanced: schedule.leveling.is_balanced,
            leveling_iterations: schedule.leveling_iterations,
        }
    }

    /// Whether the schedule fits the given targets.
    pub fn meets_targets(&self, max_working_days: u32, max_ratio: f64) -> bool {
        self.working_days <= max_working_days && self.peak_to_average_ratio <= max_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Diagnostic, DiagnosticKind, ProjectCalendar, ResourceLevelingResult, ScheduleActivity,
    };

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn empty_result() -> ResourceLevelingResult {
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
    fn test_summary() {
        let mut a = ScheduleActivity::new("A", "A", date(5))
            .with_span(5, date(5), date(9))
            .with_category(ActivityCategory::Concrete)
            .with_man_hours(120.0);
        a.critical = true;
        let b = ScheduleActivity::new("B", "B", date(12))
            .with_span(3, date(12), date(14))
            .with_category(ActivityCategory::Concrete)
            .with_man_hours(30.0);
        let c = ScheduleActivity::new("C", "C", date(5))
            .with_span(1, date(5), date(5))
            .with_category(ActivityCategory::Painting);

        let schedule = Schedule {
            activities: vec![a, b, c],
            leveling: empty_result(),
            leveling_iterations: 2,
            diagnostics: vec![
                Diagnostic::new(DiagnosticKind::MissingProductivityRate, "C", "miss"),
                Diagnostic::new(DiagnosticKind::WeatherAdvisory, "A", "rain"),
            ],
        };
        let engine = CalendarEngine::new(ProjectCalendar::sunday_to_thursday("site")).unwrap();
        let summary = ScheduleSummary::calculate(&schedule, &engine);

        assert_eq!(summary.start, Some(date(5)));
        assert_eq!(summary.finish, Some(date(14)));
        assert_eq!(summary.calendar_days, 10);
        // Sun 5 .. Tue 14, Friday and Saturday off.
        assert_eq!(summary.working_days, 8);
        assert_eq!(summary.activity_count, 3);
        assert_eq!(summary.activities_by_category[&ActivityCategory::Concrete], 2);
        assert!((summary.total_man_hours - 150.0).abs() < 1e-9);
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.fallback_count, 1);
        assert_eq!(summary.leveling_iterations, 2);
        assert!(summary.meets_targets(10, 1.2));
        assert!(!summary.meets_targets(7, 1.2));
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = Schedule {
            activities: Vec::new(),
            leveling: empty_result(),
            leveling_iterations: 0,
            diagnostics: Vec::new(),
        };
        let engine = CalendarEngine::new(ProjectCalendar::default()).unwrap();
        let summary = ScheduleSummary::calculate(&schedule, &engine);
        assert_eq!(summary.start, None);
        assert_eq!(summary.calendar_days, 0);
        assert_eq!(summary.working_days, 0);
        assert_eq!(summary.total_man_hours, 0.0);
    }
}
