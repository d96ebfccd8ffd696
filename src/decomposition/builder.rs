//! Conversion of extracted activities into scheduled activities.
//!
//! # Algorithm
//!
//! For the `j`-th extracted activity of item number `s`:
//!
//! 1. Duration from the catalog (`ceil(q / (lp × crew) / hours)`), or the
//!    default duration on a catalog miss. Curing types are raised to the
//!    minimum curing duration.
//! 2. Start: the first activity starts on the first working day on or after
//!    the item start; later ones start the working day after their
//!    predecessor ends (finish-to-start, lag 0).
//! 3. End: resolved by the calendar (rainy buffer, Ramadan, holidays).
//! 4. Resources: one labor requirement per crew role, equipment sized to
//!    finish within the duration, and an even share of the item cost as a
//!    material requirement.
//! 5. WBS: `<category code>.<item number>.<j>`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarEngine;
use crate::error::Result;
use crate::models::{
    ActivityCategory, BoqItem, Dependency, Diagnostic, DiagnosticKind, ExtractedActivity,
    ResourceRequirement, ScheduleActivity,
};
use crate::productivity::{ProductivityCatalog, ProductivityRate};

/// Default working hours per day.
pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;

/// Minimum working days for curing activities.
pub const MIN_CURING_DAYS: u32 = 7;

/// Activities built for one BOQ item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltItem {
    /// Scheduled activities, chained finish-to-start.
    pub activities: Vec<ScheduleActivity>,
    /// Catalog misses.
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns extracted activities into dated, resourced schedule activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityBuilder {
    catalog: ProductivityCatalog,
    hours_per_day: f64,
    min_curing_days: u32,
}

impl ActivityBuilder {
    /// Creates a builder over a catalog with default working hours.
    pub fn new(catalog: ProductivityCatalog) -> Self {
        Self {
            catalog,
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            min_curing_days: MIN_CURING_DAYS,
        }
    }

    /// Sets working hours per day.
    pub fn with_hours_per_day(mut self, hours: f64) -> Self {
        self.hours_per_day = hours;
        self
    }

    /// Sets the minimum curing duration.
    pub fn with_min_curing_days(mut self, days: u32) -> Self {
        self.min_curing_days = days;
        self
    }

    /// The productivity catalog.
    pub fn catalog(&self) -> &ProductivityCatalog {
        &self.catalog
    }

    /// Builds the activity chain of one item.
    ///
    /// `item_sequence` is the 1-based position of the item in the BOQ and
    /// `primary` its classified category; both feed the WBS code.
    pub fn build(
        &self,
        item: &BoqItem,
        item_sequence: usize,
        primary: ActivityCategory,
        extracted: &[ExtractedActivity],
        calendar: &CalendarEngine,
        start: NaiveDate,
    ) -> Result<BuiltItem> {
        let mut built = BuiltItem::default();
        if extracted.is_empty() {
            return Ok(built);
        }

        let material_share = item.total_cost() / extracted.len() as f64;
        let mut earliest = calendar.next_working_day(start)?;

        for (idx, ext) in extracted.iter().enumerate() {
            let j = idx + 1;
            let id = format!("{}-{:02}", item.id, j);

            let estimate = self
                .catalog
                .estimate(&ext.activity_type, ext.quantity, self.hours_per_day);
            if estimate.is_fallback() {
                tracing::warn!(
                    activity = %id,
                    activity_type = %ext.activity_type,
                    default_days = estimate.duration_days,
                    "no productivity rate; using default duration"
                );
                built.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MissingProductivityRate,
                    id.clone(),
                    format!(
                        "No productivity rate for '{}'; default duration of {} working days used",
                        ext.activity_type, estimate.duration_days
                    ),
                ));
            }

            let mut requested = estimate.duration_days.max(1);
            if is_curing(&ext.activity_type) {
                requested = requested.max(self.min_curing_days);
            }

            let activity_start = earliest;
            let duration = calendar.effective_duration(activity_start, requested)?;
            let activity_end = calendar.nth_working_day(activity_start, duration)?;

            let mut activity = ScheduleActivity::new(id.clone(), ext.name.clone(), activity_start)
                .with_wbs(format!("{}.{}.{}", primary.code(), item_sequence, j))
                .with_category(ext.category)
                .with_activity_type(ext.activity_type.clone())
                .with_boq_item(item.id.clone())
                .with_quantity(ext.quantity, ext.unit.clone())
                .with_span(duration, activity_start, activity_end)
                .with_man_hours(estimate.man_hours);
            activity.description = ext.description.clone();
            activity.productivity_rate = estimate.rate.map(|r| r.labor_productivity);

            if let Some(rate) = estimate.rate {
                for resource in self.crew_and_equipment(rate, ext.quantity, duration) {
                    activity = activity.with_resource(resource);
                }
            }
            if material_share > 0.0 {
                activity = activity.with_resource(
                    ResourceRequirement::material(
                        format!("{} materials", item.id),
                        material_share,
                        material_share / f64::from(duration.max(1)),
                    )
                    .with_unit("cost"),
                );
            }

            if let Some(prev) = built.activities.last() {
                activity = activity.with_dependency(Dependency::finish_to_start(prev.id.clone()));
            }

            earliest = calendar.working_day_after(activity_end, 0)?;
            built.activities.push(activity);
        }

        Ok(built)
    }

    fn crew_and_equipment(
        &self,
        rate: &ProductivityRate,
        quantity: f64,
        duration: u32,
    ) -> Vec<ResourceRequirement> {
        let mut resources: Vec<ResourceRequirement> = if rate.crew.is_empty() {
            vec![ResourceRequirement::labor("Crew", f64::from(rate.crew_size))]
        } else {
            rate.crew
                .iter()
                .map(|(role, &n)| ResourceRequirement::labor(role.clone(), f64::from(n)))
                .collect()
        };

        if let Some(units) = rate.equipment_units(quantity, self.hours_per_day, duration) {
            let name = rate.equipment_name.clone().unwrap_or_else(|| "Equipment".to_string());
            resources.push(ResourceRequirement::equipment(name, f64::from(units)));
        }
        resources
    }
}

impl Default for ActivityBuilder {
    fn default() -> Self {
        Self::new(ProductivityCatalog::default())
    }
}

/// Whether an activity type is subject to the minimum curing duration.
pub fn is_curing(activity_type: &str) -> bool {
    activity_type.to_lowercase().contains("curing")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ItemClassifier;
    use crate::decomposition::{CategoryDecomposer, Decomposer};
    use crate::models::{DependencyType, ProjectCalendar, ResourceKind};
    use chrono::{Datelike, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn engine() -> CalendarEngine {
        CalendarEngine::new(ProjectCalendar::sunday_to_thursday("site")).unwrap()
    }

    fn concrete_item() -> BoqItem {
        BoqItem::new("B1", "خرسانة مسلحة للأعمدة", 50.0, "m3").with_unit_price(1000.0)
    }

    fn build_concrete() -> BuiltItem {
        let item = concrete_item();
        let category = ItemClassifier::default().classify_item(&item);
        let extracted = CategoryDecomposer::default().decompose(&item);
        ActivityBuilder::default()
            .build(&item, 1, category, &extracted, &engine(), date(2025, 1, 5))
            .unwrap()
    }

    #[test]
    fn test_concrete_chain() {
        let built = build_concrete();
        let acts = &built.activities;
        assert_eq!(acts.len(), 5);

        let ids: Vec<&str> = acts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["B1-01", "B1-02", "B1-03", "B1-04", "B1-05"]);
        assert_eq!(acts[0].wbs_code, "CON.1.1");
        assert_eq!(acts[4].wbs_code, "CON.1.5");

        // Curing is held to the minimum.
        let curing = &acts[3];
        assert_eq!(curing.activity_type, "curing");
        assert_eq!(curing.duration_days, 7);

        assert!(acts[0].dependencies.is_empty());
        for pair in acts.windows(2) {
            assert_eq!(pair[1].dependencies.len(), 1);
            let dep = &pair[1].dependencies[0];
            assert_eq!(dep.predecessor_id, pair[0].id);
            assert_eq!(dep.dependency_type, DependencyType::FinishToStart);
            assert_eq!(dep.lag_days, 0);
            assert!(pair[1].start > pair[0].end);
        }
        assert!(built.diagnostics.is_empty());
    }

    #[test]
    fn test_dates_skip_weekend() {
        let built = build_concrete();
        let engine = engine();
        for act in &built.activities {
            assert!(act.end >= act.start);
            assert!(engine.is_working_day(act.start));
            assert!(engine.is_working_day(act.end));
            assert_eq!(engine.working_days_between(act.start, act.end), act.duration_days);
        }
    }

    #[test]
    fn test_formwork_duration_and_crew() {
        let built = build_concrete();
        let formwork = &built.activities[0];
        // 300 m2 / (0.6 × 6) / 8 = 10.41 → 11 days
        assert_eq!(formwork.duration_days, 11);
        assert!((formwork.labor_headcount() - 6.0).abs() < 1e-9);
        // (300 / 0.6) × 6
        assert!((formwork.man_hours - 3000.0).abs() < 1e-6);
        assert_eq!(formwork.productivity_rate, Some(0.6));
    }

    #[test]
    fn test_pour_has_equipment() {
        let built = build_concrete();
        let pour = &built.activities[2];
        assert!(pour.equipment_count() >= 1.0);
        assert!(pour
            .resources
            .iter()
            .any(|r| r.kind == ResourceKind::Equipment));
    }

    #[test]
    fn test_material_cost_spread() {
        let built = build_concrete();
        let total: f64 = built
            .activities
            .iter()
            .flat_map(|a| a.resources.iter())
            .filter(|r| r.kind == ResourceKind::Material)
            .map(|r| r.quantity)
            .sum();
        assert!((total - 50_000.0).abs() < 1e-6);

        let curing = &built.activities[3];
        assert!((curing.material_daily_cost() - 10_000.0 / 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_catalog_miss_uses_default() {
        let item = BoqItem::new("B7", "Site mobilisation", 1.0, "LS");
        let extracted = CategoryDecomposer::default().decompose(&item);
        let built = ActivityBuilder::default()
            .build(&item, 7, ActivityCategory::Generic, &extracted, &engine(), date(2025, 1, 5))
            .unwrap();

        assert_eq!(built.activities.len(), 1);
        let act = &built.activities[0];
        assert_eq!(act.duration_days, 5);
        assert_eq!(act.man_hours, 0.0);
        assert_eq!(act.productivity_rate, None);
        assert_eq!(act.labor_headcount(), 0.0);
        assert_eq!(act.wbs_code, "GEN.7.1");
        assert_eq!(built.diagnostics.len(), 1);
        assert_eq!(built.diagnostics[0].kind, DiagnosticKind::MissingProductivityRate);
        assert_eq!(built.diagnostics[0].entity_id, "B7-01");
    }

    #[test]
    fn test_start_moves_to_working_day() {
        let item = BoqItem::new("B2", "Paint walls", 100.0, "m2");
        let extracted = CategoryDecomposer::default().decompose(&item);
        // 2025-01-03 is a Friday: first working day is Sunday the 5th.
        let built = ActivityBuilder::default()
            .build(&item, 2, ActivityCategory::Painting, &extracted, &engine(), date(2025, 1, 3))
            .unwrap();
        assert_eq!(built.activities[0].start, date(2025, 1, 5));
        assert_eq!(built.activities[0].start.weekday(), Weekday::Sun);
    }

    #[test]
    fn test_rainy_buffer_extends_duration() {
        let engine = CalendarEngine::new(
            ProjectCalendar::sunday_to_thursday("site").with_rainy_buffer(10.0),
        )
        .unwrap();
        let item = BoqItem::new("B3", "Curing only", 1.0, "m3");
        let extracted = vec![ExtractedActivity::new(
            "Curing",
            "curing",
            ActivityCategory::Concrete,
            10,
        )
        .with_quantity(1.0, "m3")];
        let built = ActivityBuilder::default()
            .build(&item, 1, ActivityCategory::Concrete, &extracted, &engine, date(2025, 1, 5))
            .unwrap();
        // 7 + ceil(0.7) = 8
        assert_eq!(built.activities[0].duration_days, 8);
    }

    #[test]
    fn test_is_curing() {
        assert!(is_curing("curing"));
        assert!(is_curing("Slab_Curing"));
        assert!(!is_curing("concrete_pour"));
    }

    #[test]
    fn test_empty_extracted() {
        let item = concrete_item();
        let built = ActivityBuilder::default()
            .build(&item, 1, ActivityCategory::Concrete, &[], &engine(), date(2025, 1, 5))
            .unwrap();
        assert!(built.activities.is_empty());
    }
}
