//! Scheduled activity model.
//!
//! A `ScheduleActivity` is the smallest scheduled unit of work. It belongs to
//! a BOQ item, carries a WBS code, calendar dates, resource requirements and
//! finish-to-start style dependencies on earlier activities.
//!
//! # Invariants
//! - `end >= start`
//! - `duration_days >= 1`
//! - curing activities last at least the configured minimum (7 working days)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ActivityCategory;

/// A scheduled construction activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleActivity {
    /// Unique activity identifier.
    pub id: String,
    /// Hierarchical WBS code: `<categoryCode>.<itemSequence>.<subIndex>`.
    pub wbs_code: String,
    /// Short name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Trade category.
    pub category: ActivityCategory,
    /// Activity-type tag (productivity catalog key).
    pub activity_type: String,
    /// Originating BOQ item ID.
    pub boq_item_id: String,
    /// Work quantity covered by this activity.
    pub quantity: f64,
    /// Unit of `quantity`.
    pub unit: String,
    /// Planned duration in working days.
    pub duration_days: u32,
    /// First working day.
    pub start: NaiveDate,
    /// Last working day (inclusive).
    pub end: NaiveDate,
    /// On the chain that drives the project finish date.
    pub critical: bool,
    /// Predecessor links.
    pub dependencies: Vec<Dependency>,
    /// Labor, equipment and material needs per working day.
    pub resources: Vec<ResourceRequirement>,
    /// Progress percentage (0..=100).
    pub progress: u8,
    /// Execution status.
    pub status: ActivityStatus,
    /// Labor productivity used (units per labor-hour), if a catalog rate applied.
    pub productivity_rate: Option<f64>,
    /// Estimated man-hours.
    pub man_hours: f64,
}

impl ScheduleActivity {
    /// Creates a one-day activity on `start` with no resources.
    pub fn new(id: impl Into<String>, name: impl Into<String>, start: NaiveDate) -> Self {
        Self {
            id: id.into(),
            wbs_code: String::new(),
            name: name.into(),
            description: String::new(),
            category: ActivityCategory::Generic,
            activity_type: String::new(),
            boq_item_id: String::new(),
            quantity: 0.0,
            unit: String::new(),
            duration_days: 1,
            start,
            end: start,
            critical: false,
            dependencies: Vec::new(),
            resources: Vec::new(),
            progress: 0,
            status: ActivityStatus::NotStarted,
            productivity_rate: None,
            man_hours: 0.0,
        }
    }

    /// Sets the WBS code.
    pub fn with_wbs(mut self, wbs_code: impl Into<String>) -> Self {
        self.wbs_code = wbs_code.into();
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: ActivityCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the activity type.
    pub fn with_activity_type(mut self, activity_type: impl Into<String>) -> Self {
        self.activity_type = activity_type.into();
        self
    }

    /// Sets the originating BOQ item.
    pub fn with_boq_item(mut self, boq_item_id: impl Into<String>) -> Self {
        self.boq_item_id = boq_item_id.into();
        self
    }

    /// Sets quantity and unit.
    pub fn with_quantity(mut self, quantity: f64, unit: impl Into<String>) -> Self {
        self.quantity = quantity;
        self.unit = unit.into();
        self
    }

    /// Sets the working-day duration and the resolved dates.
    pub fn with_span(mut self, duration_days: u32, start: NaiveDate, end: NaiveDate) -> Self {
        self.duration_days = duration_days;
        self.start = start;
        self.end = end;
        self
    }

    /// Adds a resource requirement.
    pub fn with_resource(mut self, resource: ResourceRequirement) -> Self {
        self.resources.push(resource);
        self
    }

    /// Adds a dependency.
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Sets estimated man-hours.
    pub fn with_man_hours(mut self, man_hours: f64) -> Self {
        self.man_hours = man_hours;
        self
    }

    /// Sets progress, clamped to 0..=100, and derives the status from it.
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self.status = ActivityStatus::from_progress(self.progress);
        self
    }

    /// Whether `date` falls within [start, end].
    #[inline]
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Calendar days spanned, inclusive.
    pub fn calendar_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Summed labor headcount per day.
    pub fn labor_headcount(&self) -> f64 {
        self.resource_total(ResourceKind::Labor)
    }

    /// Summed equipment count per day.
    pub fn equipment_count(&self) -> f64 {
        self.resource_total(ResourceKind::Equipment)
    }

    /// Summed material cost per day.
    pub fn material_daily_cost(&self) -> f64 {
        self.resources
            .iter()
            .filter(|r| r.kind == ResourceKind::Material)
            .map(|r| r.daily_rate)
            .sum()
    }

    fn resource_total(&self, kind: ResourceKind) -> f64 {
        self.resources
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.quantity)
            .sum()
    }

    /// IDs of predecessor activities.
    pub fn predecessor_ids(&self) -> Vec<&str> {
        self.dependencies
            .iter()
            .map(|d| d.predecessor_id.as_str())
            .collect()
    }
}

/// Execution status of an activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStatus {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

impl ActivityStatus {
    /// Status implied by a progress percentage.
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            0 => Self::NotStarted,
            100..=u8::MAX => Self::Done,
            _ => Self::InProgress,
        }
    }
}

/// Type of a precedence link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyType {
    /// Successor starts after predecessor finishes.
    #[default]
    FinishToStart,
    /// Successor starts after predecessor starts.
    StartToStart,
    /// Successor finishes after predecessor finishes.
    FinishToFinish,
}

/// A precedence link to an earlier activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Predecessor activity ID.
    pub predecessor_id: String,
    /// Link type.
    pub dependency_type: DependencyType,
    /// Lag in working days.
    pub lag_days: u32,
}

impl Dependency {
    /// Finish-to-start link with zero lag.
    pub fn finish_to_start(predecessor_id: impl Into<String>) -> Self {
        Self {
            predecessor_id: predecessor_id.into(),
            dependency_type: DependencyType::FinishToStart,
            lag_days: 0,
        }
    }

    /// Sets the lag.
    pub fn with_lag(mut self, lag_days: u32) -> Self {
        self.lag_days = lag_days;
        self
    }
}

/// Kind of resource an activity consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Labor,
    Equipment,
    Material,
}

/// A resource requirement of an activity.
///
/// For labor and equipment, `quantity` is the headcount/unit count present
/// on every working day. For material, `quantity` is the total consumed and
/// `daily_rate` the cost per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequirement {
    /// Resource kind.
    pub kind: ResourceKind,
    /// Role, equipment or material name.
    pub name: String,
    /// Quantity (see type docs).
    pub quantity: f64,
    /// Unit of `quantity`.
    pub unit: String,
    /// Cost per day.
    pub daily_rate: f64,
}

impl ResourceRequirement {
    /// Creates a requirement.
    pub fn new(kind: ResourceKind, name: impl Into<String>, quantity: f64) -> Self {
        Self {
            kind,
            name: name.into(),
            quantity,
            unit: String::new(),
            daily_rate: 0.0,
        }
    }

    /// Labor requirement of `headcount` workers.
    pub fn labor(role: impl Into<String>, headcount: f64) -> Self {
        Self::new(ResourceKind::Labor, role, headcount).with_unit("worker")
    }

    /// Equipment requirement of `count` units.
    pub fn equipment(name: impl Into<String>, count: f64) -> Self {
        Self::new(ResourceKind::Equipment, name, count).with_unit("unit")
    }

    /// Material requirement.
    pub fn material(name: impl Into<String>, quantity: f64, daily_rate: f64) -> Self {
        Self::new(ResourceKind::Material, name, quantity).with_daily_rate(daily_rate)
    }

    /// Sets the unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the daily rate.
    pub fn with_daily_rate(mut self, daily_rate: f64) -> Self {
        self.daily_rate = daily_rate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_activity_builder() {
        let act = ScheduleActivity::new("A1", "Concrete Pour", day(5))
            .with_wbs("CON.1.3")
            .with_category(ActivityCategory::Concrete)
            .with_activity_type("concrete_pour")
            .with_boq_item("B1")
            .with_quantity(50.0, "m3")
            .with_span(3, day(5), day(7))
            .with_resource(ResourceRequirement::labor("Mason", 4.0))
            .with_resource(ResourceRequirement::labor("Laborer", 8.0))
            .with_resource(ResourceRequirement::equipment("Concrete pump", 1.0))
            .with_resource(ResourceRequirement::material("Ready-mix", 50.0, 2000.0))
            .with_dependency(Dependency::finish_to_start("A0"))
            .with_man_hours(120.0);

        assert_eq!(act.wbs_code, "CON.1.3");
        assert_eq!(act.calendar_days(), 3);
        assert!((act.labor_headcount() - 12.0).abs() < 1e-9);
        assert!((act.equipment_count() - 1.0).abs() < 1e-9);
        assert!((act.material_daily_cost() - 2000.0).abs() < 1e-9);
        assert_eq!(act.predecessor_ids(), vec!["A0"]);
        assert_eq!(act.status, ActivityStatus::NotStarted);
    }

    #[test]
    fn test_is_active_on() {
        let act = ScheduleActivity::new("A1", "x", day(5)).with_span(3, day(5), day(7));
        assert!(!act.is_active_on(day(4)));
        assert!(act.is_active_on(day(5)));
        assert!(act.is_active_on(day(7)));
        assert!(!act.is_active_on(day(8)));
    }

    #[test]
    fn test_progress_drives_status() {
        let act = ScheduleActivity::new("A1", "x", day(1));
        assert_eq!(act.clone().with_progress(0).status, ActivityStatus::NotStarted);
        assert_eq!(act.clone().with_progress(40).status, ActivityStatus::InProgress);
        let done = act.with_progress(250);
        assert_eq!(done.progress, 100);
        assert_eq!(done.status, ActivityStatus::Done);
    }

    #[test]
    fn test_dependency_lag() {
        let dep = Dependency::finish_to_start("A1").with_lag(2);
        assert_eq!(dep.dependency_type, DependencyType::FinishToStart);
        assert_eq!(dep.lag_days, 2);
    }
}
