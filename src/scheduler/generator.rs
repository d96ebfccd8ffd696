//! BOQ-to-schedule pipeline.
//!
//! # Algorithm
//!
//! 1. Validate configuration, calendar and BOQ items (fail fast).
//! 2. For each item: classify, decompose, and build a finish-to-start
//!    chain of dated activities starting at the project start.
//! 3. Level resources over the full activity set (optionally auto-optimize).
//! 4. Record weather advisories for weather-sensitive work.
//! 5. Flag the driving chain and validate the resulting network.
//!
//! Items are independent: no cross-item dependencies are inferred, so every
//! item's chain starts on the first working day of the project.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::critical::mark_driving_chain;
use crate::calendar::CalendarEngine;
use crate::classifier::ItemClassifier;
use crate::decomposition::{is_generic_result, ActivityBuilder, CategoryDecomposer, Decomposer};
use crate::error::{ConfigError, Result};
use crate::leveling::{CancellationToken, LevelingOptions, ResourceLeveler};
use crate::models::{
    ActivityCategory, BoqItem, Diagnostic, DiagnosticKind, ProjectCalendar, Schedule,
    ScheduleActivity,
};
use crate::productivity::{ProductivityCatalog, DEFAULT_DURATION_DAYS};
use crate::validation::{validate_activities, validate_boq_items};

/// Input container for schedule generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// BOQ items in BOQ order.
    pub items: Vec<BoqItem>,
    /// Project calendar.
    pub calendar: ProjectCalendar,
    /// Earliest start of any activity.
    pub project_start: NaiveDate,
    /// Site labor capacity ceiling (workers per day).
    #[serde(default)]
    pub labor_capacity: Option<u32>,
}

impl ScheduleRequest {
    /// Creates a new schedule request.
    pub fn new(items: Vec<BoqItem>, calendar: ProjectCalendar, project_start: NaiveDate) -> Self {
        Self {
            items,
            calendar,
            project_start,
            labor_capacity: None,
        }
    }

    /// Sets the site labor capacity.
    pub fn with_labor_capacity(mut self, capacity: u32) -> Self {
        self.labor_capacity = Some(capacity);
        self
    }
}

/// Pipeline tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Working hours per day.
    pub hours_per_day: f64,
    /// Working days used on a productivity catalog miss.
    pub default_duration_days: u32,
    /// Minimum working days for curing activities.
    pub min_curing_days: u32,
    /// Run the auto-optimize loop after analysis.
    pub auto_level: bool,
    pub leveling: LevelingOptions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            hours_per_day: 8.0,
            default_duration_days: DEFAULT_DURATION_DAYS,
            min_curing_days: 7,
            auto_level: true,
            leveling: LevelingOptions::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_hours_per_day(mut self, hours: f64) -> Self {
        self.hours_per_day = hours;
        self
    }

    pub fn with_default_duration(mut self, days: u32) -> Self {
        self.default_duration_days = days;
        self
    }

    pub fn with_min_curing_days(mut self, days: u32) -> Self {
        self.min_curing_days = days;
        self
    }

    pub fn with_auto_level(mut self, enabled: bool) -> Self {
        self.auto_level = enabled;
        self
    }

    pub fn with_leveling(mut self, options: LevelingOptions) -> Self {
        self.leveling = options;
        self
    }

    /// Checks that every tunable is usable.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !self.hours_per_day.is_finite() || self.hours_per_day <= 0.0 || self.hours_per_day > 24.0 {
            return Err(ConfigError::InvalidValue {
                field: "hours_per_day".into(),
                reason: format!("must be within (0, 24], got {}", self.hours_per_day),
            });
        }
        if self.default_duration_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_duration_days".into(),
                reason: "must be at least 1".into(),
            });
        }
        self.leveling.validate()
    }
}

/// Turns a BOQ into a leveled construction schedule.
///
/// # Example
///
/// ```
/// use boq_schedule::models::{BoqItem, ProjectCalendar};
/// use boq_schedule::scheduler::{ScheduleGenerator, ScheduleRequest};
/// use chrono::NaiveDate;
///
/// let items = vec![BoqItem::new("B1", "Reinforced concrete columns", 50.0, "m3")];
/// let start = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
/// let request = ScheduleRequest::new(items, ProjectCalendar::sunday_to_thursday("site"), start);
///
/// let schedule = ScheduleGenerator::new().generate(&request).unwrap();
/// assert_eq!(schedule.activities_for_item("B1").len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleGenerator {
    classifier: ItemClassifier,
    decomposer: Arc<dyn Decomposer>,
    catalog: ProductivityCatalog,
    config: GeneratorConfig,
    cancellation: Option<CancellationToken>,
}

impl ScheduleGenerator {
    /// Creates a generator with the default rule tables and catalog.
    pub fn new() -> Self {
        Self {
            classifier: ItemClassifier::default(),
            decomposer: Arc::new(CategoryDecomposer::default()),
            catalog: ProductivityCatalog::default(),
            config: GeneratorConfig::default(),
            cancellation: None,
        }
    }

    /// Sets the classifier used for primary categories and WBS codes.
    pub fn with_classifier(mut self, classifier: ItemClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Sets the decomposition strategy.
    pub fn with_decomposer(mut self, decomposer: impl Decomposer + 'static) -> Self {
        self.decomposer = Arc::new(decomposer);
        self
    }

    /// Sets the productivity catalog.
    pub fn with_catalog(mut self, catalog: ProductivityCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Sets pipeline tunables.
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches a cancellation token for the leveling loop.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates a schedule.
    ///
    /// # Errors
    /// - [`ScheduleError::Config`](crate::error::ScheduleError::Config) for
    ///   invalid tunables, catalog rates, calendars or item quantities.
    /// - [`ScheduleError::DateOutOfRange`](crate::error::ScheduleError::DateOutOfRange)
    ///   when a duration cannot be placed on the calendar.
    /// - [`ScheduleError::Validation`](crate::error::ScheduleError::Validation)
    ///   for duplicate item IDs or an inconsistent activity network.
    pub fn generate(&self, request: &ScheduleRequest) -> Result<Schedule> {
        self.config.validate()?;
        self.catalog.validate()?;
        let calendar = CalendarEngine::new(request.calendar.clone())?;
        for item in &request.items {
            item.validate()?;
        }
        validate_boq_items(&request.items)?;

        info!(
            items = request.items.len(),
            start = %request.project_start,
            strategy = self.decomposer.name(),
            "generating schedule"
        );

        let builder = ActivityBuilder::new(
            self.catalog
                .clone()
                .with_default_duration(self.config.default_duration_days),
        )
        .with_hours_per_day(self.config.hours_per_day)
        .with_min_curing_days(self.config.min_curing_days);

        let mut activities: Vec<ScheduleActivity> = Vec::new();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        for (idx, item) in request.items.iter().enumerate() {
            let category = self.classifier.classify_item(item);
            if category == ActivityCategory::Generic && !self.classifier.is_recognized(&item.description) {
                warn!(item = %item.id, "no classification rule matched; using Generic");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnclassifiedItem,
                    item.id.clone(),
                    format!("'{}' matched no classification rule; classified Generic", item.description),
                ));
            }

            let extracted = self.decomposer.decompose(item);
            if is_generic_result(&extracted) {
                warn!(item = %item.id, "no decomposition rule matched; single generic activity");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::GenericDecomposition,
                    item.id.clone(),
                    format!("'{}' decomposed to a single generic activity", item.description),
                ));
            }

            let built = builder.build(
                item,
                idx + 1,
                category,
                &extracted,
                &calendar,
                request.project_start,
            )?;
            debug!(item = %item.id, activities = built.activities.len(), "built activities");
            activities.extend(built.activities);
            diagnostics.extend(built.diagnostics);
        }

        let mut leveler = ResourceLeveler::new(calendar.clone(), self.config.leveling.clone())?
            .with_optional_capacity(request.labor_capacity);
        if let Some(token) = &self.cancellation {
            leveler = leveler.with_cancellation(token.clone());
        }

        let (mut activities, leveling, leveling_iterations) = if self.config.auto_level {
            let outcome = leveler.auto_optimize(&activities)?;
            (outcome.activities, outcome.result, outcome.iterations)
        } else {
            let result = leveler.analyze(&activities);
            (activities, result, 0)
        };

        diagnostics.extend(weather_advisories(&activities, &calendar));
        mark_driving_chain(&mut activities);
        validate_activities(&activities)?;

        info!(
            activities = activities.len(),
            diagnostics = diagnostics.len(),
            balanced = leveling.is_balanced,
            "schedule generated"
        );

        Ok(Schedule {
            activities,
            leveling,
            leveling_iterations,
            diagnostics,
        })
    }
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Advisories for weather-sensitive activities starting in adverse conditions.
fn weather_advisories(activities: &[ScheduleActivity], calendar: &CalendarEngine) -> Vec<Diagnostic> {
    activities
        .iter()
        .filter(|a| a.category.is_weather_sensitive())
        .filter_map(|a| {
            let check = calendar.check_weather_constraints(a.start);
            if check.warnings.is_empty() {
                return None;
            }
            debug!(activity = %a.id, warnings = check.warnings.len(), "weather advisory");
            Some(Diagnostic::new(
                DiagnosticKind::WeatherAdvisory,
                a.id.clone(),
                check.warnings.join("; "),
            ))
        })
        .collect()
}
