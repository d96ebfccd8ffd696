//! Productivity catalog.
//!
//! Reference data of per-activity-type labor productivity, crew composition
//! and equipment throughput, used to derive durations and man-hours.
//!
//! # Formulas
//!
//! | Quantity | Formula |
//! |----------|---------|
//! | Duration (working days) | `ceil(quantity / (labor_productivity × crew_size) / hours_per_day)` |
//! | Man-hours | `(quantity / labor_productivity) × crew_size` |
//!
//! # Lookup
//! Keys are matched case-insensitively: an exact key wins, otherwise the
//! first entry whose key contains, or is contained in, the requested type.
//! Entries are a fixed, enumerable table, so overlapping keys are a data
//! authoring concern rather than a runtime error.
//!
//! A missing entry is never an error: callers fall back to
//! [`ProductivityCatalog::default_duration_days`] and zero man-hours.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ceil_tolerant;
use crate::error::ConfigError;

/// Working days used when no productivity rate applies.
pub const DEFAULT_DURATION_DAYS: u32 = 5;

/// Productivity of one activity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityRate {
    /// Catalog key (activity-type name).
    pub activity_type: String,
    /// Unit of measure the rates refer to.
    pub unit: String,
    /// Units produced per labor-hour, per worker.
    pub labor_productivity: f64,
    /// Units produced per equipment-hour, if the work is plant-driven.
    pub equipment_productivity: Option<f64>,
    /// Name of the governing equipment.
    pub equipment_name: Option<String>,
    /// Total crew headcount.
    pub crew_size: u32,
    /// Role → headcount.
    pub crew: BTreeMap<String, u32>,
}

impl ProductivityRate {
    /// Creates a rate with a crew of one.
    pub fn new(activity_type: impl Into<String>, unit: impl Into<String>, labor_productivity: f64) -> Self {
        Self {
            activity_type: activity_type.into().to_lowercase(),
            unit: unit.into(),
            labor_productivity,
            equipment_productivity: None,
            equipment_name: None,
            crew_size: 1,
            crew: BTreeMap::new(),
        }
    }

    /// Adds a crew role. `crew_size` becomes the sum of all roles.
    pub fn with_crew_member(mut self, role: impl Into<String>, headcount: u32) -> Self {
        *self.crew.entry(role.into()).or_insert(0) += headcount;
        self.crew_size = self.crew.values().sum();
        self
    }

    /// Sets the governing equipment and its throughput.
    pub fn with_equipment(mut self, name: impl Into<String>, productivity: f64) -> Self {
        self.equipment_name = Some(name.into());
        self.equipment_productivity = Some(productivity);
        self
    }

    /// Working days to produce `quantity`.
    pub fn duration_days(&self, quantity: f64, hours_per_day: f64) -> u32 {
        let crew_output = self.labor_productivity * f64::from(self.crew_size.max(1));
        let days = ceil_tolerant(quantity / crew_output / hours_per_day);
        days.max(1.0).min(f64::from(u32::MAX)) as u32
    }

    /// Man-hours to produce `quantity`.
    pub fn man_hours(&self, quantity: f64) -> f64 {
        (quantity / self.labor_productivity) * f64::from(self.crew_size)
    }

    /// Equipment units needed to produce `quantity` within `duration_days`.
    pub fn equipment_units(&self, quantity: f64, hours_per_day: f64, duration_days: u32) -> Option<u32> {
        let productivity = self.equipment_productivity?;
        let capacity = productivity * hours_per_day * f64::from(duration_days.max(1));
        Some(ceil_tolerant(quantity / capacity).max(1.0).min(f64::from(u32::MAX)) as u32)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidRate {
            activity_type: self.activity_type.clone(),
            reason: reason.to_string(),
        };
        if self.activity_type.trim().is_empty() {
            return Err(invalid("empty activity type"));
        }
        if !self.labor_productivity.is_finite() || self.labor_productivity <= 0.0 {
            return Err(invalid("labor productivity must be positive"));
        }
        if self.crew_size == 0 {
            return Err(invalid("crew size must be at least 1"));
        }
        if let Some(p) = self.equipment_productivity {
            if !p.is_finite() || p <= 0.0 {
                return Err(invalid("equipment productivity must be positive"));
            }
        }
        Ok(())
    }
}

/// Duration and effort derived for one quantity of work.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkEstimate<'a> {
    /// Working days (>= 1).
    pub duration_days: u32,
    /// Estimated man-hours (0 when no rate applied).
    pub man_hours: f64,
    /// Rate used, if any.
    pub rate: Option<&'a ProductivityRate>,
}

impl WorkEstimate<'_> {
    /// Whether the default duration was used because no rate matched.
    pub fn is_fallback(&self) -> bool {
        self.rate.is_none()
    }
}

/// Immutable table of productivity rates.
///
/// Constructed once and injected into the pipeline; per-region or
/// per-project overrides go through [`ProductivityCatalog::with_rate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityCatalog {
    rates: Vec<ProductivityRate>,
    /// Duration used when no rate matches.
    pub default_duration_days: u32,
}

impl ProductivityCatalog {
    /// Creates a catalog from rate records, validating each.
    pub fn new(rates: Vec<ProductivityRate>) -> Result<Self, ConfigError> {
        for rate in &rates {
            rate.validate()?;
        }
        Ok(Self {
            rates,
            default_duration_days: DEFAULT_DURATION_DAYS,
        })
    }

    /// A catalog with no entries (every lookup falls back).
    pub fn empty() -> Self {
        Self {
            rates: Vec::new(),
            default_duration_days: DEFAULT_DURATION_DAYS,
        }
    }

    /// Adds or replaces the rate with the same key.
    pub fn with_rate(mut self, rate: ProductivityRate) -> Result<Self, ConfigError> {
        rate.validate()?;
        match self
            .rates
            .iter_mut()
            .find(|r| r.activity_type == rate.activity_type)
        {
            Some(existing) => *existing = rate,
            None => self.rates.push(rate),
        }
        Ok(self)
    }

    /// Checks every rate and the fallback duration.
    ///
    /// Catalogs built with [`new`](Self::new) or [`with_rate`](Self::with_rate)
    /// are already checked; deserialized ones are not until this runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for rate in &self.rates {
            rate.validate()?;
        }
        if self.default_duration_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_duration_days".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Sets the fallback duration.
    pub fn with_default_duration(mut self, days: u32) -> Self {
        self.default_duration_days = days.max(1);
        self
    }

    /// All rates, in table order.
    pub fn rates(&self) -> &[ProductivityRate] {
        &self.rates
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Looks up a rate by activity type.
    pub fn rate_for(&self, activity_type: &str) -> Option<&ProductivityRate> {
        let wanted = activity_type.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.rates
            .iter()
            .find(|r| r.activity_type == wanted)
            .or_else(|| {
                self.rates.iter().find(|r| {
                    wanted.contains(r.activity_type.as_str()) || r.activity_type.contains(wanted.as_str())
                })
            })
    }

    /// Working days for `quantity` of `activity_type`, if a rate exists.
    pub fn duration_days(&self, activity_type: &str, quantity: f64, hours_per_day: f64) -> Option<u32> {
        self.rate_for(activity_type)
            .map(|r| r.duration_days(quantity, hours_per_day))
    }

    /// Man-hours for `quantity` of `activity_type`, if a rate exists.
    pub fn man_hours(&self, activity_type: &str, quantity: f64) -> Option<f64> {
        self.rate_for(activity_type).map(|r| r.man_hours(quantity))
    }

    /// Duration and man-hours with the documented fallback applied.
    pub fn estimate(&self, activity_type: &str, quantity: f64, hours_per_day: f64) -> WorkEstimate<'_> {
        match self.rate_for(activity_type) {
            Some(rate) => WorkEstimate {
                duration_days: rate.duration_days(quantity, hours_per_day),
                man_hours: rate.man_hours(quantity),
                rate: Some(rate),
            },
            None => WorkEstimate {
                duration_days: self.default_duration_days,
                man_hours: 0.0,
                rate: None,
            },
        }
    }
}

impl Default for ProductivityCatalog {
    /// Typical building-works productivity for a Gulf-region site.
    fn default() -> Self {
        let rate = ProductivityRate::new;
        let rates = vec![
            rate("excavation", "m3", 2.5)
                .with_crew_member("Operator", 1)
                .with_crew_member("Laborer", 3)
                .with_equipment("Excavator", 40.0),
            rate("backfill", "m3", 3.0)
                .with_crew_member("Operator", 1)
                .with_crew_member("Laborer", 2)
                .with_equipment("Plate compactor", 30.0),
            rate("setting_out", "m2", 20.0)
                .with_crew_member("Surveyor", 1)
                .with_crew_member("Helper", 1),
            rate("plain_concrete", "m3", 0.8)
                .with_crew_member("Mason", 2)
                .with_crew_member("Laborer", 4)
                .with_equipment("Concrete mixer", 10.0),
            rate("formwork", "m2", 0.6)
                .with_crew_member("Carpenter", 4)
                .with_crew_member("Helper", 2),
            rate("rebar_fabrication", "ton", 0.04)
                .with_crew_member("Steel fixer", 2)
                .with_crew_member("Helper", 2),
            rate("reinforcement", "ton", 0.02)
                .with_crew_member("Steel fixer", 4)
                .with_crew_member("Helper", 2),
            rate("concrete_pour", "m3", 1.0)
                .with_crew_member("Mason", 2)
                .with_crew_member("Laborer", 6)
                .with_crew_member("Vibrator operator", 1)
                .with_equipment("Concrete pump", 20.0),
            rate("reinforced_concrete", "m3", 0.5)
                .with_crew_member("Carpenter", 4)
                .with_crew_member("Steel fixer", 4)
                .with_crew_member("Mason", 2)
                .with_crew_member("Laborer", 6),
            rate("columns", "m3", 0.6)
                .with_crew_member("Carpenter", 2)
                .with_crew_member("Steel fixer", 2)
                .with_crew_member("Mason", 2)
                .with_crew_member("Laborer", 4),
            rate("curing", "m3", 5.0).with_crew_member("Laborer", 1),
            rate("stripping", "m2", 2.0)
                .with_crew_member("Carpenter", 2)
                .with_crew_member("Helper", 2),
            rate("masonry", "m2", 0.8)
                .with_crew_member("Mason", 3)
                .with_crew_member("Helper", 3),
            rate("surface_preparation", "m2", 5.0).with_crew_member("Helper", 2),
            rate("plastering", "m2", 1.0)
                .with_crew_member("Plasterer", 3)
                .with_crew_member("Helper", 2),
            rate("screed", "m2", 2.0)
                .with_crew_member("Mason", 2)
                .with_crew_member("Helper", 2),
            rate("tiling", "m2", 0.5)
                .with_crew_member("Tiler", 3)
                .with_crew_member("Helper", 2),
            rate("grouting", "m2", 4.0)
                .with_crew_member("Tiler", 1)
                .with_crew_member("Helper", 1),
            rate("primer", "m2", 4.0).with_crew_member("Painter", 2),
            rate("painting", "m2", 2.0)
                .with_crew_member("Painter", 4)
                .with_crew_member("Helper", 1),
            rate("carpentry_frames", "nr", 0.25)
                .with_crew_member("Carpenter", 2)
                .with_crew_member("Helper", 1),
            rate("carpentry", "nr", 0.2)
                .with_crew_member("Carpenter", 2)
                .with_crew_member("Helper", 1),
            rate("plumbing_first_fix", "m", 1.5)
                .with_crew_member("Plumber", 2)
                .with_crew_member("Helper", 2),
            rate("pressure_test", "m", 20.0)
                .with_crew_member("Plumber", 1)
                .with_crew_member("Helper", 1),
            rate("plumbing_fixtures", "nr", 0.3)
                .with_crew_member("Plumber", 2)
                .with_crew_member("Helper", 1),
            rate("electrical_conduit", "m", 2.0)
                .with_crew_member("Electrician", 2)
                .with_crew_member("Helper", 2),
            rate("electrical_wiring", "m", 3.0)
                .with_crew_member("Electrician", 3)
                .with_crew_member("Helper", 1),
            rate("electrical_fixtures", "m", 5.0)
                .with_crew_member("Electrician", 2)
                .with_crew_member("Helper", 1),
            rate("hvac_ductwork", "m2", 0.5)
                .with_crew_member("Duct installer", 3)
                .with_crew_member("Helper", 2),
            rate("hvac_equipment", "nr", 0.1)
                .with_crew_member("HVAC technician", 2)
                .with_crew_member("Helper", 2),
            rate("commissioning", "nr", 10.0).with_crew_member("HVAC technician", 2),
            rate("waterproofing", "m2", 1.5)
                .with_crew_member("Insulator", 3)
                .with_crew_member("Helper", 1),
            rate("insulation", "m2", 1.5)
                .with_crew_member("Insulator", 3)
                .with_crew_member("Helper", 1),
            rate("pest_treatment", "m2", 20.0).with_crew_member("Applicator", 2),
            rate("installation", "nr", 0.25)
                .with_crew_member("Installer", 2)
                .with_crew_member("Helper", 2),
        ];
        Self {
            rates,
            default_duration_days: DEFAULT_DURATION_DAYS,
        }
    }
}
