//! Project calendar models.
//!
//! Defines the working-week pattern, public holidays, Ramadan productivity
//! windows, the rainy-day buffer and advisory weather constraints.
//!
//! # Working day
//! A date is a working day iff its weekday is in `work_days` AND it is not
//! listed as a holiday.
//!
//! Date arithmetic over these models lives in [`crate::calendar::CalendarEngine`],
//! which validates the calendar first.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A named public holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }
}

/// A Ramadan period with reduced site productivity.
///
/// Working at `productivity_factor` efficiency takes `1 / factor` as long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamadanWindow {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
    /// Relative productivity, 0 < factor <= 1.
    pub productivity_factor: f64,
}

impl RamadanWindow {
    pub fn new(start: NaiveDate, end: NaiveDate, productivity_factor: f64) -> Self {
        Self {
            start,
            end,
            productivity_factor,
        }
    }
}

/// Advisory weather constraints.
///
/// Never blocks scheduling; only produces warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherConstraints {
    /// Lowest workable temperature (°C).
    pub min_temperature_c: Option<f64>,
    /// Highest workable temperature (°C).
    pub max_temperature_c: Option<f64>,
    /// Months (1..=12) of the rainy season.
    pub rainy_season_months: Vec<u32>,
    /// Expected mean temperature per month (January first).
    pub monthly_mean_temperature_c: Option<[f64; 12]>,
}

impl WeatherConstraints {
    /// Sets the workable temperature range.
    pub fn with_temperature_bounds(mut self, min_c: f64, max_c: f64) -> Self {
        self.min_temperature_c = Some(min_c);
        self.max_temperature_c = Some(max_c);
        self
    }

    /// Sets the rainy-season months.
    pub fn with_rainy_season(mut self, months: Vec<u32>) -> Self {
        self.rainy_season_months = months;
        self
    }

    /// Sets the expected monthly mean temperatures.
    pub fn with_monthly_means(mut self, means: [f64; 12]) -> Self {
        self.monthly_mean_temperature_c = Some(means);
        self
    }
}

/// Project working calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCalendar {
    /// Calendar identifier.
    pub id: String,
    /// Weekdays on which site work happens.
    pub work_days: Vec<Weekday>,
    /// Non-working dates.
    pub holidays: Vec<Holiday>,
    /// Statistical rainy-day allowance, percent of working days.
    pub rainy_buffer_pct: f64,
    /// Reduced-productivity windows.
    pub ramadan_windows: Vec<RamadanWindow>,
    /// Advisory weather constraints.
    pub weather: WeatherConstraints,
}

impl ProjectCalendar {
    /// Creates a calendar with the given work week and nothing else.
    pub fn new(id: impl Into<String>, work_days: Vec<Weekday>) -> Self {
        Self {
            id: id.into(),
            work_days,
            holidays: Vec::new(),
            rainy_buffer_pct: 0.0,
            ramadan_windows: Vec::new(),
            weather: WeatherConstraints::default(),
        }
    }

    /// Sunday-to-Thursday work week.
    pub fn sunday_to_thursday(id: impl Into<String>) -> Self {
        Self::new(
            id,
            vec![
                Weekday::Sun,
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
            ],
        )
    }

    /// Monday-to-Friday work week.
    pub fn monday_to_friday(id: impl Into<String>) -> Self {
        Self::new(
            id,
            vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        )
    }

    /// Seven-day work week.
    pub fn every_day(id: impl Into<String>) -> Self {
        Self::new(
            id,
            vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ],
        )
    }

    /// Adds a holiday.
    pub fn with_holiday(mut self, date: NaiveDate, name: impl Into<String>) -> Self {
        self.holidays.push(Holiday::new(date, name));
        self
    }

    /// Sets the rainy-day buffer percentage.
    pub fn with_rainy_buffer(mut self, pct: f64) -> Self {
        self.rainy_buffer_pct = pct;
        self
    }

    /// Adds a Ramadan window.
    pub fn with_ramadan(mut self, start: NaiveDate, end: NaiveDate, factor: f64) -> Self {
        self.ramadan_windows
            .push(RamadanWindow::new(start, end, factor));
        self
    }

    /// Sets weather constraints.
    pub fn with_weather(mut self, weather: WeatherConstraints) -> Self {
        self.weather = weather;
        self
    }

    /// Checks the calendar for values that would loop forever or divide by zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.work_days.is_empty() {
            return Err(ConfigError::NoWorkingDays);
        }
        if !self.rainy_buffer_pct.is_finite() || !(0.0..=100.0).contains(&self.rainy_buffer_pct) {
            return Err(ConfigError::InvalidRainyBuffer {
                value: self.rainy_buffer_pct,
            });
        }
        for w in &self.ramadan_windows {
            if w.end < w.start {
                return Err(ConfigError::InvalidRamadanWindow {
                    start: w.start,
                    end: w.end,
                });
            }
            let f = w.productivity_factor;
            if !f.is_finite() || f <= 0.0 || f > 1.0 {
                return Err(ConfigError::InvalidProductivityFactor {
                    start: w.start,
                    factor: f,
                });
            }
        }
        if let Some(bad) = self
            .weather
            .rainy_season_months
            .iter()
            .find(|m| !(1..=12).contains(*m))
        {
            return Err(ConfigError::InvalidValue {
                field: "weather.rainy_season_months".into(),
                reason: format!("month {bad} is outside 1..=12"),
            });
        }
        Ok(())
    }
}

impl Default for ProjectCalendar {
    fn default() -> Self {
        Self::sunday_to_thursday("default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_ok() {
        let cal = ProjectCalendar::default()
            .with_rainy_buffer(6.0)
            .with_ramadan(date(2025, 3, 1), date(2025, 3, 30), 0.75);
        assert!(cal.validate().is_ok());
    }

    #[test]
    fn test_validate_no_work_days() {
        let cal = ProjectCalendar::new("empty", Vec::new());
        assert_eq!(cal.validate(), Err(ConfigError::NoWorkingDays));
    }

    #[test]
    fn test_validate_bad_buffer() {
        let cal = ProjectCalendar::default().with_rainy_buffer(-1.0);
        assert!(matches!(
            cal.validate(),
            Err(ConfigError::InvalidRainyBuffer { .. })
        ));
        let cal = ProjectCalendar::default().with_rainy_buffer(f64::NAN);
        assert!(cal.validate().is_err());
    }

    #[test]
    fn test_validate_bad_ramadan() {
        let zero = ProjectCalendar::default().with_ramadan(date(2025, 3, 1), date(2025, 3, 30), 0.0);
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::InvalidProductivityFactor { .. })
        ));

        let reversed =
            ProjectCalendar::default().with_ramadan(date(2025, 3, 30), date(2025, 3, 1), 0.8);
        assert!(matches!(
            reversed.validate(),
            Err(ConfigError::InvalidRamadanWindow { .. })
        ));
    }

    #[test]
    fn test_validate_bad_month() {
        let cal = ProjectCalendar::default()
            .with_weather(WeatherConstraints::default().with_rainy_season(vec![11, 13]));
        assert!(matches!(cal.validate(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_serde_roundtrip() {
        let cal = ProjectCalendar::monday_to_friday("eu")
            .with_holiday(date(2025, 12, 25), "Christmas")
            .with_rainy_buffer(4.0);
        let json = serde_json::to_string(&cal).unwrap();
        let back: ProjectCalendar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cal);
    }
}
