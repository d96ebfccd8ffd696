//! Calendar engine.
//!
//! Converts working-day durations into calendar dates over a validated
//! [`ProjectCalendar`]: working-week pattern, holidays, rainy-day buffer and
//! Ramadan productivity windows.
//!
//! # Date resolution
//!
//! 1. `buffered = d + ceil(d × rainy_buffer_pct / 100)`
//! 2. `final = buffered + Σ ceil(overlap × (1 − f) / f)` over Ramadan windows
//! 3. Walk forward from `start`, counting working days (start included),
//!    until the count reaches `final`; the end is the date of the last one.
//!
//! # Termination
//! Walking needs at least one working weekday. [`CalendarEngine::new`]
//! rejects calendars without one, so every walk terminates.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ceil_tolerant;
use crate::error::{ConfigError, Result, ScheduleError};
use crate::models::ProjectCalendar;

/// Result of an advisory weather check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCheck {
    /// False when any advisory applies. Never blocks scheduling.
    pub is_viable: bool,
    pub warnings: Vec<String>,
}

/// Date arithmetic over a validated project calendar.
///
/// # Example
/// ```
/// use boq_schedule::calendar::CalendarEngine;
/// use boq_schedule::models::ProjectCalendar;
/// use chrono::NaiveDate;
///
/// let engine = CalendarEngine::new(ProjectCalendar::monday_to_friday("site")).unwrap();
/// let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
/// let friday = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// assert_eq!(engine.resolve_end_date(monday, 5).unwrap(), friday);
/// ```
#[derive(Debug, Clone)]
pub struct CalendarEngine {
    calendar: ProjectCalendar,
    holidays: HashSet<NaiveDate>,
}

impl CalendarEngine {
    /// Validates the calendar and builds the engine.
    pub fn new(calendar: ProjectCalendar) -> std::result::Result<Self, ConfigError> {
        calendar.validate()?;
        let holidays = calendar.holidays.iter().map(|h| h.date).collect();
        Ok(Self { calendar, holidays })
    }

    /// The underlying calendar.
    pub fn calendar(&self) -> &ProjectCalendar {
        &self.calendar
    }

    /// Whether `date` is a working day.
    #[inline]
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.calendar.work_days.contains(&date.weekday()) && !self.holidays.contains(&date)
    }

    /// Working days in [start, end], both inclusive. Zero when `end < start`.
    pub fn working_days_between(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if end < start {
            return 0;
        }
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| self.is_working_day(*d))
            .count() as u32
    }

    /// Adds the rainy-day allowance to a working-day count.
    ///
    /// Saturates at `u32::MAX`; such a count cannot be placed on the
    /// calendar and [`nth_working_day`](Self::nth_working_day) reports it.
    pub fn apply_rainy_buffer(&self, working_days: u32) -> u32 {
        let extra = ceil_tolerant(f64::from(working_days) * self.calendar.rainy_buffer_pct / 100.0);
        working_days.saturating_add(extra.max(0.0) as u32)
    }

    /// Extends a duration for reduced productivity inside Ramadan windows.
    ///
    /// The activity span is `duration` working days from `start`. For each
    /// window it overlaps, the overlapping working days `n` at factor `f`
    /// add `ceil(n × (1 − f) / f)` days.
    pub fn adjust_for_ramadan(&self, start: NaiveDate, duration: u32) -> Result<u32> {
        if duration == 0 || self.calendar.ramadan_windows.is_empty() {
            return Ok(duration);
        }
        let span_end = self.nth_working_day(start, duration)?;

        let mut extra = 0u32;
        for window in &self.calendar.ramadan_windows {
            if window.end < start || window.start > span_end {
                continue;
            }
            let overlap =
                self.working_days_between(window.start.max(start), window.end.min(span_end));
            let f = window.productivity_factor;
            let days = ceil_tolerant(f64::from(overlap) * (1.0 - f) / f).max(0.0) as u32;
            extra = extra.saturating_add(days);
        }
        duration
            .checked_add(extra)
            .ok_or(ScheduleError::DateOutOfRange(start))
    }

    /// Calendar date of the last working day of an activity.
    ///
    /// Applies the rainy buffer, then the Ramadan adjustment, then walks
    /// working days from `start` (inclusive). A zero duration ends on `start`.
    pub fn resolve_end_date(&self, start: NaiveDate, requested_duration: u32) -> Result<NaiveDate> {
        let buffered = self.apply_rainy_buffer(requested_duration);
        let effective = self.adjust_for_ramadan(start, buffered)?;
        self.nth_working_day(start, effective)
    }

    /// Working days an activity actually occupies after buffer and Ramadan.
    pub fn effective_duration(&self, start: NaiveDate, requested_duration: u32) -> Result<u32> {
        let buffered = self.apply_rainy_buffer(requested_duration);
        self.adjust_for_ramadan(start, buffered)
    }

    /// The `n`-th working day counting from `start` inclusive (`n = 0` → `start`).
    ///
    /// Fails with `DateOutOfRange` when `n` calendar days past `start`
    /// already exceed the representable date range.
    pub fn nth_working_day(&self, start: NaiveDate, n: u32) -> Result<NaiveDate> {
        if n == 0 {
            return Ok(start);
        }
        start
            .checked_add_days(Days::new(u64::from(n - 1)))
            .ok_or(ScheduleError::DateOutOfRange(start))?;
        let mut current = start;
        let mut counted = 0u32;
        loop {
            if self.is_working_day(current) {
                counted += 1;
                if counted == n {
                    return Ok(current);
                }
            }
            current = current
                .succ_opt()
                .ok_or(ScheduleError::DateOutOfRange(current))?;
        }
    }

    /// First working day on or after `date`.
    pub fn next_working_day(&self, date: NaiveDate) -> Result<NaiveDate> {
        self.nth_working_day(date, 1)
    }

    /// First working day strictly after `date`, skipping `lag_days` further working days.
    pub fn working_day_after(&self, date: NaiveDate, lag_days: u32) -> Result<NaiveDate> {
        let next = date.succ_opt().ok_or(ScheduleError::DateOutOfRange(date))?;
        self.nth_working_day(next, lag_days.saturating_add(1))
    }

    /// Advisory weather check for work starting on `date`.
    pub fn check_weather_constraints(&self, date: NaiveDate) -> WeatherCheck {
        let weather = &self.calendar.weather;
        let month = date.month();
        let mut warnings = Vec::new();

        if weather.rainy_season_months.contains(&month) {
            warnings.push(format!("{date} falls in the rainy season (month {month})"));
        }

        if let Some(means) = weather.monthly_mean_temperature_c {
            let mean = means[month as usize - 1];
            if let Some(min) = weather.min_temperature_c {
                if mean < min {
                    warnings.push(format!(
                        "{date}: expected mean temperature {mean:.1}°C is below the workable minimum {min:.1}°C"
                    ));
                }
            }
            if let Some(max) = weather.max_temperature_c {
                if mean > max {
                    warnings.push(format!(
                        "{date}: expected mean temperature {mean:.1}°C exceeds the workable maximum {max:.1}°C"
                    ));
                }
            }
        }

        WeatherCheck {
            is_viable: warnings.is_empty(),
            warnings,
        }
    }
}
