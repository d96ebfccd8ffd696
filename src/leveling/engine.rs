//! Resource leveling engine.
//!
//! # Algorithm
//!
//! 1. Build the daily histogram over the whole project span.
//! 2. `ratio = peak / average`. Balanced iff `ratio <= threshold` and the
//!    peak is within the site labor capacity (if one is given).
//! 3. Auto-optimize: while unbalanced and under the iteration cap, take the
//!    worst day, pick the heaviest activity on it with more than the split
//!    threshold of workers, split it at its midpoint, push successors later
//!    as needed, and re-evaluate.
//!
//! The loop is greedy and may stop unbalanced. Splitting cannot relieve the
//! first half of an activity, so a peak on the day an activity starts is not
//! reduced by splitting that activity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::histogram::ResourceHistogram;
use super::options::{CancellationToken, LevelingOptions};
use super::split::{enforce_dependencies, split_activity};
use crate::calendar::CalendarEngine;
use crate::error::{ConfigError, Result};
use crate::models::{ResourceLevelingResult, ScheduleActivity};

const RATIO_EPSILON: f64 = 1e-9;

/// Why auto-optimize stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The schedule is balanced.
    Balanced,
    /// The iteration cap was reached.
    IterationCap,
    /// No activity on the worst day can be split.
    NoSplittableActivity,
    /// Cancelled by token or timeout.
    Cancelled,
}

/// One split performed by auto-optimize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub original_id: String,
    pub first_id: String,
    pub second_id: String,
    /// Worst day that triggered the split.
    pub peak_date: NaiveDate,
    /// Labor headcount of the split activity.
    pub labor: f64,
}

/// Result of auto-optimize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelingOutcome {
    /// The leveled activity list (a new list; the input is untouched).
    pub activities: Vec<ScheduleActivity>,
    /// Analysis of `activities`.
    pub result: ResourceLevelingResult,
    /// Iterations performed (one split each).
    pub iterations: usize,
    pub splits: Vec<SplitRecord>,
    pub stop_reason: StopReason,
}

/// Histogram analysis and greedy split-based leveling.
#[derive(Debug, Clone)]
pub struct ResourceLeveler {
    calendar: CalendarEngine,
    options: LevelingOptions,
    labor_capacity: Option<u32>,
    cancellation: Option<CancellationToken>,
}

impl ResourceLeveler {
    /// Creates a leveler after validating `options`.
    pub fn new(calendar: CalendarEngine, options: LevelingOptions) -> std::result::Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            calendar,
            options,
            labor_capacity: None,
            cancellation: None,
        })
    }

    /// Sets the site labor capacity ceiling.
    pub fn with_labor_capacity(mut self, capacity: u32) -> Self {
        self.labor_capacity = Some(capacity);
        self
    }

    /// Sets an optional capacity ceiling.
    pub fn with_optional_capacity(mut self, capacity: Option<u32>) -> Self {
        self.labor_capacity = capacity;
        self
    }

    /// Attaches a cancellation token checked between iterations.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn options(&self) -> &LevelingOptions {
        &self.options
    }

    pub fn labor_capacity(&self) -> Option<u32> {
        self.labor_capacity
    }

    /// Builds the histogram and evaluates balance.
    pub fn analyze(&self, activities: &[ScheduleActivity]) -> ResourceLevelingResult {
        let histogram = ResourceHistogram::build(activities);
        let peak_labor = histogram.peak_labor();
        let average_labor = histogram.average_labor();
        let ratio = histogram.peak_to_average_ratio();

        let within_capacity = self
            .labor_capacity
            .map_or(true, |cap| peak_labor <= f64::from(cap));
        let is_balanced = ratio <= self.options.balance_threshold + RATIO_EPSILON && within_capacity;

        let recommendations = if is_balanced {
            Vec::new()
        } else {
            self.recommend(activities, &histogram, ratio)
        };

        ResourceLevelingResult {
            histogram: histogram.into_entries(),
            peak_labor,
            average_labor,
            peak_to_average_ratio: ratio,
            is_balanced,
            recommendations,
        }
    }

    /// Splits overloaded activities until balanced or a stop condition hits.
    ///
    /// Returns a new activity list; `activities` is never modified.
    pub fn auto_optimize(&self, activities: &[ScheduleActivity]) -> Result<LevelingOutcome> {
        let started = Instant::now();
        let mut current = activities.to_vec();
        let mut result = self.analyze(&current);
        let mut splits: Vec<SplitRecord> = Vec::new();

        let stop_reason = loop {
            if result.is_balanced {
                break StopReason::Balanced;
            }
            if splits.len() >= self.options.max_iterations {
                break StopReason::IterationCap;
            }
            if self.is_cancelled(started) {
                break StopReason::Cancelled;
            }
            let Some((next, record)) = self.split_worst(&current)? else {
                break StopReason::NoSplittableActivity;
            };

            tracing::debug!(
                iteration = splits.len() + 1,
                activity = %record.original_id,
                peak_date = %record.peak_date,
                labor = record.labor,
                "split overloaded activity"
            );
            current = next;
            splits.push(record);
            result = self.analyze(&current);
            tracing::debug!(
                iteration = splits.len(),
                ratio = result.peak_to_average_ratio,
                peak = result.peak_labor,
                "leveling iteration"
            );
        };

        tracing::info!(
            ?stop_reason,
            iterations = splits.len(),
            ratio = result.peak_to_average_ratio,
            balanced = result.is_balanced,
            "leveling finished"
        );

        Ok(LevelingOutcome {
            activities: current,
            result,
            iterations: splits.len(),
            splits,
            stop_reason,
        })
    }

    fn is_cancelled(&self, started: Instant) -> bool {
        if self.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return true;
        }
        self.options
            .timeout
            .is_some_and(|timeout| started.elapsed() >= timeout)
    }

    /// Labor level above which a day counts as overloaded.
    fn overload_level(&self, average: f64) -> f64 {
        let level = average * self.options.balance_threshold;
        match self.labor_capacity {
            Some(cap) => level.min(f64::from(cap)),
            None => level,
        }
    }

    fn split_worst(
        &self,
        activities: &[ScheduleActivity],
    ) -> Result<Option<(Vec<ScheduleActivity>, SplitRecord)>> {
        let histogram = ResourceHistogram::build(activities);
        let Some(peak_date) = histogram.peak_date() else {
            return Ok(None);
        };

        let mut chosen: Option<(usize, f64)> = None;
        for (idx, activity) in activities.iter().enumerate() {
            let labor = activity.labor_headcount();
            let splittable = activity.duration_days >= 2
                && labor > self.options.split_labor_threshold
                && activity.is_active_on(peak_date);
            if splittable && chosen.map_or(true, |(_, best)| labor > best) {
                chosen = Some((idx, labor));
            }
        }
        let Some((idx, labor)) = chosen else {
            return Ok(None);
        };

        let level = self.overload_level(histogram.average_labor());
        let (_, window_end) = histogram.window_above(peak_date, level);
        let not_before = window_end.succ_opt().unwrap_or(window_end);

        let original = &activities[idx];
        let (first, second) = split_activity(original, &self.calendar, not_before)?;
        let record = SplitRecord {
            original_id: original.id.clone(),
            first_id: first.id.clone(),
            second_id: second.id.clone(),
            peak_date,
            labor,
        };

        let mut next = Vec::with_capacity(activities.len() + 1);
        for (i, activity) in activities.iter().enumerate() {
            if i == idx {
                next.push(first.clone());
                next.push(second.clone());
                continue;
            }
            let mut copy = activity.clone();
            for dep in &mut copy.dependencies {
                if dep.predecessor_id == original.id {
                    dep.predecessor_id = second.id.clone();
                }
            }
            next.push(copy);
        }
        enforce_dependencies(&mut next, &self.calendar)?;

        Ok(Some((next, record)))
    }

    fn recommend(
        &self,
        activities: &[ScheduleActivity],
        histogram: &ResourceHistogram,
        ratio: f64,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();
        let Some(peak_date) = histogram.peak_date() else {
            return recommendations;
        };
        let peak = histogram.peak_labor();

        let mut heavy: Vec<&ScheduleActivity> = activities
            .iter()
            .filter(|a| a.is_active_on(peak_date))
            .filter(|a| a.labor_headcount() > self.options.split_labor_threshold)
            .collect();
        heavy.sort_by(|a, b| b.labor_headcount().total_cmp(&a.labor_headcount()));
        for activity in heavy {
            recommendations.push(format!(
                "Split Activity: '{}' ({}) needs {} workers on {}; split it into two linked parts",
                activity.name,
                activity.id,
                activity.labor_headcount(),
                peak_date
            ));
        }

        if let Some(cap) = self.labor_capacity {
            if peak > f64::from(cap) {
                let excess = crate::ceil_tolerant(peak - f64::from(cap));
                recommendations.push(format!(
                    "Add Crews: peak labor {peak} exceeds site capacity {cap} on {peak_date}; \
                     mobilize {excess} more workers or stagger the work"
                ));
            }
        }

        let level = self.overload_level(histogram.average_labor());
        let (from, to) = histogram.window_above(peak_date, level);

        if ratio > self.options.shift_ratio {
            recommendations.push(format!(
                "Add Shift: peak-to-average ratio {ratio:.2} exceeds {:.2}; \
                 run a second shift from {from} to {to}",
                self.options.shift_ratio
            ));
        }

        recommendations.push(format!(
            "Reschedule: move work out of {from} to {to}, where labor exceeds {level:.1} workers"
        ));
        recommendations
    }
}
