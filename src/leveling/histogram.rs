//! Per-date resource histogram.

use chrono::NaiveDate;

use crate::models::{HistogramEntry, ScheduleActivity};

/// Daily resource demand over the project span.
///
/// Every calendar date from the earliest start to the latest end has an
/// entry, including dates with no active work.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceHistogram {
    entries: Vec<HistogramEntry>,
}

impl ResourceHistogram {
    /// Sums the demand of every activity on every date it is active.
    pub fn build(activities: &[ScheduleActivity]) -> Self {
        let Some(span_start) = activities.iter().map(|a| a.start).min() else {
            return Self::default();
        };
        let span_end = activities
            .iter()
            .map(|a| a.end)
            .max()
            .unwrap_or(span_start);

        let mut entries: Vec<HistogramEntry> = span_start
            .iter_days()
            .take_while(|d| *d <= span_end)
            .map(HistogramEntry::empty)
            .collect();

        for activity in activities {
            if activity.end < activity.start {
                continue;
            }
            let labor = activity.labor_headcount();
            let equipment = activity.equipment_count();
            let material = activity.material_daily_cost();
            let first = (activity.start - span_start).num_days() as usize;
            let last = (activity.end - span_start).num_days() as usize;
            for entry in &mut entries[first..=last] {
                entry.labor += labor;
                entry.equipment += equipment;
                entry.material_cost += material;
            }
        }

        Self { entries }
    }

    /// Entries in date order.
    pub fn entries(&self) -> &[HistogramEntry] {
        &self.entries
    }

    /// Consumes the histogram.
    pub fn into_entries(self) -> Vec<HistogramEntry> {
        self.entries
    }

    /// Number of dates in the span.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the span is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest daily labor.
    pub fn peak_labor(&self) -> f64 {
        self.entries.iter().map(|e| e.labor).fold(0.0, f64::max)
    }

    /// Mean daily labor over the whole span.
    pub fn average_labor(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.entries.iter().map(|e| e.labor).sum::<f64>() / self.entries.len() as f64
    }

    /// Peak over average; 0 when there is no labor at all.
    pub fn peak_to_average_ratio(&self) -> f64 {
        let average = self.average_labor();
        if average <= 0.0 {
            0.0
        } else {
            self.peak_labor() / average
        }
    }

    /// First date carrying the peak labor.
    pub fn peak_date(&self) -> Option<NaiveDate> {
        let peak = self.peak_labor();
        if peak <= 0.0 {
            return None;
        }
        self.entries.iter().find(|e| e.labor >= peak).map(|e| e.date)
    }

    /// Labor on `date` (0 outside the span).
    pub fn labor_on(&self, date: NaiveDate) -> f64 {
        self.index_of(date).map(|i| self.entries[i].labor).unwrap_or(0.0)
    }

    /// Contiguous run of dates around `date` whose labor exceeds `level`.
    ///
    /// Returns `(date, date)` when `date` itself is not above `level`.
    pub fn window_above(&self, date: NaiveDate, level: f64) -> (NaiveDate, NaiveDate) {
        let Some(center) = self.index_of(date) else {
            return (date, date);
        };
        if self.entries[center].labor <= level {
            return (date, date);
        }
        let mut first = center;
        while first > 0 && self.entries[first - 1].labor > level {
            first -= 1;
        }
        let mut last = center;
        while last + 1 < self.entries.len() && self.entries[last + 1].labor > level {
            last += 1;
        }
        (self.entries[first].date, self.entries[last].date)
    }

    fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let start = self.entries.first()?.date;
        let offset = (date - start).num_days();
        usize::try_from(offset).ok().filter(|&i| i < self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceRequirement;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn act(id: &str, from: u32, to: u32, labor: f64) -> ScheduleActivity {
        ScheduleActivity::new(id, id, day(from))
            .with_span(to - from + 1, day(from), day(to))
            .with_resource(ResourceRequirement::labor("Worker", labor))
    }

    #[test]
    fn test_empty() {
        let h = ResourceHistogram::build(&[]);
        assert!(h.is_empty());
        assert_eq!(h.peak_labor(), 0.0);
        assert_eq!(h.average_labor(), 0.0);
        assert_eq!(h.peak_to_average_ratio(), 0.0);
        assert_eq!(h.peak_date(), None);
    }

    #[test]
    fn test_covers_gaps() {
        let h = ResourceHistogram::build(&[act("A", 1, 2, 4.0), act("B", 5, 5, 6.0)]);
        assert_eq!(h.len(), 5);
        let labor: Vec<f64> = h.entries().iter().map(|e| e.labor).collect();
        assert_eq!(labor, [4.0, 4.0, 0.0, 0.0, 6.0]);
        assert_eq!(h.peak_date(), Some(day(5)));
        assert!((h.average_labor() - 14.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_sums() {
        let h = ResourceHistogram::build(&[act("A", 1, 3, 5.0), act("B", 2, 4, 7.0)]);
        assert_eq!(h.labor_on(day(2)), 12.0);
        assert_eq!(h.labor_on(day(4)), 7.0);
        assert_eq!(h.labor_on(day(20)), 0.0);
    }

    #[test]
    fn test_material_and_equipment() {
        let a = act("A", 1, 2, 1.0)
            .with_resource(ResourceRequirement::equipment("Pump", 2.0))
            .with_resource(ResourceRequirement::material("Concrete", 1000.0, 500.0));
        let h = ResourceHistogram::build(&[a]);
        assert_eq!(h.entries()[0].equipment, 2.0);
        assert_eq!(h.entries()[1].material_cost, 500.0);
    }

    #[test]
    fn test_window_above() {
        let h = ResourceHistogram::build(&[
            act("A", 1, 6, 5.0),
            act("B", 3, 4, 10.0),
        ]);
        assert_eq!(h.window_above(day(3), 8.0), (day(3), day(4)));
        assert_eq!(h.window_above(day(1), 8.0), (day(1), day(1)));
    }
}
