//! Resource histogram and leveling report models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregated resource demand on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramEntry {
    pub date: NaiveDate,
    /// Summed labor headcount.
    pub labor: f64,
    /// Summed equipment count.
    pub equipment: f64,
    /// Summed material cost per day.
    pub material_cost: f64,
}

impl HistogramEntry {
    /// An entry with no demand.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            labor: 0.0,
            equipment: 0.0,
            material_cost: 0.0,
        }
    }
}

/// Report produced by a leveling analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLevelingResult {
    /// One entry per date in the project span.
    pub histogram: Vec<HistogramEntry>,
    /// Highest daily labor headcount.
    pub peak_labor: f64,
    /// Mean daily labor headcount over the span.
    pub average_labor: f64,
    /// `peak_labor / average_labor` (0 for an empty schedule).
    pub peak_to_average_ratio: f64,
    /// Ratio within threshold and peak within site capacity.
    pub is_balanced: bool,
    /// Ordered, human-readable recommendations.
    pub recommendations: Vec<String>,
}

impl ResourceLevelingResult {
    /// First date carrying the peak labor, if any.
    pub fn peak_date(&self) -> Option<NaiveDate> {
        self.histogram
            .iter()
            .find(|e| e.labor >= self.peak_labor && self.peak_labor > 0.0)
            .map(|e| e.date)
    }

    /// Total labor-days across the span.
    pub fn total_labor_days(&self) -> f64 {
        self.histogram.iter().map(|e| e.labor).sum()
    }
}
