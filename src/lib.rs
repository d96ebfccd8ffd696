//! Construction schedule generation from a Bill of Quantities.
//!
//! Turns priced BOQ line items into a time-phased network of construction
//! activities with calendar-accurate dates and load-balanced labor.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `BoqItem`, `ActivityCategory`,
//!   `ExtractedActivity`, `ScheduleActivity`, `ProjectCalendar`, `Schedule`
//! - **`classifier`**: Keyword rule tables mapping BOQ text to trade categories
//! - **`productivity`**: Productivity catalog (durations, crews, man-hours)
//! - **`decomposition`**: Category-recipe and specification-text decomposers
//! - **`calendar`**: Working-day arithmetic with holidays, Ramadan and rain buffers
//! - **`leveling`**: Resource histogram, balance analysis and split-based leveling
//! - **`scheduler`**: End-to-end pipeline and summary indicators
//! - **`validation`**: Input integrity and activity-network checks
//!
//! # Pipeline
//!
//! ```text
//! BOQ items → classify → decompose → durations (catalog) → dates (calendar) → level
//! ```
//!
//! Data-quality gaps (unrecognized text, missing productivity entries) fall
//! back to documented defaults and are recorded as diagnostics; invalid
//! configuration is rejected up front.
//!
//! # References
//!
//! - Harris (1978), "Precedence and Arrow Networking Techniques for Construction"
//! - Peurifoy et al. (2018), "Construction Planning, Equipment, and Methods"

pub mod calendar;
pub mod classifier;
pub mod decomposition;
pub mod error;
pub mod leveling;
pub mod models;
pub mod productivity;
pub mod scheduler;
pub mod validation;

pub use error::{ConfigError, Result, ScheduleError};

/// Ceiling that ignores floating-point noise just above an integer
/// (e.g. `106.00000000000001` → 106).
pub(crate) fn ceil_tolerant(value: f64) -> f64 {
    (value - 1e-9).ceil()
}
