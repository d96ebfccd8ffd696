//! Construction scheduling domain models.
//!
//! Provides the core data types flowing through the pipeline, from BOQ input
//! to leveled schedule output.
//!
//! # Lifecycle
//!
//! | Stage | Type | Lifetime |
//! |-------|------|----------|
//! | Input | `BoqItem` | Supplied once, never mutated |
//! | Decomposition | `ExtractedActivity` | Ephemeral |
//! | Scheduling | `ScheduleActivity` | May be replaced by split halves during leveling |
//! | Leveling | `HistogramEntry`, `ResourceLevelingResult` | Recomputed per iteration |
//! | Output | `Schedule` | Returned to caller |

mod activity;
mod boq;
mod calendar;
mod category;
mod extracted;
mod leveling;
mod schedule;

pub use activity::{
    ActivityStatus, Dependency, DependencyType, ResourceKind, ResourceRequirement, ScheduleActivity,
};
pub use boq::BoqItem;
pub use calendar::{Holiday, ProjectCalendar, RamadanWindow, WeatherConstraints};
pub use category::ActivityCategory;
pub use extracted::{is_sequence_ordered, sequence, ExtractedActivity, GENERIC_ACTIVITY_TYPE};
pub use leveling::{HistogramEntry, ResourceLevelingResult};
pub use schedule::{Diagnostic, DiagnosticKind, Schedule};
