//! Schedule generation pipeline and summary indicators.
//!
//! # Algorithm
//!
//! `ScheduleGenerator` runs BOQ items through classification,
//! decomposition, productivity-based duration estimation and calendar
//! resolution, then levels the combined activity set. Stages run in
//! sequence; leveling needs every activity and so waits for all items.
//!
//! # Summary
//!
//! `ScheduleSummary` reports span, effort, driving-chain size, fallbacks and
//! the leveling verdict.

mod critical;
mod generator;
mod kpi;

pub use critical::mark_driving_chain;
pub use generator::{GeneratorConfig, ScheduleGenerator, ScheduleRequest};
pub use kpi::ScheduleSummary;
