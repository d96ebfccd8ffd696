//! Resource leveling.
//!
//! Builds the per-date resource histogram of a schedule, evaluates the
//! peak-to-average labor ratio, and optionally splits overloaded activities
//! until the ratio is acceptable.
//!
//! # Balance Criterion
//!
//! | Quantity | Definition |
//! |----------|-----------|
//! | Peak labor | max daily headcount over the span |
//! | Average labor | mean daily headcount over every date of the span |
//! | Ratio | peak / average |
//! | Balanced | ratio <= 1.20 and peak <= site capacity (if any) |
//!
//! Leveling is copy-on-split: [`ResourceLeveler::auto_optimize`] returns a
//! new activity list and never mutates its input.
//!
//! # Reference
//! Harris (1978), "Precedence and Arrow Networking Techniques for
//! Construction", Ch. 12: Resource Leveling

mod engine;
mod histogram;
mod options;
mod split;

pub use engine::{LevelingOutcome, ResourceLeveler, SplitRecord, StopReason};
pub use histogram::ResourceHistogram;
pub use options::{CancellationToken, LevelingOptions};
pub use split::{enforce_dependencies, split_activity};
