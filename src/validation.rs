//! Input and output validation.
//!
//! Checks structural integrity of BOQ input before generation and of the
//! activity network after it. Detects:
//! - Duplicate or blank IDs
//! - Non-positive quantities and negative prices
//! - Unknown predecessor references
//! - Circular dependencies (DAG validation)
//! - Inverted date spans and zero durations
//!
//! Every problem found is reported, not just the first.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::models::{BoqItem, ScheduleActivity};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An entity has a blank ID.
    EmptyId,
    /// A BOQ quantity is not positive and finite, or a price is negative.
    InvalidQuantity,
    /// An activity references a predecessor that doesn't exist.
    InvalidPredecessor,
    /// Dependency graph contains a cycle.
    CyclicDependency,
    /// An activity ends before it starts.
    InvalidDates,
    /// An activity has a zero duration.
    InvalidDuration,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates BOQ input.
///
/// Checks:
/// 1. No blank item IDs
/// 2. No duplicate item IDs
/// 3. Quantities positive and finite
/// 4. Unit prices non-negative
pub fn validate_boq_items(items: &[BoqItem]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for item in items {
        if item.id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                format!("BOQ item '{}' has a blank ID", item.description),
            ));
        } else if !ids.insert(item.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate BOQ item ID: {}", item.id),
            ));
        }

        if let Err(err) = item.validate() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidQuantity,
                err.to_string(),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a generated activity network.
///
/// Checks:
/// 1. No duplicate activity IDs
/// 2. All predecessor references point to existing activities
/// 3. No circular dependencies
/// 4. `end >= start` and `duration >= 1`
pub fn validate_activities(activities: &[ScheduleActivity]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for act in activities {
        if !ids.insert(act.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate activity ID: {}", act.id),
            ));
        }
    }

    for act in activities {
        for pred in act.predecessor_ids() {
            if !ids.contains(pred) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    format!(
                        "Activity '{}' references unknown predecessor '{}'",
                        act.id, pred
                    ),
                ));
            }
        }
        if act.end < act.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDates,
                format!(
                    "Activity '{}' ends ({}) before it starts ({})",
                    act.id, act.end, act.start
                ),
            ));
        }
        if act.duration_days == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Activity '{}' has zero duration", act.id),
            ));
        }
    }

    if let Some(cycle_err) = detect_cycles(activities) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Visit state of an activity during the cycle search.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unseen,
    Open,
    Closed,
}

/// Finds the first activity, in input order, whose successor walk returns
/// to an activity still open on the walk.
///
/// Iterative depth-first search with an explicit `(node, next edge)`
/// stack, so long predecessor chains cannot exhaust the call stack.
/// Unknown predecessors are ignored here; they are reported separately.
fn detect_cycles(activities: &[ScheduleActivity]) -> Option<ValidationError> {
    let index: HashMap<&str, usize> = activities
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id.as_str(), i))
        .collect();

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); activities.len()];
    for (i, act) in activities.iter().enumerate() {
        for pred in act.predecessor_ids() {
            if let Some(&p) = index.get(pred) {
                successors[p].push(i);
            }
        }
    }

    let mut marks = vec![Mark::Unseen; activities.len()];
    for root in 0..activities.len() {
        if marks[root] != Mark::Unseen {
            continue;
        }
        marks[root] = Mark::Open;
        let mut stack = vec![(root, 0usize)];

        while let Some((node, edge)) = stack.last_mut() {
            let node = *node;
            match successors[node].get(*edge) {
                Some(&next) => {
                    *edge += 1;
                    match marks[next] {
                        Mark::Open => {
                            return Some(ValidationError::new(
                                ValidationErrorKind::CyclicDependency,
                                format!(
                                    "Circular dependency: '{}' is reached again from '{}'",
                                    activities[next].id, activities[node].id
                                ),
                            ));
                        }
                        Mark::Unseen => {
                            marks[next] = Mark::Open;
                            stack.push((next, 0));
                        }
                        Mark::Closed => {}
                    }
                }
                None => {
                    marks[node] = Mark::Closed;
                    stack.pop();
                }
            }
        }
    }

    None
}
