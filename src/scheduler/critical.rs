//! Driving-chain flag.
//!
//! Without a forward/backward pass there is no float to compute. Instead,
//! every activity finishing on the project finish date is critical, and so
//! is every activity it transitively depends on.

use std::collections::HashMap;

use crate::models::ScheduleActivity;

/// Sets `critical` on the chains driving the project finish date.
///
/// All other activities are cleared. Returns the number flagged.
pub fn mark_driving_chain(activities: &mut [ScheduleActivity]) -> usize {
    let Some(finish) = activities.iter().map(|a| a.end).max() else {
        return 0;
    };

    let index: HashMap<&str, usize> = activities
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id.as_str(), i))
        .collect();

    let mut critical = vec![false; activities.len()];
    let mut stack: Vec<usize> = activities
        .iter()
        .enumerate()
        .filter(|(_, a)| a.end == finish)
        .map(|(i, _)| i)
        .collect();

    while let Some(i) = stack.pop() {
        if critical[i] {
            continue;
        }
        critical[i] = true;
        for pred in activities[i].predecessor_ids() {
            if let Some(&p) = index.get(pred) {
                if !critical[p] {
                    stack.push(p);
                }
            }
        }
    }

    let mut flagged = 0;
    for (activity, is_critical) in activities.iter_mut().zip(critical) {
        activity.critical = is_critical;
        if is_critical {
            flagged += 1;
        }
    }
    flagged
}
