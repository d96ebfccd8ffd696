//! Activity splitting and dependency enforcement.
//!
//! Both functions are pure with respect to their inputs: [`split_activity`]
//! returns two new activities, [`enforce_dependencies`] only moves
//! activities later, never earlier.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::calendar::CalendarEngine;
use crate::error::Result;
use crate::models::{Dependency, DependencyType, ResourceKind, ScheduleActivity};

/// Splits an activity at its temporal midpoint.
///
/// Each part runs `ceil(d / 2)` working days. Part 1 keeps the original
/// start and dependencies. Part 2 depends finish-to-start on part 1 and
/// starts on the first working day after part 1 that is not before
/// `not_before`. Quantity, man-hours and material cost are halved so the
/// parts add up to the original; crew and equipment headcounts are kept.
pub fn split_activity(
    activity: &ScheduleActivity,
    calendar: &CalendarEngine,
    not_before: NaiveDate,
) -> Result<(ScheduleActivity, ScheduleActivity)> {
    let half = activity.duration_days.max(1).div_ceil(2);

    let first_end = calendar.nth_working_day(activity.start, half)?;
    let mut first = part(activity, 1, half);
    first.start = activity.start;
    first.end = first_end;

    let after_first = calendar.working_day_after(first_end, 0)?;
    let second_start = if not_before > after_first {
        calendar.next_working_day(not_before)?
    } else {
        after_first
    };
    let mut second = part(activity, 2, half);
    second.start = second_start;
    second.end = calendar.nth_working_day(second_start, half)?;
    second.dependencies = vec![Dependency::finish_to_start(first.id.clone())];

    Ok((first, second))
}

fn part(activity: &ScheduleActivity, index: u8, duration: u32) -> ScheduleActivity {
    let mut piece = activity.clone();
    piece.id = format!("{}-P{}", activity.id, index);
    piece.wbs_code = format!("{}.{}", activity.wbs_code, index);
    piece.name = format!("{} (Part {})", activity.name, index);
    piece.duration_days = duration;
    piece.quantity = activity.quantity / 2.0;
    piece.man_hours = activity.man_hours / 2.0;
    for resource in &mut piece.resources {
        if resource.kind == ResourceKind::Material {
            resource.quantity /= 2.0;
            resource.daily_rate = resource.quantity / f64::from(duration);
        }
    }
    piece
}

/// Moves activities later until every dependency is satisfied.
///
/// Durations are kept; ends are recomputed on the calendar. Unknown
/// predecessors are ignored. Returns the number of moves made.
pub fn enforce_dependencies(
    activities: &mut [ScheduleActivity],
    calendar: &CalendarEngine,
) -> Result<usize> {
    let index: HashMap<String, usize> = activities
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id.clone(), i))
        .collect();

    let mut moves = 0;
    // Bounded: a cycle could otherwise push activities forever.
    for _ in 0..=activities.len() {
        let mut changed = false;
        for i in 0..activities.len() {
            let Some(required) = required_start(i, activities, &index, calendar)? else {
                continue;
            };
            if required > activities[i].start {
                let end = calendar.nth_working_day(required, activities[i].duration_days)?;
                let activity = &mut activities[i];
                tracing::debug!(
                    activity = %activity.id,
                    from = %activity.start,
                    to = %required,
                    "moved to satisfy dependencies"
                );
                activity.start = required;
                activity.end = end;
                moves += 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    Ok(moves)
}

fn required_start(
    i: usize,
    activities: &[ScheduleActivity],
    index: &HashMap<String, usize>,
    calendar: &CalendarEngine,
) -> Result<Option<NaiveDate>> {
    let activity = &activities[i];
    let mut required: Option<NaiveDate> = None;

    for dep in &activity.dependencies {
        let Some(&p) = index.get(&dep.predecessor_id) else {
            continue;
        };
        let pred = &activities[p];
        let candidate = match dep.dependency_type {
            DependencyType::FinishToStart => calendar.working_day_after(pred.end, dep.lag_days)?,
            DependencyType::StartToStart => calendar.nth_working_day(pred.start, dep.lag_days + 1)?,
            DependencyType::FinishToFinish => {
                let required_end = calendar.nth_working_day(pred.end, dep.lag_days + 1)?;
                if activity.end >= required_end {
                    continue;
                }
                let next = activity.end.succ_opt().unwrap_or(activity.end);
                let shift = calendar.working_days_between(next, required_end);
                if shift == 0 {
                    continue;
                }
                calendar.working_day_after(activity.start, shift - 1)?
            }
        };
        required = Some(required.map_or(candidate, |r| r.max(candidate)));
    }
    Ok(required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectCalendar, ResourceRequirement};
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() + chrono::Duration::days(i64::from(d) - 1)
    }

    fn every_day() -> CalendarEngine {
        CalendarEngine::new(ProjectCalendar::every_day("site")).unwrap()
    }

    fn act(id: &str, from: u32, duration: u32, labor: f64) -> ScheduleActivity {
        ScheduleActivity::new(id, id, day(from))
            .with_wbs("CON.1.1")
            .with_quantity(100.0, "m3")
            .with_man_hours(400.0)
            .with_span(duration, day(from), day(from + duration - 1))
            .with_resource(ResourceRequirement::labor("Worker", labor))
            .with_resource(ResourceRequirement::material("Mix", 1200.0, 1200.0 / f64::from(duration)))
    }

    #[test]
    fn test_split_even() {
        let original = act("A", 1, 4, 12.0).with_dependency(Dependency::finish_to_start("X"));
        let (p1, p2) = split_activity(&original, &every_day(), day(1)).unwrap();

        assert_eq!(p1.id, "A-P1");
        assert_eq!(p2.id, "A-P2");
        assert_eq!(p1.wbs_code, "CON.1.1.1");
        assert_eq!(p2.name, "A (Part 2)");
        assert_eq!((p1.start, p1.end), (day(1), day(2)));
        assert_eq!((p2.start, p2.end), (day(3), day(4)));
        assert_eq!(p1.predecessor_ids(), ["X"]);
        assert_eq!(p2.predecessor_ids(), ["A-P1"]);

        assert!((p1.quantity + p2.quantity - 100.0).abs() < 1e-9);
        assert!((p1.man_hours + p2.man_hours - 400.0).abs() < 1e-9);
        assert_eq!(p1.labor_headcount(), 12.0);
        assert!((p1.material_daily_cost() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_odd_rounds_up() {
        let (p1, p2) = split_activity(&act("A", 1, 5, 12.0), &every_day(), day(1)).unwrap();
        assert_eq!(p1.duration_days, 3);
        assert_eq!(p2.duration_days, 3);
        assert_eq!(p2.start, day(4));
    }

    #[test]
    fn test_split_deferred() {
        let (p1, p2) = split_activity(&act("A", 1, 4, 12.0), &every_day(), day(6)).unwrap();
        assert_eq!(p1.end, day(2));
        assert_eq!((p2.start, p2.end), (day(6), day(7)));
    }

    #[test]
    fn test_split_respects_calendar() {
        // 2025-03-06 is a Thursday; Friday and Saturday are off.
        let engine = CalendarEngine::new(ProjectCalendar::sunday_to_thursday("site")).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let original = ScheduleActivity::new("A", "A", start).with_span(
            4,
            start,
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        );
        let (p1, p2) = split_activity(&original, &engine, start).unwrap();
        assert_eq!(p1.end, NaiveDate::from_ymd_opt(2025, 3, 6).unwrap());
        assert_eq!(p2.start, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
    }

    #[test]
    fn test_enforce_finish_to_start() {
        let mut acts = vec![
            act("A", 1, 3, 1.0),
            act("B", 2, 2, 1.0).with_dependency(Dependency::finish_to_start("A")),
            act("C", 1, 1, 1.0).with_dependency(Dependency::finish_to_start("B").with_lag(1)),
        ];
        let moves = enforce_dependencies(&mut acts, &every_day()).unwrap();
        assert_eq!(moves, 2);
        assert_eq!((acts[1].start, acts[1].end), (day(4), day(5)));
        assert_eq!(acts[2].start, day(7));
    }

    #[test]
    fn test_enforce_never_moves_earlier() {
        let mut acts = vec![
            act("A", 1, 1, 1.0),
            act("B", 10, 1, 1.0).with_dependency(Dependency::finish_to_start("A")),
        ];
        assert_eq!(enforce_dependencies(&mut acts, &every_day()).unwrap(), 0);
        assert_eq!(acts[1].start, day(10));
    }

    #[test]
    fn test_enforce_start_and_finish_types() {
        let mut ss = Dependency::finish_to_start("A").with_lag(2);
        ss.dependency_type = DependencyType::StartToStart;
        let mut ff = Dependency::finish_to_start("A");
        ff.dependency_type = DependencyType::FinishToFinish;

        let mut acts = vec![
            act("A", 3, 5, 1.0),
            act("B", 1, 2, 1.0).with_dependency(ss),
            act("C", 1, 2, 1.0).with_dependency(ff),
        ];
        enforce_dependencies(&mut acts, &every_day()).unwrap();
        // Starts two working days after A starts.
        assert_eq!(acts[1].start, day(5));
        // Finishes together with A.
        assert_eq!(acts[2].end, day(7));
        assert_eq!(acts[2].start, day(6));
    }

    proptest! {
        #[test]
        fn prop_split_preserves_totals(duration in 1u32..60, quantity in 0.1f64..10_000.0) {
            let mut original = act("A", 1, duration, 12.0);
            original.quantity = quantity;
            let (p1, p2) = split_activity(&original, &every_day(), day(1)).unwrap();
            prop_assert!(p1.duration_days + p2.duration_days >= duration);
            prop_assert_eq!(p1.duration_days, p2.duration_days);
            prop_assert!((p1.quantity + p2.quantity - quantity).abs() < 1e-6);
            prop_assert!((p1.man_hours + p2.man_hours - original.man_hours).abs() < 1e-6);
            prop_assert!(p2.start > p1.end);
            prop_assert!(p1.end >= p1.start && p2.end >= p2.start);
        }
    }
}
