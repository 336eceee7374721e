//! Property tests for the tracker's bookkeeping invariants.

use chrono::{DateTime, Local, TimeZone};
use proptest::prelude::*;
use rewardpoints_core::catalog::default_activities;
use rewardpoints_core::RewardTracker;

#[derive(Debug, Clone)]
enum Op {
    Activity(usize),
    Quick(usize),
    Custom(u32),
    Undo(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8).prop_map(Op::Activity),
        (0usize..3).prop_map(Op::Quick),
        (1u32..=100).prop_map(Op::Custom),
        (0usize..60).prop_map(Op::Undo),
    ]
}

fn noon() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
}

fn apply(tracker: &mut RewardTracker, op: &Op, now: DateTime<Local>) {
    let activities = default_activities();
    match *op {
        Op::Activity(i) => {
            let id = activities[i % activities.len()].id.clone();
            tracker.award_activity_at(&id, now).unwrap();
        }
        Op::Quick(i) => {
            let points = tracker.rules().quick_add_values()[i % 3];
            tracker.quick_add_at(points, now).unwrap();
        }
        Op::Custom(points) => {
            tracker.custom_points_at(points, now).unwrap();
        }
        Op::Undo(index) => {
            tracker.undo_at(index, now);
        }
    }
}

proptest! {
    #[test]
    fn total_matches_ledger_and_daily_cap_holds(ops in prop::collection::vec(op(), 0..45)) {
        let now = noon();
        let mut tracker = RewardTracker::default();
        tracker.rollover_if_new_day_at(now);
        let mut unlocked_before = 0;

        for op in &ops {
            apply(&mut tracker, op, now);

            let state = tracker.state();
            prop_assert_eq!(state.total_points(), state.ledger_sum());
            prop_assert!(tracker.today_points_at(now) <= state.settings().daily_limit);
            prop_assert_eq!(u64::from(tracker.today_points_at(now)), state.ledger_sum());

            let unlocked = state.badge_unlocks().len();
            prop_assert!(unlocked >= unlocked_before);
            unlocked_before = unlocked;
        }
    }

    #[test]
    fn non_repeatable_activity_awards_once_per_day(i in 0usize..7, repeats in 2usize..5) {
        let now = noon();
        let mut tracker = RewardTracker::default();
        let activity = default_activities()
            .into_iter()
            .filter(|a| !a.repeatable)
            .nth(i % 7)
            .unwrap();

        let awarded = (0..repeats)
            .map(|_| tracker.award_activity_at(&activity.id, now).unwrap())
            .filter(|o| o.is_awarded())
            .count();
        prop_assert_eq!(awarded, 1);
        prop_assert_eq!(tracker.total_points(), u64::from(activity.points));
    }
}
