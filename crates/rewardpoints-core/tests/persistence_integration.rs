//! Integration tests for the full load, operate, save cycle.
//!
//! Mirrors what the CLI does on every invocation: open the database, load
//! the config and stored state, roll the day over, run one operation, save.

use chrono::{DateTime, Local, TimeZone};
use rewardpoints_core::{Config, Database, RejectReason, RewardState, RewardTracker, StateStore};

fn day(d: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 6, d, 9, 30, 0).unwrap()
}

fn with_tracker<T>(
    db: &Database,
    config: &Config,
    now: DateTime<Local>,
    op: impl FnOnce(&mut RewardTracker) -> T,
) -> T {
    let store = StateStore::new(db);
    let state = store
        .load_or_else(|| RewardState::with_settings(config.initial_settings()))
        .unwrap();
    let mut tracker = RewardTracker::new(state, config.rules().unwrap());
    tracker.rollover_if_new_day_at(now);
    let result = op(&mut tracker);
    store.save(tracker.state()).unwrap();
    result
}

#[test]
fn test_state_survives_reopening_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewardpoints.db");
    let config = Config::default();

    {
        let db = Database::open_at(&path).unwrap();
        with_tracker(&db, &config, day(3), |t| {
            t.award_activity_at("homework", day(3)).unwrap();
            t.custom_points_at(7, day(3)).unwrap();
        });
    }

    let db = Database::open_at(&path).unwrap();
    let total = with_tracker(&db, &config, day(3), |t| {
        let outcome = t.award_activity_at("homework", day(3)).unwrap();
        assert_eq!(outcome.rejected, Some(RejectReason::AlreadyCompletedToday));
        t.total_points()
    });
    assert_eq!(total, 17);
}

#[test]
fn test_new_day_clears_daily_marks_but_keeps_totals() {
    let db = Database::open_memory().unwrap();
    let config = Config::default();

    with_tracker(&db, &config, day(3), |t| {
        t.award_activity_at("reading", day(3)).unwrap();
        t.quick_add_at(10, day(3)).unwrap();
    });

    let (awarded, total, streak) = with_tracker(&db, &config, day(4), |t| {
        assert_eq!(t.today_points_at(day(4)), 0);
        let outcome = t.award_activity_at("reading", day(4)).unwrap();
        (outcome.is_awarded(), t.total_points(), t.current_streak_at(day(4)))
    });
    assert!(awarded);
    assert_eq!(total, 30);
    // Rollover wiped yesterday's points, so the streak restarts.
    assert_eq!(streak, 1);
}

#[test]
fn test_configured_defaults_seed_fresh_state() {
    let db = Database::open_memory().unwrap();
    let mut config = Config::default();
    config.defaults.display_name = "Sam".into();
    config.defaults.daily_limit = 20;

    let outcome = with_tracker(&db, &config, day(5), |t| {
        t.custom_points_at(100, day(5)).unwrap()
    });
    assert_eq!(outcome.awarded, 20);
    assert!(outcome.was_adjusted());

    let stored = StateStore::new(&db).load().unwrap();
    assert_eq!(stored.settings().display_name, "Sam");
    assert_eq!(stored.total_points(), 20);
}

#[test]
fn test_reset_then_badges_stay_unlocked() {
    let db = Database::open_memory().unwrap();
    let config = Config::default();

    with_tracker(&db, &config, day(6), |t| {
        t.custom_points_at(50, day(6)).unwrap();
    });
    let summary = with_tracker(&db, &config, day(6), |t| {
        let reset = t.reset_all_at(day(6));
        assert_eq!(reset.previous_total, 50);
        t.summary_at(config.progress.total_goal, day(6))
    });

    assert_eq!(summary.total_points, 0);
    assert_eq!(summary.today_points, 0);
    assert!(summary.badges_unlocked >= 3);
}
