//! Read-only views. These still save, so a day rollover performed on load
//! is persisted.

use rewardpoints_core::storage::MAX_CHART_WINDOW;
use serde_json::json;

use super::{print_json, CmdResult, Session};

pub fn status() -> CmdResult {
    let session = Session::open()?;
    session.save()?;
    let summary = session
        .tracker
        .summary_at(session.config.progress.total_goal, session.now);
    print_json(&summary)
}

pub fn history(limit: usize) -> CmdResult {
    let session = Session::open()?;
    session.save()?;
    print_json(session.tracker.recent_entries(limit))
}

pub fn chart(days: Option<u32>) -> CmdResult {
    let session = Session::open()?;
    session.save()?;
    let days = days.unwrap_or(session.config.chart.window_days);
    if !(1..=MAX_CHART_WINDOW).contains(&days) {
        return Err(format!("--days must be between 1 and {MAX_CHART_WINDOW}").into());
    }
    print_json(&session.tracker.chart_series_at(days, session.now))
}

pub fn badges() -> CmdResult {
    let session = Session::open()?;
    session.save()?;
    print_json(&session.tracker.badge_statuses_at(session.now))
}

pub fn activities() -> CmdResult {
    let session = Session::open()?;
    session.save()?;
    let today = rewardpoints_core::calendar::day_of(session.now);
    let state = session.tracker.state();
    let rules = session.tracker.rules();
    let rows: Vec<_> = rules
        .catalog()
        .iter()
        .map(|a| {
            json!({
                "id": a.id,
                "label": a.label,
                "points": a.points,
                "repeatable": rules.is_repeatable(&a.id),
                "completedToday": state.is_completed(today, &a.id),
                "count": state.activity_count(&a.id),
            })
        })
        .collect();
    print_json(&json!({
        "activities": rows,
        "quickAdd": rules.quick_add_values(),
    }))
}
