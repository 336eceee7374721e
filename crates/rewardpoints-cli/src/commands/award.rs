use rewardpoints_core::AwardOutcome;
use serde_json::json;
use tracing::debug;

use super::{print_json, print_outcome, CmdResult, Session};

fn report(session: &Session, outcome: &AwardOutcome) -> CmdResult {
    session.save()?;
    let events = outcome.events();
    for event in &events {
        debug!(kind = event.kind(), "event");
    }
    print_json(&json!({
        "outcome": outcome,
        "message": outcome.rejected.map(|r| r.message()),
        "events": events,
    }))
}

pub fn award(activity: &str) -> CmdResult {
    let mut session = Session::open()?;
    let now = session.now;
    let outcome = session.tracker.award_activity_at(activity, now)?;
    report(&session, &outcome)
}

pub fn quick(points: u32) -> CmdResult {
    let mut session = Session::open()?;
    let now = session.now;
    let outcome = session.tracker.quick_add_at(points, now)?;
    report(&session, &outcome)
}

pub fn custom(points: u32) -> CmdResult {
    let mut session = Session::open()?;
    let now = session.now;
    let outcome = session.tracker.custom_points_at(points, now)?;
    report(&session, &outcome)
}

/// An out-of-range index is a no-op and prints a null outcome.
pub fn undo(index: usize) -> CmdResult {
    let mut session = Session::open()?;
    let now = session.now;
    let outcome = session.tracker.undo_at(index, now);
    session.save()?;
    let events = outcome.as_ref().map(|o| o.events()).unwrap_or_default();
    print_outcome(&outcome, &events)
}
