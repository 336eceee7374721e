//! Structured results returned by tracker operations.
//!
//! None of these are errors. A rejected award is a normal, user-visible
//! outcome; the presentation layer decides how to show it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::state::{LedgerEntry, Settings};
use crate::badges::{BadgeDef, Requirement};
use crate::events::Event;

/// Why an award was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    AlreadyCompletedToday,
    DailyLimitReached,
}

impl RejectReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::AlreadyCompletedToday => "Activity already completed today",
            RejectReason::DailyLimitReached => "Daily point limit reached",
        }
    }
}

/// A badge that unlocked during an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedBadge {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub unlocked_at: DateTime<Utc>,
}

impl UnlockedBadge {
    pub(crate) fn from_def(badge: &BadgeDef, unlocked_at: DateTime<Utc>) -> Self {
        Self {
            id: badge.id.clone(),
            name: badge.name.clone(),
            icon: badge.icon.clone(),
            unlocked_at,
        }
    }

    fn event(&self) -> Event {
        Event::BadgeUnlocked {
            badge_id: self.id.clone(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            at: self.unlocked_at,
        }
    }
}

fn badge_events(badges: &[UnlockedBadge]) -> impl Iterator<Item = Event> + '_ {
    badges.iter().map(UnlockedBadge::event)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardOutcome {
    pub activity_id: String,
    pub requested: u32,
    /// 0 when rejected.
    pub awarded: u32,
    pub rejected: Option<RejectReason>,
    pub entry: Option<LedgerEntry>,
    pub today_points: u32,
    pub total_points: u64,
    pub newly_unlocked: Vec<UnlockedBadge>,
    pub at: DateTime<Utc>,
}

impl AwardOutcome {
    pub fn is_awarded(&self) -> bool {
        self.rejected.is_none() && self.awarded > 0
    }

    /// Awarded, but less than requested because of the daily limit.
    pub fn was_adjusted(&self) -> bool {
        self.is_awarded() && self.awarded < self.requested
    }

    pub fn events(&self) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(reason) = self.rejected {
            events.push(Event::AwardRejected {
                activity_id: self.activity_id.clone(),
                reason,
                at: self.at,
            });
            return events;
        }
        if let Some(entry) = &self.entry {
            events.push(Event::PointsAwarded {
                entry_id: entry.id.clone(),
                activity_id: self.activity_id.clone(),
                activity_label: entry.activity_label.clone(),
                points: self.awarded,
                today_points: self.today_points,
                total_points: self.total_points,
                at: self.at,
            });
        }
        if self.was_adjusted() {
            events.push(Event::AwardAdjusted {
                activity_id: self.activity_id.clone(),
                requested: self.requested,
                awarded: self.awarded,
                at: self.at,
            });
        }
        events.extend(badge_events(&self.newly_unlocked));
        events
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoOutcome {
    pub entry: LedgerEntry,
    pub total_points: u64,
    pub newly_unlocked: Vec<UnlockedBadge>,
    pub at: DateTime<Utc>,
}

impl UndoOutcome {
    pub fn events(&self) -> Vec<Event> {
        let mut events = vec![Event::EntryUndone {
            entry_id: self.entry.id.clone(),
            activity_id: self.entry.activity_key().to_string(),
            points: self.entry.points_awarded,
            day: self.entry.calendar_day,
            total_points: self.total_points,
            at: self.at,
        }];
        events.extend(badge_events(&self.newly_unlocked));
        events
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverOutcome {
    pub previous: Option<NaiveDate>,
    pub today: NaiveDate,
    pub at: DateTime<Utc>,
}

impl RolloverOutcome {
    pub fn events(&self) -> Vec<Event> {
        vec![Event::DayRolledOver {
            previous: self.previous,
            today: self.today,
            at: self.at,
        }]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetOutcome {
    pub previous_total: u64,
    pub cleared_entries: usize,
    pub newly_unlocked: Vec<UnlockedBadge>,
    pub at: DateTime<Utc>,
}

impl ResetOutcome {
    pub fn events(&self) -> Vec<Event> {
        let mut events = vec![Event::PointsReset {
            previous_total: self.previous_total,
            cleared_entries: self.cleared_entries,
            at: self.at,
        }];
        events.extend(badge_events(&self.newly_unlocked));
        events
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsOutcome {
    pub settings: Settings,
    /// Starting points were applied because the total was zero.
    pub bootstrapped: bool,
    pub total_points: u64,
    pub newly_unlocked: Vec<UnlockedBadge>,
    pub at: DateTime<Utc>,
}

impl SettingsOutcome {
    pub fn events(&self) -> Vec<Event> {
        let mut events = vec![Event::SettingsApplied {
            display_name: self.settings.display_name.clone(),
            starting_points: self.settings.starting_points,
            daily_limit: self.settings.daily_limit,
            bootstrapped: self.bootstrapped,
            at: self.at,
        }];
        events.extend(badge_events(&self.newly_unlocked));
        events
    }
}

/// Progress bars: percent of the total goal and of today's limit, capped at 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub total_pct: f64,
    pub today_pct: f64,
}

impl Progress {
    pub(crate) fn compute(total: u64, total_goal: u64, today: u32, daily_limit: u32) -> Self {
        Self {
            total_pct: percent(total as f64, total_goal as f64),
            today_pct: percent(f64::from(today), f64::from(daily_limit)),
        }
    }
}

fn percent(value: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return if value > 0.0 { 100.0 } else { 0.0 };
    }
    (value / goal * 100.0).min(100.0)
}

/// A badge with its unlock record and progress toward it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeStatus {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub requirement: Requirement,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub current: u64,
    pub target: u64,
}

impl BadgeStatus {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// Everything the status screen shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub display_name: String,
    pub today: NaiveDate,
    pub total_points: u64,
    pub today_points: u32,
    pub daily_limit: u32,
    pub remaining_today: u32,
    pub streak: u32,
    pub progress: Progress,
    pub badges_unlocked: usize,
    pub badges_total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_caps_at_one_hundred() {
        let progress = Progress::compute(250, 100, 20, 50);
        assert_eq!(progress.total_pct, 100.0);
        assert_eq!(progress.today_pct, 40.0);
    }

    #[test]
    fn progress_with_zero_goal() {
        let progress = Progress::compute(0, 0, 0, 0);
        assert_eq!(progress.total_pct, 0.0);
        assert_eq!(progress.today_pct, 0.0);
    }

    #[test]
    fn reject_reason_wire_names() {
        assert_eq!(
            serde_json::to_string(&RejectReason::DailyLimitReached).unwrap(),
            "\"DAILY_LIMIT_REACHED\""
        );
    }
}
