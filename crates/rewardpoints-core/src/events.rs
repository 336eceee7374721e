use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::tracker::RejectReason;

/// Every state change in the tracker can be described as an Event.
/// The presentation layer turns these into toasts, animations and badges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    PointsAwarded {
        entry_id: String,
        activity_id: String,
        activity_label: String,
        points: u32,
        today_points: u32,
        total_points: u64,
        at: DateTime<Utc>,
    },
    /// The award went through but was capped by the daily limit.
    AwardAdjusted {
        activity_id: String,
        requested: u32,
        awarded: u32,
        at: DateTime<Utc>,
    },
    AwardRejected {
        activity_id: String,
        reason: RejectReason,
        at: DateTime<Utc>,
    },
    BadgeUnlocked {
        badge_id: String,
        name: String,
        icon: String,
        at: DateTime<Utc>,
    },
    EntryUndone {
        entry_id: String,
        activity_id: String,
        points: u32,
        day: NaiveDate,
        total_points: u64,
        at: DateTime<Utc>,
    },
    DayRolledOver {
        previous: Option<NaiveDate>,
        today: NaiveDate,
        at: DateTime<Utc>,
    },
    PointsReset {
        previous_total: u64,
        cleared_entries: usize,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        display_name: String,
        starting_points: u32,
        daily_limit: u32,
        bootstrapped: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::PointsAwarded { .. } => "points_awarded",
            Event::AwardAdjusted { .. } => "award_adjusted",
            Event::AwardRejected { .. } => "award_rejected",
            Event::BadgeUnlocked { .. } => "badge_unlocked",
            Event::EntryUndone { .. } => "entry_undone",
            Event::DayRolledOver { .. } => "day_rolled_over",
            Event::PointsReset { .. } => "points_reset",
            Event::SettingsApplied { .. } => "settings_applied",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::AwardRejected {
            activity_id: "homework".into(),
            reason: RejectReason::AlreadyCompletedToday,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "AwardRejected");
        assert_eq!(json["reason"], "ALREADY_COMPLETED_TODAY");
        assert_eq!(event.kind(), "award_rejected");
    }
}
