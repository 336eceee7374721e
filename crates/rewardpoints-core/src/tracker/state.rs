//! Persisted tracker state.
//!
//! `RewardState` is the whole blob written to storage after every mutation.
//! Field names follow the legacy `rewardPointsData` layout where they
//! overlap (`totalPoints`, `dailyPoints`, `activities`, `lastReset`), and
//! every field defaults so partially-populated blobs still load.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::badges::{BadgeUnlock, Requirement};
use crate::calendar;

/// Most recent ledger entries kept; older ones are dropped.
pub const LEDGER_CAPACITY: usize = 50;
/// Daily point cap used when nothing else is configured.
pub const DEFAULT_DAILY_LIMIT: u32 = 50;

fn default_daily_limit() -> u32 {
    DEFAULT_DAILY_LIMIT
}

fn new_entry_id() -> String {
    format!("entry-{}", uuid::Uuid::new_v4())
}

/// User-editable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub display_name: String,
    /// Applied once, when settings are saved while the total is zero.
    #[serde(default)]
    pub starting_points: u32,
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            starting_points: 0,
            daily_limit: DEFAULT_DAILY_LIMIT,
        }
    }
}

/// One recorded award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    #[serde(default = "new_entry_id")]
    pub id: String,
    /// Empty for entries written before ids were recorded.
    #[serde(default)]
    pub activity_id: String,
    #[serde(rename = "activity")]
    pub activity_label: String,
    #[serde(rename = "points")]
    pub points_awarded: u32,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "date")]
    pub calendar_day: NaiveDate,
}

impl LedgerEntry {
    pub(crate) fn new(
        activity_id: &str,
        activity_label: &str,
        points_awarded: u32,
        timestamp: DateTime<Utc>,
        calendar_day: NaiveDate,
    ) -> Self {
        Self {
            id: new_entry_id(),
            activity_id: activity_id.to_string(),
            activity_label: activity_label.to_string(),
            points_awarded,
            timestamp,
            calendar_day,
        }
    }

    /// Key used for counters and completion marks.
    pub fn activity_key(&self) -> &str {
        if self.activity_id.is_empty() {
            &self.activity_label
        } else {
            &self.activity_id
        }
    }
}

/// Accepts either `YYYY-MM-DD` or a full RFC 3339 timestamp, which is
/// converted to the host's local day.
fn deserialize_reset_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|s| parse_reset_day(&s).map_err(serde::de::Error::custom))
        .transpose()
}

fn parse_reset_day(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    if s.len() > 10 {
        let stamp = DateTime::parse_from_rfc3339(s)?;
        return Ok(calendar::day_of(stamp.with_timezone(&Local)));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
}

/// Everything the tracker persists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewardState {
    pub(crate) total_points: u64,
    pub(crate) daily_points: BTreeMap<NaiveDate, u32>,
    /// Newest first.
    #[serde(rename = "activities")]
    pub(crate) ledger: Vec<LedgerEntry>,
    #[serde(deserialize_with = "deserialize_reset_day")]
    pub(crate) last_reset: Option<NaiveDate>,
    pub(crate) daily_activities: BTreeMap<NaiveDate, BTreeMap<String, bool>>,
    pub(crate) activity_counts: BTreeMap<String, u32>,
    pub(crate) badges: BTreeMap<String, BadgeUnlock>,
    pub(crate) settings: Settings,
}

impl RewardState {
    /// Fresh state with the given settings. Starting points are not applied.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    pub fn last_reset(&self) -> Option<NaiveDate> {
        self.last_reset
    }

    pub fn daily_points(&self) -> &BTreeMap<NaiveDate, u32> {
        &self.daily_points
    }

    pub fn badge_unlocks(&self) -> &BTreeMap<String, BadgeUnlock> {
        &self.badges
    }

    pub fn badge_unlock(&self, badge_id: &str) -> Option<&BadgeUnlock> {
        self.badges.get(badge_id)
    }

    /// Points recorded on `day`, 0 if absent.
    pub fn points_on(&self, day: NaiveDate) -> u32 {
        self.daily_points.get(&day).copied().unwrap_or(0)
    }

    pub fn is_completed(&self, day: NaiveDate, activity_id: &str) -> bool {
        self.daily_activities
            .get(&day)
            .and_then(|marks| marks.get(activity_id))
            .copied()
            .unwrap_or(false)
    }

    pub fn activity_count(&self, activity_id: &str) -> u32 {
        self.activity_counts.get(activity_id).copied().unwrap_or(0)
    }

    /// Consecutive days ending at `today` with nonzero points.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        let mut streak = 0;
        let mut day = today;
        while self.points_on(day) > 0 {
            streak += 1;
            match day.pred_opt() {
                Some(prev) => day = prev,
                None => break,
            }
        }
        streak
    }

    /// Current value of the quantity a requirement measures.
    pub fn measure(&self, requirement: &Requirement, today: NaiveDate) -> u64 {
        match requirement {
            Requirement::TotalPoints { .. } => self.total_points,
            Requirement::ActivityCount { activity, .. } => u64::from(self.activity_count(activity)),
            Requirement::DailyPoints { .. } => u64::from(self.points_on(today)),
            Requirement::Streak { .. } => u64::from(self.current_streak(today)),
        }
    }

    pub fn is_satisfied(&self, requirement: &Requirement, today: NaiveDate) -> bool {
        self.measure(requirement, today) >= requirement.target()
    }

    /// Sum of `points_awarded` over the entries still in the ledger.
    pub fn ledger_sum(&self) -> u64 {
        self.ledger.iter().map(|e| u64::from(e.points_awarded)).sum()
    }

    /// Per-day points for the `window_days` days ending at `today`, oldest first.
    pub fn chart_series(&self, today: NaiveDate, window_days: u32) -> Vec<ChartPoint> {
        (0..window_days)
            .rev()
            .map(|offset| {
                let day = calendar::days_before(today, offset);
                ChartPoint {
                    label: calendar::display_label(day, today),
                    day,
                    value: self.points_on(day),
                }
            })
            .collect()
    }
}

/// One bucket of the trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub day: NaiveDate,
    pub value: u32,
}
