//! Points, activity and badge state engine.
//!
//! [`RewardTracker`] owns a [`RewardState`] together with the static rule
//! tables and exposes every operation. Each operation runs to completion
//! synchronously and returns a structured outcome; the caller persists the
//! state afterwards and decides how to present the result.
//!
//! Every operation has an `*_at` form that takes the clock explicitly. The
//! plain forms read `Local::now()`.
//!
//! ## Day boundaries
//!
//! ```text
//! rollover_if_new_day: lastReset != today -> clear dailyPoints + dailyActivities
//! reset_all:           clear totalPoints + dailyPoints + ledger
//! ```
//!
//! Activity counters and badge unlocks survive both.

mod outcome;
mod state;

pub use outcome::{
    AwardOutcome, BadgeStatus, Progress, RejectReason, ResetOutcome, RolloverOutcome,
    SettingsOutcome, Summary, UndoOutcome, UnlockedBadge,
};
pub use state::{
    ChartPoint, LedgerEntry, RewardState, Settings, DEFAULT_DAILY_LIMIT, LEDGER_CAPACITY,
};

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{debug, info};

use crate::badges::{BadgeDef, BadgeTable};
use crate::calendar;
use crate::catalog::{
    self, ActivityCatalog, RepeatableSet, CUSTOM_ID, CUSTOM_LABEL, QUICK_ADD_ID, QUICK_ADD_LABEL,
};
use crate::error::ValidationError;

/// Default chart window in days.
pub const DEFAULT_CHART_WINDOW: u32 = 7;
/// Default quick-add button values.
pub const DEFAULT_QUICK_ADD: [u32; 3] = [1, 5, 10];

/// Static configuration the tracker evaluates state against.
#[derive(Debug, Clone)]
pub struct RewardRules {
    catalog: ActivityCatalog,
    repeatable: RepeatableSet,
    badges: BadgeTable,
    quick_add: Vec<u32>,
}

impl RewardRules {
    /// Quick-add values must each be a valid award amount.
    pub fn new(
        catalog: ActivityCatalog,
        badges: BadgeTable,
        quick_add: Vec<u32>,
    ) -> Result<Self, ValidationError> {
        for points in &quick_add {
            catalog::check_points(*points)?;
        }
        let repeatable = catalog.repeatable_set();
        Ok(Self {
            catalog,
            repeatable,
            badges,
            quick_add,
        })
    }

    pub fn catalog(&self) -> &ActivityCatalog {
        &self.catalog
    }

    pub fn badges(&self) -> &BadgeTable {
        &self.badges
    }

    pub fn quick_add_values(&self) -> &[u32] {
        &self.quick_add
    }

    pub fn is_repeatable(&self, activity_id: &str) -> bool {
        self.repeatable.contains(activity_id)
    }
}

impl Default for RewardRules {
    fn default() -> Self {
        let catalog = ActivityCatalog::default();
        Self {
            repeatable: catalog.repeatable_set(),
            catalog,
            badges: BadgeTable::default(),
            quick_add: DEFAULT_QUICK_ADD.to_vec(),
        }
    }
}

/// Owner of the reward state and the operations over it.
#[derive(Debug, Clone)]
pub struct RewardTracker {
    state: RewardState,
    rules: RewardRules,
}

impl RewardTracker {
    pub fn new(state: RewardState, rules: RewardRules) -> Self {
        Self { state, rules }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &RewardState {
        &self.state
    }

    pub fn rules(&self) -> &RewardRules {
        &self.rules
    }

    pub fn total_points(&self) -> u64 {
        self.state.total_points
    }

    pub fn today_points_at(&self, now: DateTime<Local>) -> u32 {
        self.state.points_on(calendar::day_of(now))
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak_at(Local::now())
    }

    pub fn current_streak_at(&self, now: DateTime<Local>) -> u32 {
        self.state.current_streak(calendar::day_of(now))
    }

    /// Whether `badge`'s requirement holds right now. Ignores the unlock record.
    pub fn is_badge_unlocked(&self, badge: &BadgeDef) -> bool {
        self.is_badge_unlocked_at(badge, Local::now())
    }

    pub fn is_badge_unlocked_at(&self, badge: &BadgeDef, now: DateTime<Local>) -> bool {
        self.state.is_satisfied(&badge.requirement, calendar::day_of(now))
    }

    pub fn chart_series(&self, window_days: u32) -> Vec<ChartPoint> {
        self.chart_series_at(window_days, Local::now())
    }

    pub fn chart_series_at(&self, window_days: u32, now: DateTime<Local>) -> Vec<ChartPoint> {
        self.state.chart_series(calendar::day_of(now), window_days)
    }

    /// Newest `limit` ledger entries.
    pub fn recent_entries(&self, limit: usize) -> &[LedgerEntry] {
        let end = limit.min(self.state.ledger.len());
        &self.state.ledger[..end]
    }

    pub fn progress_at(&self, total_goal: u64, now: DateTime<Local>) -> Progress {
        Progress::compute(
            self.state.total_points,
            total_goal,
            self.today_points_at(now),
            self.state.settings.daily_limit,
        )
    }

    pub fn badge_statuses_at(&self, now: DateTime<Local>) -> Vec<BadgeStatus> {
        let today = calendar::day_of(now);
        self.rules
            .badges
            .iter()
            .map(|badge| BadgeStatus {
                id: badge.id.clone(),
                name: badge.name.clone(),
                description: badge.description.clone(),
                icon: badge.icon.clone(),
                requirement: badge.requirement.clone(),
                unlocked_at: self.state.badge_unlock(&badge.id).map(|u| u.unlocked_at),
                current: self.state.measure(&badge.requirement, today),
                target: badge.requirement.target(),
            })
            .collect()
    }

    pub fn summary_at(&self, total_goal: u64, now: DateTime<Local>) -> Summary {
        let today = calendar::day_of(now);
        let today_points = self.state.points_on(today);
        let daily_limit = self.state.settings.daily_limit;
        let badges_unlocked = self
            .rules
            .badges
            .iter()
            .filter(|b| self.state.badges.contains_key(&b.id))
            .count();
        Summary {
            display_name: self.state.settings.display_name.clone(),
            today,
            total_points: self.state.total_points,
            today_points,
            daily_limit,
            remaining_today: daily_limit.saturating_sub(today_points),
            streak: self.state.current_streak(today),
            progress: self.progress_at(total_goal, now),
            badges_unlocked,
            badges_total: self.rules.badges.len(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn award_points(
        &mut self,
        activity_id: &str,
        activity_label: &str,
        requested: u32,
    ) -> Result<AwardOutcome, ValidationError> {
        self.award_points_at(activity_id, activity_label, requested, Local::now())
    }

    /// Award up to `requested` points for an activity.
    ///
    /// Repeating a non-repeatable activity on the same day or having no
    /// room left under the daily limit yields a rejected outcome with the
    /// state untouched. Otherwise the award is capped at the remaining room.
    ///
    /// # Errors
    /// Returns an error if `activity_id` is blank or `requested` is outside
    /// `1..=100`.
    pub fn award_points_at(
        &mut self,
        activity_id: &str,
        activity_label: &str,
        requested: u32,
        now: DateTime<Local>,
    ) -> Result<AwardOutcome, ValidationError> {
        if activity_id.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "activity_id".into(),
                message: "activity id must not be empty".into(),
            });
        }
        catalog::check_points(requested)?;

        let today = calendar::day_of(now);
        let at = now.with_timezone(&Utc);
        let exempt = self.rules.is_repeatable(activity_id);

        if !exempt && self.state.is_completed(today, activity_id) {
            debug!(activity_id, "award rejected: already completed today");
            return Ok(self.rejected(
                activity_id,
                requested,
                RejectReason::AlreadyCompletedToday,
                today,
                at,
            ));
        }

        let remaining = self
            .state
            .settings
            .daily_limit
            .saturating_sub(self.state.points_on(today));
        if remaining == 0 {
            debug!(activity_id, "award rejected: daily limit reached");
            return Ok(self.rejected(
                activity_id,
                requested,
                RejectReason::DailyLimitReached,
                today,
                at,
            ));
        }

        let awarded = requested.min(remaining);

        self.state.total_points += u64::from(awarded);
        *self.state.daily_points.entry(today).or_insert(0) += awarded;
        if !exempt {
            self.state
                .daily_activities
                .entry(today)
                .or_default()
                .insert(activity_id.to_string(), true);
        }
        *self
            .state
            .activity_counts
            .entry(activity_id.to_string())
            .or_insert(0) += 1;

        let entry = LedgerEntry::new(activity_id, activity_label, awarded, at, today);
        self.state.ledger.insert(0, entry.clone());
        self.state.ledger.truncate(LEDGER_CAPACITY);

        info!(
            activity_id,
            requested,
            awarded,
            total = self.state.total_points,
            "points awarded"
        );

        let newly_unlocked = self.evaluate_badges_at(now);
        Ok(AwardOutcome {
            activity_id: activity_id.to_string(),
            requested,
            awarded,
            rejected: None,
            entry: Some(entry),
            today_points: self.state.points_on(today),
            total_points: self.state.total_points,
            newly_unlocked,
            at,
        })
    }

    pub fn award_activity(&mut self, activity_id: &str) -> Result<AwardOutcome, ValidationError> {
        self.award_activity_at(activity_id, Local::now())
    }

    /// Award a catalog activity at its configured point value.
    ///
    /// # Errors
    /// Returns an error if `activity_id` is not in the catalog.
    pub fn award_activity_at(
        &mut self,
        activity_id: &str,
        now: DateTime<Local>,
    ) -> Result<AwardOutcome, ValidationError> {
        let activity = self
            .rules
            .catalog
            .get(activity_id)
            .cloned()
            .ok_or_else(|| ValidationError::UnknownActivity(activity_id.to_string()))?;
        self.award_points_at(&activity.id, &activity.label, activity.points, now)
    }

    pub fn quick_add(&mut self, points: u32) -> Result<AwardOutcome, ValidationError> {
        self.quick_add_at(points, Local::now())
    }

    /// Award one of the configured quick-add values.
    ///
    /// # Errors
    /// Returns an error if `points` is not a configured quick-add value.
    pub fn quick_add_at(
        &mut self,
        points: u32,
        now: DateTime<Local>,
    ) -> Result<AwardOutcome, ValidationError> {
        if !self.rules.quick_add.contains(&points) {
            return Err(ValidationError::QuickAddValueNotAllowed {
                points,
                allowed: self.rules.quick_add.clone(),
            });
        }
        self.award_points_at(QUICK_ADD_ID, QUICK_ADD_LABEL, points, now)
    }

    pub fn custom_points(&mut self, points: u32) -> Result<AwardOutcome, ValidationError> {
        self.custom_points_at(points, Local::now())
    }

    /// Award a free-form amount between 1 and 100.
    pub fn custom_points_at(
        &mut self,
        points: u32,
        now: DateTime<Local>,
    ) -> Result<AwardOutcome, ValidationError> {
        self.award_points_at(CUSTOM_ID, CUSTOM_LABEL, points, now)
    }

    pub fn undo(&mut self, index: usize) -> Option<UndoOutcome> {
        self.undo_at(index, Local::now())
    }

    /// Reverse the ledger entry at `index` (0 is the newest).
    ///
    /// Out-of-range indexes are a no-op. Badge unlocks are never reversed.
    pub fn undo_at(&mut self, index: usize, now: DateTime<Local>) -> Option<UndoOutcome> {
        if index >= self.state.ledger.len() {
            debug!(index, len = self.state.ledger.len(), "undo ignored: index out of range");
            return None;
        }

        let entry = self.state.ledger.remove(index);
        let points = entry.points_awarded;
        let day = entry.calendar_day;
        let key = entry.activity_key().to_string();

        self.state.total_points = self.state.total_points.saturating_sub(u64::from(points));
        if let Some(day_points) = self.state.daily_points.get_mut(&day) {
            *day_points = day_points.saturating_sub(points);
        }
        if let Some(count) = self.state.activity_counts.get_mut(&key) {
            *count = count.saturating_sub(1);
        }
        if let Some(marks) = self.state.daily_activities.get_mut(&day) {
            marks.remove(&key);
        }

        info!(entry_id = %entry.id, activity_id = %key, points, "ledger entry undone");

        let newly_unlocked = self.evaluate_badges_at(now);
        Some(UndoOutcome {
            entry,
            total_points: self.state.total_points,
            newly_unlocked,
            at: now.with_timezone(&Utc),
        })
    }

    pub fn evaluate_badges(&mut self) -> Vec<UnlockedBadge> {
        self.evaluate_badges_at(Local::now())
    }

    /// Record every badge whose requirement now holds for the first time.
    pub fn evaluate_badges_at(&mut self, now: DateTime<Local>) -> Vec<UnlockedBadge> {
        let today = calendar::day_of(now);
        let at = now.with_timezone(&Utc);
        let mut unlocked = Vec::new();

        for badge in self.rules.badges.iter() {
            if self.state.badges.contains_key(&badge.id) {
                continue;
            }
            if self.state.is_satisfied(&badge.requirement, today) {
                self.state
                    .badges
                    .insert(badge.id.clone(), crate::badges::BadgeUnlock { unlocked_at: at });
                info!(badge_id = %badge.id, name = %badge.name, "badge unlocked");
                unlocked.push(UnlockedBadge::from_def(badge, at));
            }
        }
        unlocked
    }

    pub fn rollover_if_new_day(&mut self) -> Option<RolloverOutcome> {
        self.rollover_if_new_day_at(Local::now())
    }

    /// Clear all per-day maps when the stored day differs from today.
    ///
    /// Idempotent within a day. Total points, counters, the ledger and
    /// badge unlocks are kept.
    pub fn rollover_if_new_day_at(&mut self, now: DateTime<Local>) -> Option<RolloverOutcome> {
        let today = calendar::day_of(now);
        if self.state.last_reset == Some(today) {
            return None;
        }

        let previous = self.state.last_reset;
        self.state.daily_activities.clear();
        self.state.daily_points.clear();
        self.state.last_reset = Some(today);

        info!(?previous, %today, "day rolled over");
        Some(RolloverOutcome {
            previous,
            today,
            at: now.with_timezone(&Utc),
        })
    }

    pub fn reset_all(&mut self) -> ResetOutcome {
        self.reset_all_at(Local::now())
    }

    /// Zero the total and clear daily points and the ledger.
    ///
    /// Activity counters, completion marks and badge unlocks are left alone.
    pub fn reset_all_at(&mut self, now: DateTime<Local>) -> ResetOutcome {
        let previous_total = self.state.total_points;
        let cleared_entries = self.state.ledger.len();

        self.state.total_points = 0;
        self.state.daily_points.clear();
        self.state.ledger.clear();
        self.state.last_reset = Some(calendar::day_of(now));

        info!(previous_total, cleared_entries, "all points reset");

        let newly_unlocked = self.evaluate_badges_at(now);
        ResetOutcome {
            previous_total,
            cleared_entries,
            newly_unlocked,
            at: now.with_timezone(&Utc),
        }
    }

    pub fn apply_settings(
        &mut self,
        display_name: &str,
        starting_points: u32,
        daily_limit: u32,
    ) -> SettingsOutcome {
        self.apply_settings_at(display_name, starting_points, daily_limit, Local::now())
    }

    /// Store settings verbatim. If the total is zero, it becomes `starting_points`.
    pub fn apply_settings_at(
        &mut self,
        display_name: &str,
        starting_points: u32,
        daily_limit: u32,
        now: DateTime<Local>,
    ) -> SettingsOutcome {
        self.state.settings = Settings {
            display_name: display_name.to_string(),
            starting_points,
            daily_limit,
        };

        let bootstrapped = self.state.total_points == 0 && starting_points > 0;
        if self.state.total_points == 0 {
            self.state.total_points = u64::from(starting_points);
        }

        info!(display_name, starting_points, daily_limit, bootstrapped, "settings applied");

        let newly_unlocked = self.evaluate_badges_at(now);
        SettingsOutcome {
            settings: self.state.settings.clone(),
            bootstrapped,
            total_points: self.state.total_points,
            newly_unlocked,
            at: now.with_timezone(&Utc),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn rejected(
        &self,
        activity_id: &str,
        requested: u32,
        reason: RejectReason,
        today: NaiveDate,
        at: DateTime<Utc>,
    ) -> AwardOutcome {
        AwardOutcome {
            activity_id: activity_id.to_string(),
            requested,
            awarded: 0,
            rejected: Some(reason),
            entry: None,
            today_points: self.state.points_on(today),
            total_points: self.state.total_points,
            newly_unlocked: Vec::new(),
            at,
        }
    }
}

impl Default for RewardTracker {
    fn default() -> Self {
        Self::new(RewardState::default(), RewardRules::default())
    }
}
