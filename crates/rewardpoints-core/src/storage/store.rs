//! Whole-state persistence for the tracker.

use tracing::warn;

use super::Database;
use crate::error::Result;
use crate::tracker::RewardState;

/// Key under which the serialized state lives.
pub const STATE_KEY: &str = "rewardPointsData";

/// Load-or-default, overwrite-on-save persistence of [`RewardState`].
pub struct StateStore<'a> {
    db: &'a Database,
}

impl<'a> StateStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Load the stored state, or the default if absent or unreadable.
    ///
    /// # Errors
    /// Returns an error only if the database query itself fails.
    pub fn load(&self) -> Result<RewardState> {
        self.load_or_else(RewardState::default)
    }

    /// Like [`StateStore::load`] with a caller-supplied fresh state.
    pub fn load_or_else(&self, fresh: impl FnOnce() -> RewardState) -> Result<RewardState> {
        let Some(json) = self.db.kv_get(STATE_KEY)? else {
            return Ok(fresh());
        };
        match serde_json::from_str::<RewardState>(&json) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!(error = %e, "stored reward state is unreadable, starting fresh");
                Ok(fresh())
            }
        }
    }

    /// Overwrite the stored state.
    pub fn save(&self, state: &RewardState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.db.kv_set(STATE_KEY, &json)?;
        Ok(())
    }

    /// Remove the stored state entirely.
    pub fn clear(&self) -> Result<bool> {
        Ok(self.db.kv_delete(STATE_KEY)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{RewardTracker, Settings};

    #[test]
    fn missing_state_loads_fresh() {
        let db = Database::open_memory().unwrap();
        let store = StateStore::new(&db);
        assert_eq!(store.load().unwrap(), RewardState::default());
    }

    #[test]
    fn malformed_state_falls_back_to_fresh() {
        let db = Database::open_memory().unwrap();
        db.kv_set(STATE_KEY, "{not json").unwrap();
        let store = StateStore::new(&db);
        let settings = Settings {
            display_name: "Ava".into(),
            ..Settings::default()
        };
        let state = store
            .load_or_else(|| RewardState::with_settings(settings.clone()))
            .unwrap();
        assert_eq!(state.settings(), &settings);
    }

    #[test]
    fn save_then_load_restores_state() {
        let db = Database::open_memory().unwrap();
        let store = StateStore::new(&db);
        let mut tracker = RewardTracker::default();
        tracker.custom_points(12).unwrap();
        store.save(tracker.state()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(&loaded, tracker.state());
        assert!(store.clear().unwrap());
        assert_eq!(store.load().unwrap(), RewardState::default());
    }
}
