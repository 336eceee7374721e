//! Subcommand handlers.
//!
//! Every handler opens a [`Session`], runs one tracker operation, saves, and
//! prints JSON to stdout.

pub mod award;
pub mod config;
pub mod report;
pub mod reset;
pub mod settings;

use std::error::Error;

use chrono::{DateTime, Local};
use rewardpoints_core::{Config, Database, Event, RewardState, RewardTracker, StateStore};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

pub type CmdResult = Result<(), Box<dyn Error>>;

/// Loaded state for one invocation.
pub struct Session {
    db: Database,
    pub config: Config,
    pub tracker: RewardTracker,
    /// Clock reading shared by every operation in this invocation.
    pub now: DateTime<Local>,
}

impl Session {
    /// Open the database, load config and state, and roll the day over.
    pub fn open() -> Result<Self, Box<dyn Error>> {
        let db = Database::open()?;
        let config = Config::load()?;
        let state = StateStore::new(&db)
            .load_or_else(|| RewardState::with_settings(config.initial_settings()))?;
        let mut tracker = RewardTracker::new(state, config.rules()?);

        let now = Local::now();
        if let Some(rollover) = tracker.rollover_if_new_day_at(now) {
            debug!(previous = ?rollover.previous, today = %rollover.today, "rolled over on load");
        }

        Ok(Self {
            db,
            config,
            tracker,
            now,
        })
    }

    pub fn save(&self) -> CmdResult {
        StateStore::new(&self.db).save(self.tracker.state())?;
        Ok(())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an operation outcome together with the events it produced.
pub fn print_outcome<T: Serialize>(outcome: &T, events: &[Event]) -> CmdResult {
    for event in events {
        debug!(kind = event.kind(), "event");
    }
    print_json(&json!({
        "outcome": outcome,
        "events": events,
    }))
}
