//! # Reward Points Core Library
//!
//! Core logic for a family reward-points tracker: children earn points for
//! completing activities, capped by a daily limit, and unlock badges as
//! milestones are reached. All operations are available through the
//! standalone CLI binary, which is a thin layer over this library.
//!
//! ## Architecture
//!
//! - **Tracker**: a synchronous state engine. Every operation mutates a
//!   [`RewardState`] and returns a structured outcome plus [`Event`]s
//! - **Rules**: the activity catalog and badge table the tracker evaluates
//!   state against
//! - **Storage**: the whole state persisted as one JSON value in SQLite, and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`RewardTracker`]: awards, undo, rollover, reset, settings
//! - [`StateStore`]: load-or-default, overwrite-on-save persistence
//! - [`Config`]: application configuration management

pub mod badges;
pub mod calendar;
pub mod catalog;
pub mod error;
pub mod events;
pub mod storage;
pub mod tracker;

pub use badges::{BadgeDef, BadgeTable, BadgeUnlock, Requirement};
pub use catalog::{ActivityCatalog, ActivityDef};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use storage::{Config, Database, StateStore};
pub use tracker::{
    AwardOutcome, BadgeStatus, ChartPoint, LedgerEntry, Progress, RejectReason, RewardRules,
    RewardState, RewardTracker, Settings, Summary,
};
