//! Activity catalog and the once-per-day exemption set.
//!
//! The catalog is configuration: each activity has a fixed point value and
//! a flag saying whether it may be earned more than once per calendar day.
//! Quick-add and custom awards are always repeatable.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Activity id used for quick-add button awards.
pub const QUICK_ADD_ID: &str = "quick-add";
/// Label recorded in the ledger for quick-add awards.
pub const QUICK_ADD_LABEL: &str = "Quick Add";
/// Activity id used for free-form custom awards.
pub const CUSTOM_ID: &str = "custom";
/// Label recorded in the ledger for custom awards.
pub const CUSTOM_LABEL: &str = "Custom Points";

/// Smallest number of points a single award may request.
pub const MIN_POINTS: u32 = 1;
/// Largest number of points a single award may request.
pub const MAX_POINTS: u32 = 100;

/// Check that a requested award lies in `MIN_POINTS..=MAX_POINTS`.
pub fn check_points(points: u32) -> Result<(), ValidationError> {
    if (MIN_POINTS..=MAX_POINTS).contains(&points) {
        Ok(())
    } else {
        Err(ValidationError::PointsOutOfRange {
            points,
            min: MIN_POINTS,
            max: MAX_POINTS,
        })
    }
}

/// A single catalog activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDef {
    pub id: String,
    pub label: String,
    pub points: u32,
    /// May be earned more than once per day.
    #[serde(default)]
    pub repeatable: bool,
}

impl ActivityDef {
    pub fn new(id: &str, label: &str, points: u32) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            points,
            repeatable: false,
        }
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }
}

/// Validated, ordered activity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActivityCatalog {
    activities: Vec<ActivityDef>,
}

impl ActivityCatalog {
    /// Build a catalog, rejecting duplicate or reserved ids and out-of-range points.
    pub fn new(activities: Vec<ActivityDef>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for activity in &activities {
            if activity.id.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: "activities.id".into(),
                    message: "activity id must not be empty".into(),
                });
            }
            if activity.id == QUICK_ADD_ID || activity.id == CUSTOM_ID {
                return Err(ValidationError::InvalidValue {
                    field: "activities.id".into(),
                    message: format!("'{}' is reserved", activity.id),
                });
            }
            if !seen.insert(activity.id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    kind: "activity",
                    id: activity.id.clone(),
                });
            }
            check_points(activity.points)?;
        }
        Ok(Self { activities })
    }

    pub fn get(&self, id: &str) -> Option<&ActivityDef> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityDef> {
        self.activities.iter()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Quick-add, custom, and every activity flagged repeatable.
    pub fn repeatable_set(&self) -> RepeatableSet {
        RepeatableSet::new(
            self.activities
                .iter()
                .filter(|a| a.repeatable)
                .map(|a| a.id.clone()),
        )
    }
}

impl Default for ActivityCatalog {
    fn default() -> Self {
        Self {
            activities: default_activities(),
        }
    }
}

impl<'de> Deserialize<'de> for ActivityCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let activities = Vec::<ActivityDef>::deserialize(deserializer)?;
        ActivityCatalog::new(activities).map_err(serde::de::Error::custom)
    }
}

/// Built-in chore table.
pub fn default_activities() -> Vec<ActivityDef> {
    vec![
        ActivityDef::new("make-bed", "Make Bed", 5),
        ActivityDef::new("brush-teeth", "Brush Teeth", 3),
        ActivityDef::new("homework", "Homework", 10),
        ActivityDef::new("reading", "Read a Book", 10),
        ActivityDef::new("tidy-room", "Tidy Room", 8),
        ActivityDef::new("dishes", "Help with Dishes", 5),
        ActivityDef::new("exercise", "Exercise", 10),
        ActivityDef::new("kind-act", "Act of Kindness", 5).repeatable(),
    ]
}

/// Activity ids exempt from the once-per-day rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatableSet {
    ids: HashSet<String>,
}

impl RepeatableSet {
    /// Always includes [`QUICK_ADD_ID`] and [`CUSTOM_ID`].
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        let mut set: HashSet<String> = ids.into_iter().collect();
        set.insert(QUICK_ADD_ID.to_string());
        set.insert(CUSTOM_ID.to_string());
        Self { ids: set }
    }

    pub fn contains(&self, activity_id: &str) -> bool {
        self.ids.contains(activity_id)
    }
}

impl Default for RepeatableSet {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}
