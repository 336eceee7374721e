//! Badge definitions and the static badge table.
//!
//! A badge unlocks the first time its [`Requirement`] holds over the
//! tracker state. Unlocks are recorded once and never revoked.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ActivityCatalog;
use crate::error::ValidationError;

/// Condition a badge waits for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    /// Lifetime total points at or above `threshold`.
    TotalPoints { threshold: u64 },
    /// `activity` completed at least `threshold` times.
    ActivityCount { activity: String, threshold: u32 },
    /// Today's points at or above `threshold`.
    DailyPoints { threshold: u32 },
    /// Current streak of at least `days` consecutive days.
    Streak { days: u32 },
}

impl Requirement {
    /// The value the measured quantity has to reach.
    pub fn target(&self) -> u64 {
        match self {
            Requirement::TotalPoints { threshold } => *threshold,
            Requirement::ActivityCount { threshold, .. } => u64::from(*threshold),
            Requirement::DailyPoints { threshold } => u64::from(*threshold),
            Requirement::Streak { days } => u64::from(*days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub requirement: Requirement,
}

impl BadgeDef {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        icon: &str,
        requirement: Requirement,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            requirement,
        }
    }
}

/// Persisted record of a badge unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeUnlock {
    pub unlocked_at: DateTime<Utc>,
}

/// Validated badge table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeTable {
    badges: Vec<BadgeDef>,
}

impl BadgeTable {
    /// Validate ids, thresholds, and activity references against `catalog`.
    pub fn new(badges: Vec<BadgeDef>, catalog: &ActivityCatalog) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for badge in &badges {
            if !seen.insert(badge.id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    kind: "badge",
                    id: badge.id.clone(),
                });
            }
            if badge.requirement.target() == 0 {
                return Err(ValidationError::InvalidValue {
                    field: format!("badges.{}.requirement", badge.id),
                    message: "threshold must be greater than zero".into(),
                });
            }
            if let Requirement::ActivityCount { activity, .. } = &badge.requirement {
                if !catalog.contains(activity) {
                    return Err(ValidationError::UnknownBadgeActivity {
                        badge: badge.id.clone(),
                        activity: activity.clone(),
                    });
                }
            }
        }
        Ok(Self { badges })
    }

    pub fn get(&self, id: &str) -> Option<&BadgeDef> {
        self.badges.iter().find(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BadgeDef> {
        self.badges.iter()
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}

impl Default for BadgeTable {
    fn default() -> Self {
        Self {
            badges: default_badges(),
        }
    }
}

/// Built-in badges. Activity badges reference the default catalog.
pub fn default_badges() -> Vec<BadgeDef> {
    use Requirement::*;

    vec![
        BadgeDef::new(
            "first-points",
            "First Steps",
            "Earn your very first point",
            "🌟",
            TotalPoints { threshold: 1 },
        ),
        BadgeDef::new(
            "century",
            "Century Club",
            "Earn 100 points in total",
            "💯",
            TotalPoints { threshold: 100 },
        ),
        BadgeDef::new(
            "point-master",
            "Point Master",
            "Earn 500 points in total",
            "🏆",
            TotalPoints { threshold: 500 },
        ),
        BadgeDef::new(
            "bookworm",
            "Bookworm",
            "Read a book 5 times",
            "📚",
            ActivityCount {
                activity: "reading".into(),
                threshold: 5,
            },
        ),
        BadgeDef::new(
            "homework-hero",
            "Homework Hero",
            "Finish your homework 10 times",
            "✏️",
            ActivityCount {
                activity: "homework".into(),
                threshold: 10,
            },
        ),
        BadgeDef::new(
            "clean-sweep",
            "Clean Sweep",
            "Tidy your room 5 times",
            "🧹",
            ActivityCount {
                activity: "tidy-room".into(),
                threshold: 5,
            },
        ),
        BadgeDef::new(
            "big-day",
            "Big Day",
            "Earn 30 points in one day",
            "⚡",
            DailyPoints { threshold: 30 },
        ),
        BadgeDef::new(
            "max-day",
            "Maxed Out",
            "Earn 50 points in one day",
            "🚀",
            DailyPoints { threshold: 50 },
        ),
        BadgeDef::new(
            "on-fire",
            "On Fire",
            "Earn points 3 days in a row",
            "🔥",
            Streak { days: 3 },
        ),
        BadgeDef::new(
            "week-warrior",
            "Week Warrior",
            "Earn points 7 days in a row",
            "🗓️",
            Streak { days: 7 },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ActivityDef;

    #[test]
    fn default_badges_validate_against_default_catalog() {
        let table = BadgeTable::new(default_badges(), &ActivityCatalog::default()).unwrap();
        assert_eq!(table.len(), 10);
        assert!(table.get("bookworm").is_some());
    }

    #[test]
    fn rejects_activity_badge_for_unknown_activity() {
        let catalog = ActivityCatalog::new(vec![ActivityDef::new("reading", "Read", 5)]).unwrap();
        let err = BadgeTable::new(default_badges(), &catalog).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownBadgeActivity { .. }));
    }

    #[test]
    fn rejects_zero_threshold() {
        let badges = vec![BadgeDef::new("zero", "Zero", "", "", Requirement::Streak { days: 0 })];
        assert!(BadgeTable::new(badges, &ActivityCatalog::default()).is_err());
    }

    #[test]
    fn rejects_duplicate_badge_ids() {
        let badges = vec![
            BadgeDef::new("x", "X", "", "", Requirement::TotalPoints { threshold: 1 }),
            BadgeDef::new("x", "X2", "", "", Requirement::TotalPoints { threshold: 2 }),
        ];
        assert!(matches!(
            BadgeTable::new(badges, &ActivityCatalog::default()),
            Err(ValidationError::DuplicateId { kind: "badge", .. })
        ));
    }

    #[test]
    fn requirement_serializes_with_kind_tag() {
        let req = Requirement::ActivityCount {
            activity: "reading".into(),
            threshold: 5,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["kind"], "activity_count");
        assert_eq!(json["activity"], "reading");
    }
}
