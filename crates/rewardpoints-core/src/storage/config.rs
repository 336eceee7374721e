//! TOML-based application configuration.
//!
//! Stores:
//! - The activity catalog (labels, point values, repeatable flags)
//! - Quick-add button values
//! - Settings used when a fresh state is created
//! - Chart window and progress goal
//!
//! Configuration is stored at `~/.config/rewardpoints/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::badges::{default_badges, BadgeTable};
use crate::catalog::{self, ActivityCatalog, ActivityDef};
use crate::error::{ConfigError, Result, ValidationError};
use crate::tracker::{
    RewardRules, Settings, DEFAULT_CHART_WINDOW, DEFAULT_DAILY_LIMIT, DEFAULT_QUICK_ADD,
};

/// Longest chart window accepted.
pub const MAX_CHART_WINDOW: u32 = 31;

/// Settings applied to a brand-new state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub starting_points: u32,
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Total points that fill the overall progress bar.
    #[serde(default = "default_total_goal")]
    pub total_goal: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/rewardpoints/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_quick_add")]
    pub quick_add: Vec<u32>,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default = "catalog::default_activities")]
    pub activities: Vec<ActivityDef>,
}

// Default functions
fn default_daily_limit() -> u32 {
    DEFAULT_DAILY_LIMIT
}
fn default_window_days() -> u32 {
    DEFAULT_CHART_WINDOW
}
fn default_total_goal() -> u64 {
    100
}
fn default_quick_add() -> Vec<u32> {
    DEFAULT_QUICK_ADD.to_vec()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            starting_points: 0,
            daily_limit: default_daily_limit(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            total_goal: default_total_goal(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quick_add: default_quick_add(),
            defaults: DefaultsConfig::default(),
            chart: ChartConfig::default(),
            progress: ProgressConfig::default(),
            activities: catalog::default_activities(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing and returning the default if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path. See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(ConfigError::from)?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Check every value the tracker relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, e: ValidationError| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        };
        let catalog =
            ActivityCatalog::new(self.activities.clone()).map_err(|e| invalid("activities", e))?;
        BadgeTable::new(default_badges(), &catalog).map_err(|e| invalid("activities", e))?;
        for points in &self.quick_add {
            catalog::check_points(*points).map_err(|e| invalid("quick_add", e))?;
        }
        if !(1..=MAX_CHART_WINDOW).contains(&self.chart.window_days) {
            return Err(ConfigError::InvalidValue {
                key: "chart.window_days".into(),
                message: format!("must be between 1 and {MAX_CHART_WINDOW}"),
            });
        }
        if self.progress.total_goal == 0 {
            return Err(ConfigError::InvalidValue {
                key: "progress.total_goal".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Build the tracker rules: catalog, built-in badges, quick-add values.
    ///
    /// # Errors
    /// Returns a validation error if the catalog or quick-add values are invalid,
    /// or a built-in badge references an activity the catalog lacks.
    pub fn rules(&self) -> Result<RewardRules> {
        let catalog = ActivityCatalog::new(self.activities.clone())?;
        let badges = BadgeTable::new(default_badges(), &catalog)?;
        Ok(RewardRules::new(catalog, badges, self.quick_add.clone())?)
    }

    /// Settings for a brand-new state.
    pub fn initial_settings(&self) -> Settings {
        Settings {
            display_name: self.defaults.display_name.clone(),
            starting_points: self.defaults.starting_points,
            daily_limit: self.defaults.daily_limit,
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key in memory, validating the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting configuration is invalid.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and persist. See [`Config::set_value`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.defaults.daily_limit, 50);
        assert_eq!(parsed.activities.len(), cfg.activities.len());
        assert_eq!(parsed.quick_add, vec![1, 5, 10]);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
        let rules = Config::default().rules().unwrap();
        assert!(rules.is_repeatable("kind-act"));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.chart.window_days, 7);
        assert_eq!(cfg.progress.total_goal, 100);
        assert!(!cfg.activities.is_empty());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("chart.window_days").as_deref(), Some("7"));
        assert_eq!(cfg.get("defaults.daily_limit").as_deref(), Some("50"));
        assert!(cfg.get("chart.missing_key").is_none());
    }

    #[test]
    fn set_value_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set_value("defaults.daily_limit", "75").unwrap();
        assert_eq!(cfg.defaults.daily_limit, 75);
    }

    #[test]
    fn set_value_updates_string() {
        let mut cfg = Config::default();
        cfg.set_value("defaults.display_name", "Mia").unwrap();
        assert_eq!(cfg.defaults.display_name, "Mia");
    }

    #[test]
    fn set_value_updates_array() {
        let mut cfg = Config::default();
        cfg.set_value("quick_add", "[2, 4]").unwrap();
        assert_eq!(cfg.quick_add, vec![2, 4]);
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("chart.nonexistent", "1"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
    }

    #[test]
    fn set_value_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("chart.window_days", "seven").is_err());
        assert_eq!(cfg.chart.window_days, 7);
    }

    #[test]
    fn set_value_rejects_invalid_result() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("chart.window_days", "0").is_err());
        assert!(cfg.set_value("quick_add", "[500]").is_err());
        assert_eq!(cfg.quick_add, vec![1, 5, 10]);
    }

    #[test]
    fn removing_badge_activity_fails_validation() {
        let mut cfg = Config::default();
        cfg.activities.retain(|a| a.id != "reading");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.chart.window_days, 7);

        let mut edited = cfg.clone();
        edited.progress.total_goal = 250;
        edited.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().progress.total_goal, 250);
    }

    #[test]
    fn load_from_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "chart = 12").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn initial_settings_follow_defaults_section() {
        let mut cfg = Config::default();
        cfg.defaults.daily_limit = 30;
        assert_eq!(cfg.initial_settings().daily_limit, 30);
    }
}
