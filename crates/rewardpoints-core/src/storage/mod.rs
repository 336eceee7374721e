//! Persistence: SQLite state storage and TOML configuration.

mod config;
pub mod database;
mod store;

pub use config::{ChartConfig, Config, DefaultsConfig, ProgressConfig, MAX_CHART_WINDOW};
pub use database::Database;
pub use store::{StateStore, STATE_KEY};

use std::path::PathBuf;

/// Returns the data directory.
///
/// `REWARDPOINTS_DATA_DIR` overrides the location entirely. Otherwise this is
/// `~/.config/rewardpoints[-dev]/`, where REWARDPOINTS_ENV=dev selects the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("REWARDPOINTS_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("REWARDPOINTS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("rewardpoints-dev")
            } else {
                base_dir.join("rewardpoints")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
