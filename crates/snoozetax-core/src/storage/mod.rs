mod config;
pub mod database;
pub mod repository;

pub use config::{CalendarConfig, Config, FeedbackConfig};
pub use database::Database;
pub use repository::{KvStore, MemoryStore, StateRepository};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory, creating it if needed.
///
/// `SNOOZETAX_DATA_DIR` wins when set. Otherwise `~/.config/snoozetax`, or
/// `~/.config/snoozetax-dev` with `SNOOZETAX_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("SNOOZETAX_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("SNOOZETAX_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("snoozetax-dev")
            } else {
                base_dir.join("snoozetax")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(StorageError::DataDir)?;
    Ok(dir)
}
