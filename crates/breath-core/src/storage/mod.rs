mod config;
pub mod database;
pub mod record_store;

pub use config::{Config, LoggingConfig};
pub use database::Database;
pub use record_store::{RecordStore, SharedRecordStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Key-value document persistence used by [`RecordStore`].
///
/// Values are self-describing JSON documents.
pub trait DocumentBackend: Send {
    /// Read the document stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the document stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns the data directory, creating it if needed.
///
/// Resolution order: `$BREATH_HOME`, then `~/.config/breath[-dev]/` based on
/// `BREATH_ENV` (set `BREATH_ENV=dev` for a development data directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("BREATH_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("BREATH_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("breath-dev")
            } else {
                base_dir.join("breath")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
