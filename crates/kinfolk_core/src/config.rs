//! Runtime configuration for a kinfolk session.
//!
//! # Responsibility
//! - Resolve data/log locations and the log level from caller input.
//! - Provide the single place that decides the database file name.
//!
//! # Invariants
//! - `data_dir` and `log_dir` are absolute once constructed.

use crate::logging::{default_log_level, init_logging};
use crate::store::{SqliteStore, StoreResult};
use std::path::{Path, PathBuf};

/// Database file created inside the data directory.
pub const DB_FILE_NAME: &str = "kinfolk.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Builds a config rooted at `data_dir`, resolving relative paths against
    /// the working directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = absolutize(data_dir.as_ref());
        Self {
            log_dir: data_dir.join(LOG_DIR_NAME),
            data_dir,
            log_level: default_log_level().to_string(),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    /// Starts file logging for this process.
    pub fn init_logging(&self) -> Result<(), String> {
        let log_dir = self
            .log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: {}", self.log_dir.display()))?;
        init_logging(&self.log_level, log_dir)
    }

    /// Opens the member store in the data directory.
    pub fn open_store(&self) -> StoreResult<SqliteStore> {
        SqliteStore::open(self.db_path())
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DB_FILE_NAME};

    #[test]
    fn derives_paths_from_data_dir() {
        let dir = std::env::temp_dir().join("kinfolk-config");
        let config = AppConfig::new(&dir);

        assert_eq!(config.db_path(), dir.join(DB_FILE_NAME));
        assert_eq!(config.log_dir, dir.join("logs"));
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn relative_data_dir_becomes_absolute() {
        let config = AppConfig::new("relative-data");
        assert!(config.data_dir.is_absolute());
        assert!(config.data_dir.ends_with("relative-data"));
    }
}
