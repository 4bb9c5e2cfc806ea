//! Runtime configuration for the Libris console.
//!
//! Each setting resolves with the following precedence:
//! 1. command-line flag
//! 2. environment variable (`LIBRIS_DB_PATH`, `LIBRIS_LOG_DIR`)
//! 3. built-in default (`./library.db`, `<temp>/libris-logs`, build-mode level)

use libris_core::{default_log_level, StoreConfig};
use std::path::{Path, PathBuf};

pub const DB_PATH_ENV: &str = "LIBRIS_DB_PATH";
pub const LOG_DIR_ENV: &str = "LIBRIS_LOG_DIR";

const DEFAULT_DB_FILE: &str = "library.db";
const DEFAULT_LOG_DIR_NAME: &str = "libris-logs";

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Resolves settings from flags and the process environment.
    pub fn resolve(
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Self {
        Self::resolve_with(db_path, log_dir, log_level, |key| std::env::var(key).ok())
    }

    fn resolve_with(
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let db_path = db_path
            .or_else(|| env(DB_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));

        let log_dir = log_dir
            .or_else(|| env(LOG_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));

        Self {
            db_path,
            log_dir: absolutize(&log_dir),
            log_level: log_level.unwrap_or_else(|| default_log_level().to_string()),
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::file(&self.db_path)
    }
}

// Logging only accepts absolute directories.
fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
