//! Process-level configuration for hosts embedding the core.
//!
//! Values come from environment overrides with build-mode defaults; hosts
//! may also build a `CoreConfig` directly.

use crate::logging::default_log_level;
use crate::notify::PlatformProfile;
use std::path::PathBuf;

const DB_FILE_NAME: &str = "remindly.sqlite3";
const ENV_DB_PATH: &str = "REMINDLY_DB_PATH";
const ENV_LOG_LEVEL: &str = "REMINDLY_LOG_LEVEL";
const ENV_LOG_DIR: &str = "REMINDLY_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding the `user` and `tasks` slots.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling logs; `None` leaves logging off.
    pub log_dir: Option<PathBuf>,
    pub platform: PlatformProfile,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            platform: PlatformProfile::current(),
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by `REMINDLY_DB_PATH`, `REMINDLY_LOG_LEVEL` and
    /// `REMINDLY_LOG_DIR`. Blank values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = non_blank(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = non_blank(ENV_LOG_DIR).map(PathBuf::from);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::CoreConfig;
    use std::path::PathBuf;

    #[test]
    fn lookup_overrides_defaults_and_ignores_blank_values() {
        let config = CoreConfig::from_lookup(|key| match key {
            "REMINDLY_DB_PATH" => Some("/data/app/remindly.db".to_string()),
            "REMINDLY_LOG_LEVEL" => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(config.db_path, PathBuf::from("/data/app/remindly.db"));
        assert_eq!(config.log_level, CoreConfig::default().log_level);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn default_db_path_lives_in_temp_dir() {
        let config = CoreConfig::from_lookup(|_| None);
        assert!(config.db_path.starts_with(std::env::temp_dir()));
    }
}
