use crate::error::{Error, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "leitner-flashcards";
pub const CONFIG_ENV: &str = "LEITNER_FLASHCARDS_CONFIG";
/// `env_logger` filter directives applied on top of `log_level`.
pub const LOG_LEVEL_ENV: &str = "LEITNER_FLASHCARDS_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub decks_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
    pub shuffle: bool,
    /// Maximum cards per study session; `None` studies every due card.
    pub session_limit: Option<usize>,
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl Default for Config {
    fn default() -> Self {
        let data = data_dir();
        Self {
            decks_dir: PathBuf::from("flashcards"),
            db_path: data.join("progress.db"),
            log_file: data.join("debug.log"),
            log_level: "info".to_string(),
            shuffle: true,
            session_limit: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
    }

    /// Loads from `$LEITNER_FLASHCARDS_CONFIG` or the default location,
    /// falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(Self::default_path);

        match path {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.level_filter()?;
        Ok(config)
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| Error::Config(format!("unknown log level '{}'", self.log_level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.decks_dir, PathBuf::from("flashcards"));
        assert!(config.db_path.ends_with("leitner-flashcards/progress.db"));
        assert!(config.shuffle);
        assert_eq!(config.session_limit, None);
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"decks_dir": "/srv/decks", "session_limit": 20}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.decks_dir, PathBuf::from("/srv/decks"));
        assert_eq!(config.session_limit, Some(20));
        assert!(config.shuffle);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_rejects_unknown_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"log_level": "loud"}"#).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ decks_dir: ").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_level_filter_is_case_insensitive() {
        let config = Config {
            log_level: "DEBUG".to_string(),
            ..Config::default()
        };
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
    }
}
