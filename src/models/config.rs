use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::models::category::Category;
use crate::models::dataset::Dataset;

fn default_log_file() -> String {
    "price_targets.log".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub initial_category: Category,
    /// Replaces the built-in price targets when set.
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_file: default_log_file(),
            log_level: default_log_level(),
            initial_category: Category::default(),
            dataset_path: None,
        }
    }
}

impl Config {
    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_str)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn load_dataset(&self) -> Result<Dataset> {
        let dataset = match &self.dataset_path {
            Some(path) => Dataset::load(path)?,
            None => Dataset::builtin()?,
        };
        Ok(dataset)
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let config = Config::load(Path::new("no-such-config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level_filter(), LevelFilter::Info);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"initial_category": "meme", "log_level": "debug"}}"#).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.initial_category, Category::Meme);
        assert_eq!(config.log_level_filter(), LevelFilter::Debug);
        assert_eq!(config.log_file, "price_targets.log");
        assert!(config.dataset_path.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let config = Config { log_level: "chatty".to_string(), ..Config::default() };
        assert_eq!(config.log_level_filter(), LevelFilter::Info);
    }

    #[test]
    fn dataset_path_overrides_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let slice = r#"{"labels": ["X"], "data": {"bearish": [1], "neutral": [2], "bullish": [3]}}"#;
        write!(file, r#"{{"top10": {0}, "defi": {0}, "meme": {0}}}"#, slice).unwrap();
        let config = Config { dataset_path: Some(file.path().to_path_buf()), ..Config::default() };
        let dataset = config.load_dataset().unwrap();
        assert_eq!(dataset.category(Category::Top10).labels, vec!["X".to_string()]);
    }
}
