//! Dashboard configuration
//!
//! Loaded from YAML; every section and key is optional and falls back to
//! the defaults of a local single-node deployment.

use crate::error::{Error, Result};
use crate::query::{BoostMode, QueryBuilder, DEFAULT_INDEX, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Search engine endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub url: String,
    pub index: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            url: "http://localhost:9200".to_string(),
            index: DEFAULT_INDEX.to_string(),
        }
    }
}

/// Paging and scoring options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub page_size: u32,
    pub boost_mode: BoostMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            page_size: DEFAULT_PAGE_SIZE,
            boost_mode: BoostMode::Multiply,
        }
    }
}

/// External indexing and evaluation scripts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Program used to run the scripts
    pub interpreter: String,
    /// Directory the scripts run in; relative paths resolve against it
    pub working_dir: PathBuf,
    pub index_script: String,
    pub data_file: String,
    pub evaluate_script: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        ScriptsConfig {
            interpreter: "python3".to_string(),
            working_dir: PathBuf::from("."),
            index_script: "index_books.py".to_string(),
            data_file: "books.json".to_string(),
            evaluate_script: "evaluate.py".to_string(),
        }
    }
}

impl ScriptsConfig {
    /// Arguments for the re-index run: script path, then data file
    pub fn reindex_args(&self) -> Vec<String> {
        vec![self.index_script.clone(), self.data_file.clone()]
    }

    /// Arguments for the evaluation run: the script path alone
    pub fn evaluate_args(&self) -> Vec<String> {
        vec![self.evaluate_script.clone()]
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub search: SearchConfig,
    pub scripts: ScriptsConfig,
}

impl Config {
    /// Parse a YAML document
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::ConfigError(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::read(path)
            }
            None => {
                let path = default_config_path();
                if path.exists() {
                    Self::read(&path)
                } else {
                    tracing::debug!("No config at {}, using defaults", path.display());
                    Ok(Config::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Reject settings no search can run with
    pub fn validate(&self) -> Result<()> {
        if self.search.page_size == 0 {
            return Err(Error::ConfigError(
                "search.page_size must be at least 1".to_string(),
            ));
        }
        if self.engine.index.trim().is_empty() {
            return Err(Error::ConfigError("engine.index must not be empty".to_string()));
        }
        if self.engine.url.trim().is_empty() {
            return Err(Error::ConfigError("engine.url must not be empty".to_string()));
        }
        Ok(())
    }

    /// Query builder using the configured boost mode
    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::default().with_boost_mode(self.search.boost_mode)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Default config path (~/.config/bookdash/config.yaml on Linux)
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bookdash")
        .join("config.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.engine.url, "http://localhost:9200");
        assert_eq!(config.engine.index, "books_index");
        assert_eq!(config.search.page_size, 20);
        assert_eq!(config.search.boost_mode, BoostMode::Multiply);
        assert_eq!(config.scripts.interpreter, "python3");
        assert_eq!(
            config.scripts.reindex_args(),
            vec!["index_books.py".to_string(), "books.json".to_string()]
        );
        assert_eq!(config.scripts.evaluate_args(), vec!["evaluate.py".to_string()]);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "engine:\n  url: http://search.internal:9200\nsearch:\n  boost_mode: sum\n",
        )
        .unwrap();
        assert_eq!(config.engine.url, "http://search.internal:9200");
        assert_eq!(config.engine.index, "books_index");
        assert_eq!(config.search.boost_mode, BoostMode::Sum);
        assert_eq!(config.search.page_size, 20);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = Config::from_yaml("search:\n  page_size: 0\n").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_unknown_boost_mode_rejected() {
        assert!(Config::from_yaml("search:\n  boost_mode: product\n").is_err());
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "scripts:\n  interpreter: python3.11\n  data_file: data/books.json\n")
            .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.scripts.interpreter, "python3.11");
        assert_eq!(config.scripts.data_file, "data/books.json");
        assert_eq!(config.scripts.index_script, "index_books.py");
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = Config::default();
        let text = config.to_yaml().unwrap();
        assert!(text.contains("boost_mode: multiply"));
        assert_eq!(Config::from_yaml(&text).unwrap(), config);
    }
}
