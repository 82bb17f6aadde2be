use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::constants::*;
use crate::common::errors::TermIndexError;
use crate::common::file_operations::{atomic_save_json, read_json, FileOperationError};

fn default_max_init_size() -> usize {
    DEFAULT_MAX_INIT_SIZE
}

fn default_max_chunk_size() -> usize {
    DEFAULT_MAX_CHUNK_SIZE
}

fn default_read_retry_attempts() -> usize {
    DEFAULT_READ_RETRY_ATTEMPTS
}

fn default_read_retry_interval_ms() -> u64 {
    DEFAULT_READ_RETRY_INTERVAL.as_millis() as u64
}

fn default_keyspace() -> String {
    DEFAULT_KEYSPACE.to_string()
}

fn default_term_column_family() -> String {
    DEFAULT_TERM_COLUMN_FAMILY.to_string()
}

/// Paging and retry policy of the term cursor, plus where term rows live.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone)]
#[serde(rename_all = "snake_case")]
pub struct TermIndexConfig {
    /// Row cap of the first scan after a skip-to.
    #[serde(default = "default_max_init_size")]
    pub max_init_size: usize,

    /// Row cap of every follow-up scan.
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    #[serde(default = "default_read_retry_attempts")]
    pub read_retry_attempts: usize,

    #[serde(default = "default_read_retry_interval_ms")]
    #[serde(rename = "read_retry_interval")]
    pub read_retry_interval_ms: u64,

    #[serde(default = "default_keyspace")]
    pub keyspace: String,

    #[serde(default = "default_term_column_family")]
    pub term_column_family: String,
}

impl Default for TermIndexConfig {
    fn default() -> Self {
        Self {
            max_init_size: DEFAULT_MAX_INIT_SIZE,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            read_retry_attempts: DEFAULT_READ_RETRY_ATTEMPTS,
            read_retry_interval_ms: default_read_retry_interval_ms(),
            keyspace: default_keyspace(),
            term_column_family: default_term_column_family(),
        }
    }
}

impl TermIndexConfig {
    pub fn new(max_init_size: usize, max_chunk_size: usize) -> Result<Self, TermIndexError> {
        let config = TermIndexConfig { max_init_size, max_chunk_size, ..Default::default() };
        config.is_valid()?;
        Ok(config)
    }

    pub fn with_retry(mut self, attempts: usize, interval: Duration) -> Result<Self, TermIndexError> {
        self.read_retry_attempts = attempts;
        self.read_retry_interval_ms = interval.as_millis() as u64;
        self.is_valid()?;
        Ok(self)
    }

    pub fn read_retry_interval(&self) -> Duration {
        Duration::from_millis(self.read_retry_interval_ms)
    }

    pub fn is_valid(&self) -> Result<bool, TermIndexError> {
        // A resumed scan starts on the row it resumes from, so a cap below 2 never advances.
        if self.max_init_size < 2 {
            return Err(TermIndexError::InvalidConfig("`max_init_size` must be at least 2.".to_string()));
        }
        if self.max_chunk_size < self.max_init_size {
            return Err(TermIndexError::InvalidConfig("`max_chunk_size` can't be smaller than `max_init_size`.".to_string()));
        }
        if self.read_retry_attempts == 0 {
            return Err(TermIndexError::InvalidConfig("`read_retry_attempts` must be positive.".to_string()));
        }
        if self.keyspace.is_empty() || self.term_column_family.is_empty() {
            return Err(TermIndexError::InvalidConfig("`keyspace` and `term_column_family` can't be empty.".to_string()));
        }
        Ok(true)
    }

    pub fn load(index_path: &Path) -> Result<Self, TermIndexError> {
        let file_path = index_path.join(TERM_INDEX_CONFIG_FILE);
        let config: TermIndexConfig = read_json(&file_path)?;
        config.is_valid()?;
        Ok(config)
    }

    pub fn save(&self, index_path: &Path) -> Result<(), FileOperationError> {
        let file_path = index_path.join(TERM_INDEX_CONFIG_FILE);
        if !index_path.exists() {
            std::fs::create_dir_all(index_path)?;
        }
        atomic_save_json(&file_path, self)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;

    use super::TermIndexConfig;
    use crate::common::errors::TermIndexError;

    #[test]
    fn test_parse_config() {
        let empty_config: TermIndexConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(empty_config, TermIndexConfig::default());
        assert_eq!(empty_config.max_init_size, 2);
        assert_eq!(empty_config.max_chunk_size, 1024);
        assert_eq!(empty_config.read_retry_attempts, 10);
        assert_eq!(empty_config.read_retry_interval(), Duration::from_millis(100));

        let config: TermIndexConfig = serde_json::from_str("{\"max_chunk_size\":64,\"read_retry_interval\":5}").expect("parse");
        assert_eq!(config.max_chunk_size, 64);
        assert_eq!(config.read_retry_interval_ms, 5);
        assert_eq!(config.keyspace, "Lucandra");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(TermIndexConfig::new(1, 16), Err(TermIndexError::InvalidConfig(_))));
        assert!(matches!(TermIndexConfig::new(8, 4), Err(TermIndexError::InvalidConfig(_))));
        let no_retry = TermIndexConfig::default().with_retry(0, Duration::ZERO);
        assert!(matches!(no_retry, Err(TermIndexError::InvalidConfig(_))));
        assert!(TermIndexConfig::new(2, 2).is_ok());
    }

    #[test]
    fn test_load_and_save() {
        let temp_dir = TempDir::new().expect("Failed to create temporary directory");
        let index_path = temp_dir.path().join("wikipedia");

        let config = TermIndexConfig::new(4, 256).expect("valid config");
        config.save(&index_path).expect("Failed to save config");

        let loaded_config = TermIndexConfig::load(&index_path).expect("Failed to load config");
        assert_eq!(config, loaded_config);
    }
}
