use std::time::Duration;

/// Rows requested by the first scan of a skip-to lineage.
pub const DEFAULT_MAX_INIT_SIZE: usize = 2;

/// Rows requested by every follow-up scan of a lineage.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1024;

/// Point reads are attempted this many times before giving up.
pub const DEFAULT_READ_RETRY_ATTEMPTS: usize = 10;

/// Fixed pause between two point-read attempts.
pub const DEFAULT_READ_RETRY_INTERVAL: Duration = Duration::from_millis(100);

pub const DEFAULT_KEYSPACE: &str = "Lucandra";
pub const DEFAULT_TERM_COLUMN_FAMILY: &str = "TermInfo";

/// Separates index, field and term text inside a row key.
pub const KEY_DELIMITER: u8 = 0x00;

/// Closes a field's key range. Never present in UTF-8 text.
pub const FIELD_END_MARKER: u8 = 0xFF;

pub const TERM_INDEX_CONFIG_FILE: &str = "term_index_config.json";
