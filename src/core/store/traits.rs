use crate::common::errors::StoreError;
use crate::RowKey;

/// Replica agreement required by a store request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsistencyLevel {
    /// A single replica answers; results may be stale.
    #[default]
    One,
    Quorum,
    All,
}

/// One stored cell. For term rows the name is the document key and the value
/// is the posting payload for that document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

impl Column {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// A row as returned by the store, columns sorted by name.
///
/// A row with no columns is a tombstone: the key was written once and its
/// content deleted since.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: RowKey,
    pub columns: Vec<Column>,
}

impl Row {
    pub fn new(key: impl Into<RowKey>, mut columns: Vec<Column>) -> Self {
        columns.sort_by(|a, b| a.name.cmp(&b.name));
        Self { key: key.into(), columns }
    }

    pub fn is_tombstone(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Key range scan. `start_key` is inclusive, `end_key` exclusive and
/// `None` leaves the range open. `max_rows` caps the number of rows, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub keyspace: String,
    pub column_family: String,
    pub start_key: RowKey,
    pub end_key: Option<RowKey>,
    pub max_rows: usize,
    pub consistency: ConsistencyLevel,
}

/// Point read of a single row restricted to the named columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedColumnsRead {
    pub keyspace: String,
    pub column_family: String,
    pub key: RowKey,
    pub column_names: Vec<Vec<u8>>,
    pub consistency: ConsistencyLevel,
}

/// The sorted, range-scannable key-value store the term dictionary lives in.
///
/// Implementations are shared by every cursor of a reader and must tolerate
/// concurrent calls.
pub trait RangeStore: Send + Sync {
    /// Rows whose keys fall inside the request range, in key order. Returning
    /// fewer than `max_rows` rows means the range is exhausted.
    fn scan(&self, request: &ScanRequest) -> Result<Vec<Row>, StoreError>;

    /// The requested columns of one row, `None` when the row does not exist.
    fn read_named_columns(&self, request: &NamedColumnsRead) -> Result<Option<Row>, StoreError>;
}
