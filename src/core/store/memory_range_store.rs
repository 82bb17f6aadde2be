use std::collections::BTreeMap;
use std::ops::Bound;

use fnv::FnvHashMap;
use log::debug;
use parking_lot::RwLock;

use super::{Column, NamedColumnsRead, RangeStore, Row, ScanRequest};
use crate::common::errors::StoreError;
use crate::RowKey;

type Columns = BTreeMap<Vec<u8>, Vec<u8>>;
type ColumnFamily = BTreeMap<RowKey, Columns>;

/// Ordered in-process [`RangeStore`].
///
/// Rows are kept per `(keyspace, column family)` in key order. Deleting a
/// row leaves a tombstone behind, which scans keep returning the way a
/// distributed store returns range ghosts until compaction.
#[derive(Default)]
pub struct MemoryRangeStore {
    families: RwLock<FnvHashMap<(String, String), ColumnFamily>>,
}

impl MemoryRangeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert columns into a row.
    pub fn put(&self, keyspace: &str, column_family: &str, key: impl Into<RowKey>, columns: Vec<Column>) {
        let mut families = self.families.write();
        let family = families.entry((keyspace.to_string(), column_family.to_string())).or_default();
        let row = family.entry(key.into()).or_default();
        for column in columns {
            row.insert(column.name, column.value);
        }
    }

    pub fn put_row(&self, keyspace: &str, column_family: &str, row: Row) {
        self.put(keyspace, column_family, row.key, row.columns);
    }

    /// Drop all columns of a row, leaving a tombstone.
    pub fn delete(&self, keyspace: &str, column_family: &str, key: &[u8]) -> bool {
        let mut families = self.families.write();
        let Some(family) = families.get_mut(&(keyspace.to_string(), column_family.to_string())) else {
            return false;
        };
        match family.get_mut(key) {
            Some(row) => {
                row.clear();
                true
            }
            None => false,
        }
    }

    /// Number of rows, tombstones included.
    pub fn row_count(&self, keyspace: &str, column_family: &str) -> usize {
        self.families
            .read()
            .get(&(keyspace.to_string(), column_family.to_string()))
            .map(|family| family.len())
            .unwrap_or(0)
    }

    fn to_row(key: &RowKey, columns: &Columns) -> Row {
        Row {
            key: key.clone(),
            columns: columns.iter().map(|(name, value)| Column::new(name.clone(), value.clone())).collect(),
        }
    }
}

impl RangeStore for MemoryRangeStore {
    fn scan(&self, request: &ScanRequest) -> Result<Vec<Row>, StoreError> {
        let families = self.families.read();
        let Some(family) = families.get(&(request.keyspace.clone(), request.column_family.clone())) else {
            return Ok(vec![]);
        };
        if let Some(end_key) = &request.end_key {
            if end_key <= &request.start_key {
                return Ok(vec![]);
            }
        }

        let upper = match &request.end_key {
            Some(end_key) => Bound::Excluded(end_key.clone()),
            None => Bound::Unbounded,
        };
        let rows: Vec<Row> = family
            .range((Bound::Included(request.start_key.clone()), upper))
            .take(request.max_rows)
            .map(|(key, columns)| Self::to_row(key, columns))
            .collect();
        debug!("memory store scanned {} rows, limit {}", rows.len(), request.max_rows);
        Ok(rows)
    }

    fn read_named_columns(&self, request: &NamedColumnsRead) -> Result<Option<Row>, StoreError> {
        let families = self.families.read();
        let row = families
            .get(&(request.keyspace.clone(), request.column_family.clone()))
            .and_then(|family| family.get(&request.key));

        Ok(row.map(|columns| {
            let selected = request
                .column_names
                .iter()
                .filter_map(|name| columns.get(name).map(|value| Column::new(name.clone(), value.clone())))
                .collect();
            Row::new(request.key.clone(), selected)
        }))
    }
}
