// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Full scan access path
//!
//! Holds every row of a table keyed by storage key, so a scan returns rows
//! in insertion order. It indexes no columns: its cost is always the padded
//! row count, and bounds passed to `find` are ignored.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::{Error, Result, Row, RowValues, SearchRow, Value};
use crate::optimizer::PredicateMask;
use crate::storage::traits::{AccessPath, AccessPathDescriptor, Cursor, RowSource};

/// Row storage of a table, readable as a full scan
pub struct ScanAccessPath {
    descriptor: AccessPathDescriptor,
    rows: RwLock<Arc<BTreeMap<i64, Row>>>,
}

impl std::fmt::Debug for ScanAccessPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanAccessPath")
            .field("descriptor", &self.descriptor)
            .field("rows", &self.rows.read().len())
            .finish()
    }
}

impl ScanAccessPath {
    pub fn new(descriptor: AccessPathDescriptor) -> Result<Self> {
        if !descriptor.path_type.is_scan() {
            return Err(Error::InvalidArgument(format!(
                "{} is not a scan path",
                descriptor.name
            )));
        }
        Ok(Self {
            descriptor,
            rows: RwLock::new(Arc::new(BTreeMap::new())),
        })
    }

    /// Row at a storage key
    pub fn get(&self, key: i64) -> Option<Row> {
        self.rows.read().get(&key).cloned()
    }

    /// Copy of every row, in storage order
    pub fn rows(&self) -> Vec<Row> {
        self.rows.read().values().cloned().collect()
    }
}

impl AccessPath for ScanAccessPath {
    fn descriptor(&self) -> &AccessPathDescriptor {
        &self.descriptor
    }

    fn add(&self, row: &Row) -> Result<()> {
        let mut guard = self.rows.write();
        if guard.contains_key(&row.key()) {
            return Err(Error::internal(format!(
                "storage key {} already used in {}",
                row.key(),
                self.descriptor.relation.name
            )));
        }
        Arc::make_mut(&mut *guard).insert(row.key(), row.clone());
        Ok(())
    }

    fn remove(&self, row: &Row) -> Result<()> {
        let mut guard = self.rows.write();
        Arc::make_mut(&mut *guard)
            .remove(&row.key())
            .map(|_| ())
            .ok_or(Error::RowNotFound(row.key()))
    }

    fn find(&self, _first: Option<&SearchRow>, _last: Option<&SearchRow>) -> Result<Cursor> {
        Ok(Cursor::new(ScanSource {
            rows: Arc::clone(&self.rows.read()),
            after: None,
        }))
    }

    fn can_get_first_or_last(&self, _first: bool) -> bool {
        false
    }

    fn find_first_or_last(&self, _first: bool) -> Result<Value> {
        Err(Error::not_supported("first/last lookup on a scan"))
    }

    fn cost(&self, masks: &[PredicateMask]) -> Result<f64> {
        Ok(self.cost_range_index(masks, self.row_count()) as f64)
    }

    fn truncate(&self) -> Result<()> {
        *self.rows.write() = Arc::new(BTreeMap::new());
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn row_count(&self) -> u64 {
        self.rows.read().len() as u64
    }
}

/// Cursor source walking a snapshot of the storage in key order
struct ScanSource {
    rows: Arc<BTreeMap<i64, Row>>,
    after: Option<i64>,
}

impl RowSource for ScanSource {
    fn next_row(&mut self) -> Option<Result<Row>> {
        let lower = match self.after {
            Some(key) => Bound::Excluded(key),
            None => Bound::Unbounded,
        };
        let (&key, row) = self.rows.range((lower, Bound::Unbounded)).next()?;
        self.after = Some(key);
        Some(Ok(row.clone()))
    }
}
