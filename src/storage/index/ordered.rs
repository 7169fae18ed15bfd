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

//! Ordered access path
//!
//! Rows are kept sorted by the indexed columns, ties broken by storage key.
//! The sorted run lives behind an `Arc` so a cursor keeps reading the
//! snapshot it started on while writers copy on write.
//!
//! ## Key features:
//! - Range lookups with partial (prefix) bounds
//! - First / last value of the leading column
//! - Unique, non-unique and primary flavours; NULL keys never collide

use std::cmp::Ordering;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::{Error, Result, Row, RowValues, SearchRow, Value};
use crate::optimizer::PredicateMask;
use crate::storage::traits::{AccessPath, AccessPathDescriptor, Cursor, RowSource};

/// Sorted in-memory access path
pub struct OrderedAccessPath {
    descriptor: AccessPathDescriptor,
    rows: RwLock<Arc<Vec<Row>>>,
}

impl std::fmt::Debug for OrderedAccessPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderedAccessPath")
            .field("descriptor", &self.descriptor)
            .field("rows", &self.rows.read().len())
            .finish()
    }
}

impl OrderedAccessPath {
    /// Create an empty path
    pub fn new(descriptor: AccessPathDescriptor) -> Result<Self> {
        if descriptor.path_type.is_scan() {
            return Err(Error::InvalidArgument(format!(
                "ordered path {} needs indexed columns",
                descriptor.name
            )));
        }
        Ok(Self {
            descriptor,
            rows: RwLock::new(Arc::new(Vec::new())),
        })
    }

    /// Full ordering: indexed columns, then storage key
    fn compare_entries(&self, row: &Row, target: &Row) -> Result<Ordering> {
        Ok(self
            .compare_rows(row, target)?
            .then_with(|| self.compare_keys(row, target)))
    }

    /// Exact position of `target`, or where it would be inserted
    fn locate(&self, rows: &[Row], target: &Row) -> Result<std::result::Result<usize, usize>> {
        let (mut lo, mut hi) = (0, rows.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.compare_entries(&rows[mid], target)? {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Ok(Ok(mid)),
            }
        }
        Ok(Err(lo))
    }

    /// First position whose row does not sort before `bound`
    fn lower_bound(&self, rows: &[Row], bound: &dyn RowValues) -> Result<usize> {
        let (mut lo, mut hi) = (0, rows.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.compare_rows(&rows[mid], bound)? == Ordering::Less {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        Ok(lo)
    }

    /// First position whose row sorts after `bound`
    fn upper_bound(&self, rows: &[Row], bound: &dyn RowValues) -> Result<usize> {
        let (mut lo, mut hi) = (0, rows.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.compare_rows(&rows[mid], bound)? == Ordering::Greater {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        Ok(lo)
    }

    /// Leading indexed value of a row, NULL when missing
    fn leading_value(&self, row: &Row) -> Value {
        self.descriptor
            .column_ordinals()
            .first()
            .and_then(|&o| row.value_at(o))
            .cloned()
            .unwrap_or_else(Value::null_unknown)
    }
}

impl AccessPath for OrderedAccessPath {
    fn descriptor(&self) -> &AccessPathDescriptor {
        &self.descriptor
    }

    fn add(&self, row: &Row) -> Result<()> {
        let mut guard = self.rows.write();
        if self.descriptor.is_unique() && !self.contains_null(row) {
            let start = self.lower_bound(&guard, row)?;
            if let Some(existing) = guard.get(start) {
                if self.compare_rows(existing, row)? == Ordering::Equal {
                    return Err(self.duplicate_key_error());
                }
            }
        }
        let position = match self.locate(&guard, row)? {
            Ok(_) => {
                return Err(Error::internal(format!(
                    "row {} already in {}",
                    row.key(),
                    self.descriptor.name
                )))
            }
            Err(position) => position,
        };
        Arc::make_mut(&mut *guard).insert(position, row.clone());
        Ok(())
    }

    fn remove(&self, row: &Row) -> Result<()> {
        let mut guard = self.rows.write();
        match self.locate(&guard, row)? {
            Ok(position) => {
                Arc::make_mut(&mut *guard).remove(position);
                Ok(())
            }
            Err(_) => Err(Error::RowNotFound(row.key())),
        }
    }

    fn find(&self, first: Option<&SearchRow>, last: Option<&SearchRow>) -> Result<Cursor> {
        let rows = Arc::clone(&self.rows.read());
        let start = match first {
            Some(bound) => self.lower_bound(&rows, bound)?,
            None => 0,
        };
        let end = match last {
            Some(bound) => self.upper_bound(&rows, bound)?,
            None => rows.len(),
        };
        if start >= end {
            return Ok(Cursor::empty());
        }
        Ok(Cursor::new(SnapshotSource {
            rows,
            position: start,
            end,
        }))
    }

    fn can_get_first_or_last(&self, _first: bool) -> bool {
        true
    }

    fn find_first_or_last(&self, first: bool) -> Result<Value> {
        let rows = self.rows.read();
        let found = if first {
            // NULL sorts first; the smallest value is the first non-null one
            rows.iter()
                .map(|row| self.leading_value(row))
                .find(|value| !value.is_null())
        } else {
            rows.last().map(|row| self.leading_value(row))
        };
        Ok(found.unwrap_or_else(|| {
            let data_type = self
                .descriptor
                .indexed_columns()
                .next()
                .map(|c| c.data_type)
                .unwrap_or_default();
            Value::null(data_type)
        }))
    }

    fn cost(&self, masks: &[PredicateMask]) -> Result<f64> {
        Ok(self.cost_range_index(masks, self.row_count()) as f64)
    }

    fn truncate(&self) -> Result<()> {
        *self.rows.write() = Arc::new(Vec::new());
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn row_count(&self) -> u64 {
        self.rows.read().len() as u64
    }
}

/// Cursor source over a snapshot of the sorted run
struct SnapshotSource {
    rows: Arc<Vec<Row>>,
    position: usize,
    end: usize,
}

impl RowSource for SnapshotSource {
    fn next_row(&mut self) -> Option<Result<Row>> {
        if self.position >= self.end {
            return None;
        }
        let row = self.rows.get(self.position)?.clone();
        self.position += 1;
        Some(Ok(row))
    }
}
