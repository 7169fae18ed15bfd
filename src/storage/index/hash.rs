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

//! Hash access path for equality lookups
//!
//! ## Limitations:
//! - Does NOT support range lookups
//! - Does NOT support first/last lookups
//! - Usable only when every indexed column has an equality predicate

use std::cmp::Ordering;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::{Error, Result, Row, RowValues, SearchRow, Value};
use crate::optimizer::{mask_at, PredicateMask, COST_ROW_OFFSET};
use crate::storage::traits::{AccessPath, AccessPathDescriptor, Cursor};

type HashKey = SmallVec<[Value; 2]>;

#[derive(Default)]
struct Buckets {
    /// Key values -> rows holding them
    /// SmallVec<[Row; 1]> avoids heap allocation for the unique case
    rows: FxHashMap<HashKey, SmallVec<[Row; 1]>>,
    count: u64,
}

/// In-memory hash access path
pub struct HashAccessPath {
    descriptor: AccessPathDescriptor,
    buckets: RwLock<Buckets>,
}

impl std::fmt::Debug for HashAccessPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashAccessPath")
            .field("descriptor", &self.descriptor)
            .field("rows", &self.buckets.read().count)
            .finish_non_exhaustive()
    }
}

impl HashAccessPath {
    /// Create an empty path
    pub fn new(descriptor: AccessPathDescriptor) -> Result<Self> {
        if descriptor.path_type.is_scan() {
            return Err(Error::InvalidArgument(format!(
                "hash path {} needs indexed columns",
                descriptor.name
            )));
        }
        Ok(Self {
            descriptor,
            buckets: RwLock::new(Buckets::default()),
        })
    }

    /// Indexed values of a row; every indexed column must be bound
    fn key_of(&self, row: &dyn RowValues) -> Option<HashKey> {
        self.descriptor
            .column_ordinals()
            .iter()
            .map(|&o| row.value_at(o).cloned())
            .collect()
    }
}

impl AccessPath for HashAccessPath {
    fn descriptor(&self) -> &AccessPathDescriptor {
        &self.descriptor
    }

    fn add(&self, row: &Row) -> Result<()> {
        let key = self.key_of(row).ok_or_else(|| {
            Error::table_columns_not_match(self.descriptor.relation_columns().len(), row.len())
        })?;
        let mut buckets = self.buckets.write();
        let unique = self.descriptor.is_unique() && !self.contains_null(row);
        let bucket = buckets.rows.entry(key).or_default();
        if unique && !bucket.is_empty() {
            return Err(self.duplicate_key_error());
        }
        bucket.push(row.clone());
        buckets.count += 1;
        Ok(())
    }

    fn remove(&self, row: &Row) -> Result<()> {
        let key = self.key_of(row).ok_or(Error::RowNotFound(row.key()))?;
        let mut buckets = self.buckets.write();
        let bucket = buckets
            .rows
            .get_mut(&key)
            .ok_or(Error::RowNotFound(row.key()))?;
        let position = bucket
            .iter()
            .position(|r| r.key() == row.key())
            .ok_or(Error::RowNotFound(row.key()))?;
        bucket.remove(position);
        if bucket.is_empty() {
            buckets.rows.remove(&key);
        }
        buckets.count -= 1;
        Ok(())
    }

    fn find(&self, first: Option<&SearchRow>, last: Option<&SearchRow>) -> Result<Cursor> {
        let (Some(first), Some(last)) = (first, last) else {
            return Err(Error::not_supported("hash index range scan"));
        };
        if self.compare_rows(first, last)? != Ordering::Equal {
            return Err(Error::not_supported("hash index range scan"));
        }
        let key = self
            .key_of(first)
            .ok_or_else(|| Error::not_supported("hash index partial key lookup"))?;
        let rows = self
            .buckets
            .read()
            .rows
            .get(&key)
            .map(|bucket| bucket.to_vec())
            .unwrap_or_default();
        Ok(Cursor::from_rows(rows))
    }

    fn can_get_first_or_last(&self, _first: bool) -> bool {
        false
    }

    fn find_first_or_last(&self, _first: bool) -> Result<Value> {
        Err(Error::not_supported("first/last lookup on a hash index"))
    }

    fn cost(&self, masks: &[PredicateMask]) -> Result<f64> {
        let pinned = self
            .descriptor
            .column_ordinals()
            .iter()
            .all(|&o| mask_at(masks, o).is_equality());
        if !pinned {
            return Ok(f64::MAX);
        }
        let rows = self.row_count().saturating_add(COST_ROW_OFFSET);
        Ok(self.lookup_cost(rows) as f64)
    }

    fn truncate(&self) -> Result<()> {
        let mut buckets = self.buckets.write();
        buckets.rows.clear();
        buckets.count = 0;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn row_count(&self) -> u64 {
        self.buckets.read().count
    }
}
