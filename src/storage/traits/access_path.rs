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

//! Access path trait
//!
//! An access path is any structure that can hand out the rows of a relation:
//! an ordered index, a hash index, a full scan, or the compiled query behind
//! a view. The optimizer compares them purely through [`AccessPath::cost`],
//! so every implementation must price itself with the shared cost model.

use std::cmp::Ordering;
use std::sync::Arc;

use smallvec::SmallVec;

use super::cursor::Cursor;
use crate::core::{
    AccessPathType, Column, Error, RelationRef, Result, Row, RowValues, SearchRow, Value,
    ValueComparator,
};
use crate::optimizer::cost::{self, PredicateMask, DEFAULT_LOOKUP_COST};

/// What an access path is built over
///
/// The descriptor shares the owning relation's column set and records which
/// ordinals the path indexes, in key order. The relation itself is only
/// referenced by id and name.
#[derive(Clone)]
pub struct AccessPathDescriptor {
    /// Path name
    pub name: String,

    /// Owning relation
    pub relation: RelationRef,

    /// Unique / non-unique / primary / scan
    pub path_type: AccessPathType,

    columns: Arc<[Column]>,
    ordinals: SmallVec<[usize; 4]>,
    comparator: Arc<dyn ValueComparator>,
}

impl AccessPathDescriptor {
    /// Describe a path over `ordinals` of the relation's `columns`
    pub fn new(
        name: impl Into<String>,
        relation: RelationRef,
        path_type: AccessPathType,
        columns: Arc<[Column]>,
        ordinals: &[usize],
        comparator: Arc<dyn ValueComparator>,
    ) -> Result<Self> {
        if let Some(&bad) = ordinals.iter().find(|&&o| o >= columns.len()) {
            return Err(Error::ColumnIndexOutOfBounds { index: bad });
        }
        if path_type.is_scan() && !ordinals.is_empty() {
            return Err(Error::InvalidArgument(
                "a scan path does not index columns".to_string(),
            ));
        }
        if !path_type.is_scan() && ordinals.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "{} needs at least one column",
                path_type
            )));
        }
        Ok(Self {
            name: name.into(),
            relation,
            path_type,
            columns,
            ordinals: SmallVec::from_slice(ordinals),
            comparator,
        })
    }

    /// Describe a full scan: no indexed columns
    pub fn scan(
        name: impl Into<String>,
        relation: RelationRef,
        columns: Arc<[Column]>,
        comparator: Arc<dyn ValueComparator>,
    ) -> Self {
        Self {
            name: name.into(),
            relation,
            path_type: AccessPathType::Scan,
            columns,
            ordinals: SmallVec::new(),
            comparator,
        }
    }

    /// Indexed columns in key order
    pub fn indexed_columns(&self) -> impl ExactSizeIterator<Item = &Column> + '_ {
        self.ordinals.iter().map(move |&o| &self.columns[o])
    }

    /// Relation ordinals of the indexed columns, in key order
    pub fn column_ordinals(&self) -> &[usize] {
        &self.ordinals
    }

    /// Every column of the owning relation
    pub fn relation_columns(&self) -> &Arc<[Column]> {
        &self.columns
    }

    /// Comparator shared with the rest of the database
    pub fn comparator(&self) -> &Arc<dyn ValueComparator> {
        &self.comparator
    }

    /// Key position of a relation column in this path, if indexed
    pub fn column_position(&self, ordinal: usize) -> Option<usize> {
        self.ordinals.iter().position(|&o| o == ordinal)
    }

    /// Returns true if duplicate non-null keys are rejected
    pub fn is_unique(&self) -> bool {
        self.path_type.is_unique()
    }

    /// Comma separated, quoted indexed column names
    pub fn column_list_sql(&self) -> String {
        self.indexed_columns()
            .map(Column::sql)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Debug for AccessPathDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessPathDescriptor")
            .field("name", &self.name)
            .field("relation", &self.relation.name)
            .field("path_type", &self.path_type)
            .field("ordinals", &self.ordinals)
            .finish()
    }
}

/// Compare two rows over `ordinals`
///
/// Stops with `Equal` at the first ordinal `compare` leaves unbound, so a
/// partial search key matches every row sharing its bound prefix. A row
/// missing a value that `compare` binds sorts after it.
pub fn compare_rows_by(
    comparator: &dyn ValueComparator,
    ordinals: &[usize],
    row: &dyn RowValues,
    compare: &dyn RowValues,
) -> Result<Ordering> {
    for &ordinal in ordinals {
        let Some(bound) = compare.value_at(ordinal) else {
            return Ok(Ordering::Equal);
        };
        let ordering = match row.value_at(ordinal) {
            Some(value) => comparator.compare(value, bound)?,
            None => Ordering::Greater,
        };
        if ordering != Ordering::Equal {
            return Ok(ordering);
        }
    }
    Ok(Ordering::Equal)
}

/// Access path over the rows of one relation
///
/// Mutators take `&self`; implementations use interior mutability so one
/// path can be shared by concurrent readers through an `Arc`.
pub trait AccessPath: Send + Sync {
    /// What this path is built over
    fn descriptor(&self) -> &AccessPathDescriptor;

    /// Insert a row
    ///
    /// Unique paths fail with [`Error::DuplicateKey`] when another row with
    /// the same key and no NULL in the key already exists.
    fn add(&self, row: &Row) -> Result<()>;

    /// Remove a row, located by key values and storage key
    fn remove(&self, row: &Row) -> Result<()>;

    /// Rows between two optional bounds, both inclusive, in key order
    ///
    /// Either bound may be partial; unbound positions match anything.
    /// The returned cursor owns any resource the path had to acquire.
    fn find(&self, first: Option<&SearchRow>, last: Option<&SearchRow>) -> Result<Cursor>;

    /// Whether [`AccessPath::find_first_or_last`] is available
    fn can_get_first_or_last(&self, first: bool) -> bool;

    /// Smallest (`first`) or largest value of the first indexed column
    fn find_first_or_last(&self, first: bool) -> Result<Value>;

    /// Estimated cost of reading through this path with the given predicates
    fn cost(&self, masks: &[PredicateMask]) -> Result<f64>;

    /// Remove every row and reset the row count
    fn truncate(&self) -> Result<()>;

    /// Release session-scoped resources, keeping the data
    fn close(&self) -> Result<()>;

    /// Current row-count estimate
    fn row_count(&self) -> u64;

    /// Whether the path has to be rebuilt from the relation's rows
    fn needs_rebuild(&self) -> bool {
        false
    }

    /// Whether this path stands in for a recursive view still being bound
    fn is_recursive(&self) -> bool {
        false
    }

    /// Price of one positioned lookup at the given (padded) row count
    fn lookup_cost(&self, _row_count: u64) -> u64 {
        DEFAULT_LOOKUP_COST
    }

    /// Path name
    fn name(&self) -> &str {
        &self.descriptor().name
    }

    /// Shared range-index cost model over this path's columns
    fn cost_range_index(&self, masks: &[PredicateMask], row_count: u64) -> u64 {
        let descriptor = self.descriptor();
        cost::cost_range_index(
            descriptor.indexed_columns(),
            descriptor.is_unique(),
            masks,
            row_count,
            |rows| self.lookup_cost(rows),
        )
    }

    /// Compare two rows over the indexed columns, see [`compare_rows_by`]
    fn compare_rows(&self, row: &dyn RowValues, compare: &dyn RowValues) -> Result<Ordering> {
        let descriptor = self.descriptor();
        compare_rows_by(
            descriptor.comparator().as_ref(),
            descriptor.column_ordinals(),
            row,
            compare,
        )
    }

    /// True if any indexed column of `row` holds NULL
    ///
    /// Rows with a NULL key never violate uniqueness.
    fn contains_null(&self, row: &dyn RowValues) -> bool {
        self.descriptor()
            .column_ordinals()
            .iter()
            .any(|&o| row.value_at(o).is_some_and(Value::is_null))
    }

    /// Order two rows by storage position only
    fn compare_keys(&self, row: &dyn RowValues, compare: &dyn RowValues) -> Ordering {
        row.key().cmp(&compare.key())
    }

    /// Error reported when a unique key is already taken
    fn duplicate_key_error(&self) -> Error {
        let descriptor = self.descriptor();
        Error::duplicate_key(
            descriptor.name.clone(),
            descriptor.relation.name.sql(),
            descriptor.column_list_sql(),
        )
    }

    /// `CREATE ... INDEX` statement recreating this path; scans have none
    fn create_statement(&self) -> Option<String> {
        let descriptor = self.descriptor();
        let mut sql = String::from("CREATE ");
        match descriptor.path_type {
            AccessPathType::Scan => return None,
            AccessPathType::Primary => sql.push_str("PRIMARY KEY"),
            other => {
                sql.push_str(other.sql());
                sql.push(' ');
                sql.push_str(&crate::core::quote_identifier(&descriptor.name));
            }
        }
        sql.push_str(" ON ");
        sql.push_str(&descriptor.relation.name.sql());
        sql.push('(');
        sql.push_str(&descriptor.column_list_sql());
        sql.push(')');
        Some(sql)
    }
}
