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

//! Base table
//!
//! A table owns its column set, a scan path holding the rows and any number
//! of secondary access paths. Every mutation goes through the table so that
//! all paths stay in step, and bumps the data modification id views report.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashSet;

use crate::core::{
    AccessPathType, Column, Error, QualifiedName, RelationId, RelationRef, Result, Row,
    RowValues, Value, ValueComparator,
};
use crate::optimizer::{cheapest, PlanChoice, PredicateMask};
use crate::storage::index::{HashAccessPath, OrderedAccessPath, ScanAccessPath};
use crate::storage::traits::{AccessPath, AccessPathDescriptor};

/// Structure backing a secondary access path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexKind {
    /// Sorted; supports ranges and first/last
    #[default]
    Ordered,

    /// Hashed; equality only
    Hash,
}

/// A base table
pub struct Table {
    id: RelationId,
    name: QualifiedName,
    columns: Arc<[Column]>,
    comparator: Arc<dyn ValueComparator>,

    /// Row storage, always the first candidate when planning
    scan: Arc<ScanAccessPath>,

    /// Secondary paths in creation order
    indexes: RwLock<Vec<Arc<dyn AccessPath>>>,

    next_key: AtomicI64,
    modification_id: AtomicU64,

    /// Views whose compiled query reads this table
    dependents: RwLock<FxHashSet<RelationId>>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("columns", &self.columns.len())
            .field("indexes", &self.indexes.read().len())
            .finish_non_exhaustive()
    }
}

impl Table {
    /// Create an empty table; column ordinals are assigned by position
    pub fn new(
        id: RelationId,
        name: QualifiedName,
        columns: Vec<Column>,
        comparator: Arc<dyn ValueComparator>,
    ) -> Result<Self> {
        let mut seen = FxHashSet::default();
        for column in &columns {
            if !seen.insert(column.name.to_uppercase()) {
                return Err(Error::DuplicateColumn(column.name.clone()));
            }
        }
        let columns: Arc<[Column]> = Arc::from(crate::core::assign_ordinals(columns));
        let relation = RelationRef::new(id, name.clone());
        let scan = ScanAccessPath::new(AccessPathDescriptor::scan(
            format!("{}_DATA", name.name),
            relation,
            Arc::clone(&columns),
            Arc::clone(&comparator),
        ))?;

        Ok(Self {
            id,
            name,
            columns,
            comparator,
            scan: Arc::new(scan),
            indexes: RwLock::new(Vec::new()),
            next_key: AtomicI64::new(0),
            modification_id: AtomicU64::new(0),
            dependents: RwLock::new(FxHashSet::default()),
        })
    }

    pub fn id(&self) -> RelationId {
        self.id
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Non-owning reference for access path descriptors
    pub fn relation_ref(&self) -> RelationRef {
        RelationRef::new(self.id, self.name.clone())
    }

    pub fn columns(&self) -> &Arc<[Column]> {
        &self.columns
    }

    /// Ordinal of a column, matched case-insensitively
    pub fn column_ordinal(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Insert a row into every access path
    ///
    /// The row gets the next storage key. If any path refuses it, the paths
    /// that already took it are rolled back and the error is returned.
    pub fn add_row(&self, values: Vec<Value>) -> Result<Row> {
        if values.len() != self.columns.len() {
            return Err(Error::table_columns_not_match(
                self.columns.len(),
                values.len(),
            ));
        }
        if let Some(column) = self
            .columns
            .iter()
            .zip(&values)
            .find(|(c, v)| !c.nullable && v.is_null())
            .map(|(c, _)| c)
        {
            return Err(Error::NullNotAllowed(column.name.clone()));
        }

        let indexes = self.indexes.read();
        let row = Row::with_key(self.next_key.fetch_add(1, Ordering::Relaxed), values);
        self.scan.add(&row)?;
        for (i, index) in indexes.iter().enumerate() {
            if let Err(err) = index.add(&row) {
                for done in indexes[..i].iter().rev() {
                    if let Err(undo) = done.remove(&row) {
                        tracing::warn!(
                            target: "relpath::table",
                            table = %self.name,
                            index = done.name(),
                            error = %undo,
                            "rollback of row insert failed"
                        );
                    }
                }
                self.scan.remove(&row)?;
                return Err(err);
            }
        }
        self.touch();
        Ok(row)
    }

    /// Remove the row at a storage key from every access path
    ///
    /// If a path refuses, the paths that already dropped the row get it back
    /// and the row stays in storage.
    pub fn remove_row(&self, key: i64) -> Result<Row> {
        let indexes = self.indexes.read();
        let row = self.scan.get(key).ok_or(Error::RowNotFound(key))?;
        for (i, index) in indexes.iter().enumerate() {
            if let Err(err) = index.remove(&row) {
                for done in indexes[..i].iter().rev() {
                    if let Err(undo) = done.add(&row) {
                        tracing::warn!(
                            target: "relpath::table",
                            table = %self.name,
                            index = done.name(),
                            error = %undo,
                            "rollback of row remove failed"
                        );
                    }
                }
                return Err(err);
            }
        }
        self.scan.remove(&row)?;
        self.touch();
        Ok(row)
    }

    /// Remove every row
    pub fn truncate(&self) -> Result<()> {
        let indexes = self.indexes.read();
        for index in indexes.iter() {
            index.truncate()?;
        }
        self.scan.truncate()?;
        self.touch();
        tracing::debug!(target: "relpath::table", table = %self.name, "truncated");
        Ok(())
    }

    pub fn row_count(&self) -> u64 {
        self.scan.row_count()
    }

    /// Every row in storage order
    pub fn rows(&self) -> Vec<Row> {
        self.scan.rows()
    }

    /// Row at a storage key
    pub fn row(&self, key: i64) -> Option<Row> {
        self.scan.get(key)
    }

    /// The full scan over the row storage
    pub fn scan_path(&self) -> Arc<dyn AccessPath> {
        Arc::clone(&self.scan) as Arc<dyn AccessPath>
    }

    /// Create a secondary access path over the named columns
    ///
    /// Existing rows are loaded into the new path; a unique path over
    /// duplicate data is refused and not attached.
    pub fn add_index(
        &self,
        name: &str,
        columns: &[&str],
        path_type: AccessPathType,
        kind: IndexKind,
    ) -> Result<Arc<dyn AccessPath>> {
        if path_type.is_scan() {
            return Err(Error::InvalidArgument(
                "the scan path is created with the table".to_string(),
            ));
        }
        let ordinals = columns
            .iter()
            .map(|c| self.column_ordinal(c))
            .collect::<Result<Vec<_>>>()?;

        let mut indexes = self.indexes.write();
        if self.scan.name().eq_ignore_ascii_case(name)
            || indexes.iter().any(|i| i.name().eq_ignore_ascii_case(name))
        {
            return Err(Error::IndexAlreadyExists(name.to_string()));
        }
        if path_type.is_primary_key()
            && indexes
                .iter()
                .any(|i| i.descriptor().path_type.is_primary_key())
        {
            return Err(Error::IndexAlreadyExists(format!(
                "primary key of {}",
                self.name
            )));
        }

        let descriptor = AccessPathDescriptor::new(
            name,
            self.relation_ref(),
            path_type,
            Arc::clone(&self.columns),
            &ordinals,
            Arc::clone(&self.comparator),
        )?;
        let path: Arc<dyn AccessPath> = match kind {
            IndexKind::Ordered => Arc::new(OrderedAccessPath::new(descriptor)?),
            IndexKind::Hash => Arc::new(HashAccessPath::new(descriptor)?),
        };
        for row in self.scan.rows() {
            path.add(&row)?;
        }
        indexes.push(Arc::clone(&path));

        tracing::info!(
            target: "relpath::table",
            table = %self.name,
            index = name,
            kind = ?kind,
            rows = path.row_count(),
            "index created"
        );
        Ok(path)
    }

    /// Drop a secondary access path
    pub fn remove_index(&self, name: &str) -> Result<()> {
        let mut indexes = self.indexes.write();
        let position = indexes
            .iter()
            .position(|i| i.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::IndexNotFound(name.to_string()))?;
        let index = indexes.remove(position);
        index.close()?;
        tracing::info!(target: "relpath::table", table = %self.name, index = name, "index dropped");
        Ok(())
    }

    /// Secondary path by name
    pub fn index(&self, name: &str) -> Option<Arc<dyn AccessPath>> {
        self.indexes
            .read()
            .iter()
            .find(|i| i.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Scan path followed by every secondary path
    pub fn access_paths(&self) -> Vec<Arc<dyn AccessPath>> {
        let indexes = self.indexes.read();
        let mut paths = Vec::with_capacity(indexes.len() + 1);
        paths.push(self.scan_path());
        paths.extend(indexes.iter().cloned());
        paths
    }

    /// Cheapest access path for the given predicates
    ///
    /// The scan is evaluated first and wins ties.
    pub fn best_plan(&self, masks: &[PredicateMask]) -> Result<PlanChoice> {
        let choice = cheapest(self.access_paths(), masks)?
            .ok_or_else(|| Error::internal(format!("{} has no access path", self.name)))?;
        tracing::debug!(
            target: "relpath::table",
            table = %self.name,
            path = choice.path.name(),
            cost = choice.cost,
            "plan chosen"
        );
        Ok(choice)
    }

    /// Recompute column selectivity from the stored rows
    ///
    /// Selectivity becomes `distinct * 100 / rows`, at least 1. An empty
    /// table keeps its current statistics. Returns the rows examined.
    pub fn analyze(&self) -> u64 {
        let rows = self.scan.rows();
        if rows.is_empty() {
            return 0;
        }
        let total = rows.len() as u64;
        for column in self.columns.iter() {
            let distinct = rows
                .iter()
                .filter_map(|row| row.value_at(column.ordinal))
                .collect::<FxHashSet<&Value>>()
                .len() as u64;
            let selectivity = (distinct * 100 / total).clamp(1, 100);
            column.set_selectivity(selectivity as u8);
        }
        tracing::debug!(target: "relpath::table", table = %self.name, rows = total, "analyzed");
        total
    }

    /// Id bumped by every mutation of the table's data
    pub fn max_data_modification_id(&self) -> u64 {
        self.modification_id.load(Ordering::Acquire)
    }

    fn touch(&self) {
        self.modification_id.fetch_add(1, Ordering::AcqRel);
    }

    /// Record that a view reads this table
    pub fn register_dependent_view(&self, view: RelationId) {
        self.dependents.write().insert(view);
    }

    /// Forget a dependent view; returns true if it was registered
    pub fn unregister_dependent_view(&self, view: RelationId) -> bool {
        self.dependents.write().remove(&view)
    }

    /// Dependent views, ordered by id
    pub fn dependent_views(&self) -> Vec<RelationId> {
        let mut views: Vec<RelationId> = self.dependents.read().iter().copied().collect();
        views.sort_unstable();
        views
    }

    /// `CREATE TABLE` statement recreating the table's columns
    pub fn create_statement(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let mut sql = format!("{} {}", c.sql(), c.data_type);
                if !c.nullable {
                    sql.push_str(" NOT NULL");
                }
                sql
            })
            .collect::<Vec<_>>()
            .join(",\n    ");
        format!("CREATE TABLE {}(\n    {}\n)", self.name.sql(), columns)
    }

    /// Release every access path
    pub fn close(&self) -> Result<()> {
        for path in self.access_paths() {
            path.close()?;
        }
        Ok(())
    }
}
