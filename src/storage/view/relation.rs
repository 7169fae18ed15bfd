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

//! View relation
//!
//! A view's columns, plan and cost all come from compiling its query. The
//! result of a compilation is published as one [`ViewState`] behind an
//! `Arc`, so a reader sees the column set and the compiled query of the
//! same compilation.
//!
//! A query that fails to compile does not fail the view: it is kept in the
//! `Invalid` state with no columns, and the failure is raised only when
//! something tries to read through the view. A recursive view with explicit
//! column names gets placeholder columns instead, until a later
//! recompilation binds the self-reference.
//!
//! Views that select from this view register on it the same way they
//! register on a base table, so a view cannot be dropped from under
//! another one.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashSet;

use super::access_path::{ViewAccessPath, ViewSource};
use super::definition::ViewDefinition;
use crate::core::{
    quote_string, Column, Error, QualifiedName, RelationId, RelationRef, Result, Value,
    ValueComparator,
};
use crate::optimizer::{PlanChoice, PredicateMask};
use crate::storage::catalog::Catalog;
use crate::storage::config::Config;
use crate::storage::traits::{AccessPath, AccessPathDescriptor, CompiledQuery};

/// Derived state of a view, replaced as a whole on recompilation
#[derive(Debug)]
pub enum ViewState {
    /// Query compiled; dependencies registered on `tables`
    Valid {
        columns: Arc<[Column]>,
        query: Arc<dyn CompiledQuery>,
        tables: Vec<RelationId>,
    },

    /// Query failed to compile; the view has no columns
    Invalid { failure: Error },

    /// Recursive view whose self-reference is not bound yet
    RecursivePending { columns: Arc<[Column]> },

    /// Removed from the catalog
    Dropped,
}

impl ViewState {
    /// Columns of the view; empty when invalid or dropped
    pub fn columns(&self) -> Arc<[Column]> {
        match self {
            ViewState::Valid { columns, .. } | ViewState::RecursivePending { columns } => {
                Arc::clone(columns)
            }
            ViewState::Invalid { .. } | ViewState::Dropped => Arc::from(Vec::<Column>::new()),
        }
    }

    /// Compiled query, when there is one
    pub fn query(&self) -> Option<&Arc<dyn CompiledQuery>> {
        match self {
            ViewState::Valid { query, .. } => Some(query),
            _ => None,
        }
    }

    /// Relations the view is registered with
    pub fn tables(&self) -> &[RelationId] {
        match self {
            ViewState::Valid { tables, .. } => tables,
            _ => &[],
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ViewState::Valid { .. })
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ViewState::Invalid { .. })
    }

    pub fn is_recursive_pending(&self) -> bool {
        matches!(self, ViewState::RecursivePending { .. })
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, ViewState::Dropped)
    }

    fn label(&self) -> &'static str {
        match self {
            ViewState::Valid { .. } => "valid",
            ViewState::Invalid { .. } => "invalid",
            ViewState::RecursivePending { .. } => "recursive pending",
            ViewState::Dropped => "dropped",
        }
    }
}

/// A relation computed from a query
pub struct ViewRelation {
    id: RelationId,
    name: QualifiedName,
    definition: ViewDefinition,
    config: Config,
    comparator: Arc<dyn ValueComparator>,
    state: RwLock<Arc<ViewState>>,

    /// Views selecting from this one
    dependents: RwLock<FxHashSet<RelationId>>,
}

impl std::fmt::Debug for ViewRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRelation")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state.read().label())
            .finish_non_exhaustive()
    }
}

impl ViewRelation {
    /// Create a view and compile its query against `catalog`
    ///
    /// Compilation failures are kept in the view's state, never returned.
    pub fn new(id: RelationId, definition: ViewDefinition, catalog: &Catalog) -> Self {
        let config = catalog.config().clone();
        let view = Self {
            id,
            name: QualifiedName::new(config.schema.clone(), definition.name.clone()),
            definition,
            config,
            comparator: Arc::clone(catalog.comparator()),
            state: RwLock::new(Arc::new(ViewState::Invalid {
                failure: Error::internal("view not compiled yet"),
            })),
            dependents: RwLock::new(FxHashSet::default()),
        };
        let state = view.compile(catalog);
        view.publish(catalog, state);
        view
    }

    pub fn id(&self) -> RelationId {
        self.id
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn definition(&self) -> &ViewDefinition {
        &self.definition
    }

    pub fn comment(&self) -> Option<&str> {
        self.definition.comment.as_deref()
    }

    /// Consistent snapshot of the derived state
    pub fn state(&self) -> Arc<ViewState> {
        Arc::clone(&self.state.read())
    }

    /// Current column set
    pub fn columns(&self) -> Arc<[Column]> {
        self.state().columns()
    }

    /// Relations the view currently depends on
    pub fn tables(&self) -> Vec<RelationId> {
        self.state().tables().to_vec()
    }

    /// Record a view that selects from this one
    pub fn register_dependent_view(&self, view: RelationId) {
        self.dependents.write().insert(view);
    }

    /// Forget a dependent view; returns true if it was registered
    pub fn unregister_dependent_view(&self, view: RelationId) -> bool {
        self.dependents.write().remove(&view)
    }

    /// Views selecting from this one, ordered by id
    pub fn dependent_views(&self) -> Vec<RelationId> {
        let mut views: Vec<RelationId> = self.dependents.read().iter().copied().collect();
        views.sort();
        views
    }

    /// The last compilation failed
    pub fn is_invalid(&self) -> bool {
        self.state().is_invalid()
    }

    /// Declared recursive
    pub fn is_recursive(&self) -> bool {
        self.definition.recursive
    }

    /// Stored compilation failure, if the view is invalid
    pub fn failure(&self) -> Option<Error> {
        match &*self.state() {
            ViewState::Invalid { failure } => Some(failure.clone()),
            _ => None,
        }
    }

    /// Compile the query again and replace the derived state
    ///
    /// The view leaves every relation it was registered with before the new
    /// compilation registers it again, so a changed dependency set leaves no
    /// stale edges. Fails only on a dropped view; a compile failure moves the
    /// view to the invalid state.
    pub fn recompile(&self, catalog: &Catalog) -> Result<()> {
        let current = self.state();
        if current.is_dropped() {
            return Err(self.dropped_error());
        }
        self.unregister(catalog, current.tables());
        let state = self.compile(catalog);
        self.publish(catalog, state);
        tracing::info!(
            target: "relpath::view",
            view = %self.name,
            state = self.state.read().label(),
            "view recompiled"
        );
        Ok(())
    }

    /// Detach the view from every relation and release its query
    pub fn drop_view(&self, catalog: &Catalog) -> Result<()> {
        let mut state = self.state.write();
        if state.is_dropped() {
            return Err(self.dropped_error());
        }
        self.unregister(catalog, state.tables());
        *state = Arc::new(ViewState::Dropped);
        tracing::info!(target: "relpath::view", view = %self.name, "view dropped");
        Ok(())
    }

    /// Cheapest way to read the view for the given predicates
    ///
    /// Each call wraps the compiled query in a fresh access path carrying
    /// `masks`; the cost is the query's own estimate.
    pub fn best_plan(&self, masks: &[PredicateMask]) -> Result<PlanChoice> {
        let state = self.state();
        let source = match &*state {
            ViewState::Valid { query, .. } => ViewSource::Query(Arc::clone(query)),
            ViewState::RecursivePending { .. } => ViewSource::Recursive {
                cost: self.config.recursive_view_cost,
            },
            ViewState::Invalid { failure } => {
                return Err(Error::view_invalid(self.name.sql(), failure.detail()))
            }
            ViewState::Dropped => return Err(self.dropped_error()),
        };
        let path = ViewAccessPath::new(
            AccessPathDescriptor::scan(
                format!("{}_VIEW", self.name.name),
                RelationRef::new(self.id, self.name.clone()),
                state.columns(),
                Arc::clone(&self.comparator),
            ),
            source,
            masks,
        );
        let cost = path.cost(masks)?;
        tracing::debug!(
            target: "relpath::view",
            view = %self.name,
            cost,
            recursive = path.is_recursive(),
            "view plan"
        );
        Ok(PlanChoice::new(cost, Arc::new(path)))
    }

    /// Access path reading the whole view
    pub fn scan_path(&self) -> Result<Arc<dyn AccessPath>> {
        Ok(self.best_plan(&[])?.path)
    }

    /// Highest data modification id among the relations the view reads
    ///
    /// A view still waiting on its self-reference cannot tell, so it reports
    /// `u64::MAX`.
    pub fn max_data_modification_id(&self) -> Result<u64> {
        match &*self.state() {
            ViewState::Valid { query, .. } => Ok(query.max_data_modification_id()),
            ViewState::RecursivePending { .. } => Ok(u64::MAX),
            ViewState::Invalid { failure } => Err(Error::internal(format!(
                "modification id of invalid view {}: {}",
                self.name,
                failure.detail()
            ))),
            ViewState::Dropped => Err(self.dropped_error()),
        }
    }

    pub fn add_row(&self, _values: Vec<Value>) -> Result<()> {
        Err(self.unsupported("add row"))
    }

    pub fn remove_row(&self, _key: i64) -> Result<()> {
        Err(self.unsupported("remove row"))
    }

    pub fn truncate(&self) -> Result<()> {
        Err(self.unsupported("truncate"))
    }

    pub fn row_count(&self) -> Result<u64> {
        Err(self.unsupported("row count"))
    }

    pub fn add_index(&self, _name: &str, _columns: &[&str]) -> Result<()> {
        Err(self.unsupported("add index"))
    }

    pub fn remove_index(&self, _name: &str) -> Result<()> {
        Err(self.unsupported("remove index"))
    }

    pub fn check_support_alter(&self) -> Result<()> {
        Err(self.unsupported("alter"))
    }

    /// `CREATE FORCE VIEW` statement recreating the view
    pub fn create_statement(&self) -> Result<String> {
        self.ensure_live()?;
        let mut sql = format!("CREATE FORCE VIEW {}", self.name.sql());
        if let Some(comment) = &self.definition.comment {
            sql.push_str(" COMMENT ");
            sql.push_str(&quote_string(comment));
        }
        let columns = self.columns();
        if !columns.is_empty() {
            sql.push('(');
            sql.push_str(
                &columns
                    .iter()
                    .map(Column::sql)
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            sql.push(')');
        }
        sql.push_str(" AS\n");
        sql.push_str(&self.definition.query);
        Ok(sql)
    }

    pub fn drop_statement(&self) -> Result<String> {
        self.ensure_live()?;
        Ok(format!("DROP VIEW IF EXISTS {}", self.name.sql()))
    }

    fn compile(&self, catalog: &Catalog) -> ViewState {
        let compiled = catalog
            .compiler()
            .compile(catalog, &self.definition.query, &self.definition.params);
        match compiled {
            Ok(query) => ViewState::Valid {
                columns: self.derive_columns(query.as_ref()),
                tables: query.tables().to_vec(),
                query,
            },
            Err(failure)
                if self.definition.recursive && !self.definition.column_names.is_empty() =>
            {
                tracing::debug!(
                    target: "relpath::view",
                    view = %self.name,
                    error = %failure,
                    "recursive view bound with placeholder columns"
                );
                ViewState::RecursivePending {
                    columns: self.placeholder_columns(),
                }
            }
            Err(failure) => ViewState::Invalid { failure },
        }
    }

    /// Explicit name at each position, else the output alias
    fn derive_columns(&self, query: &dyn CompiledQuery) -> Arc<[Column]> {
        query
            .columns()
            .iter()
            .enumerate()
            .map(|(i, output)| {
                let name = self
                    .definition
                    .column_names
                    .get(i)
                    .unwrap_or(&output.alias);
                Column::new(name.clone(), output.data_type)
                    .with_precision(output.precision, output.scale)
                    .at(i)
            })
            .collect()
    }

    fn placeholder_columns(&self) -> Arc<[Column]> {
        self.definition
            .column_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Column::new(name.clone(), self.config.recursive_column_type)
                    .with_precision(self.config.recursive_column_precision, 0)
                    .at(i)
            })
            .collect()
    }

    /// Register with the new state's relations, then make it visible
    ///
    /// A recursive view reading itself is not its own dependent.
    fn publish(&self, catalog: &Catalog, state: ViewState) {
        for &relation_id in state.tables().iter().filter(|&&id| id != self.id) {
            match catalog.relation_by_id(relation_id) {
                Some(relation) => relation.register_dependent_view(self.id),
                None => tracing::debug!(
                    target: "relpath::view",
                    view = %self.name,
                    relation = %relation_id,
                    "dependency not in catalog"
                ),
            }
        }
        match &state {
            ViewState::Invalid { failure } => tracing::warn!(
                target: "relpath::view",
                view = %self.name,
                error = %failure,
                "view stored as invalid"
            ),
            other => tracing::debug!(
                target: "relpath::view",
                view = %self.name,
                state = other.label(),
                columns = other.columns().len(),
                "view compiled"
            ),
        }
        *self.state.write() = Arc::new(state);
    }

    fn unregister(&self, catalog: &Catalog, tables: &[RelationId]) {
        for &relation_id in tables {
            if let Some(relation) = catalog.relation_by_id(relation_id) {
                relation.unregister_dependent_view(self.id);
            }
        }
    }

    fn ensure_live(&self) -> Result<()> {
        if self.state.read().is_dropped() {
            return Err(self.dropped_error());
        }
        Ok(())
    }

    /// A dropped view reports the drop before refusing the operation
    fn unsupported(&self, operation: &str) -> Error {
        match self.ensure_live() {
            Err(dropped) => dropped,
            Ok(()) => Error::not_supported(format!("{} on view {}", operation, self.name)),
        }
    }

    fn dropped_error(&self) -> Error {
        Error::internal(format!("view {} has been dropped", self.name))
    }
}
