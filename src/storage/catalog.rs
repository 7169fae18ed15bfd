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

//! Catalog of tables and views
//!
//! Relations live in an arena keyed by [`RelationId`]. Everything that points
//! at another relation (access path descriptors, view dependencies, a table's
//! dependent views) holds an id and resolves it here, so dropping a relation
//! never leaves a dangling reference behind.
//!
//! Name lookup is case-insensitive. Lock order is names, then relations; no
//! lock is held while a view compiles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use super::config::Config;
use super::relation::Relation;
use super::table::Table;
use super::traits::QueryCompiler;
use super::view::{ViewDefinition, ViewRelation};
use crate::core::{
    Column, Error, QualifiedName, RelationId, Result, TypeSafeComparator, ValueComparator,
};

/// Registry of every relation of a database
pub struct Catalog {
    config: Config,
    comparator: Arc<dyn ValueComparator>,
    compiler: Arc<dyn QueryCompiler>,

    next_id: AtomicU64,

    /// Arena of relations by id
    relations: RwLock<FxHashMap<RelationId, Relation>>,

    /// Lowercase name -> id
    names: RwLock<FxHashMap<String, RelationId>>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("config", &self.config)
            .field("relations", &self.relations.read().len())
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Create an empty catalog
    pub fn new(
        config: Config,
        comparator: Arc<dyn ValueComparator>,
        compiler: Arc<dyn QueryCompiler>,
    ) -> Self {
        Self {
            config,
            comparator,
            compiler,
            next_id: AtomicU64::new(1),
            relations: RwLock::new(FxHashMap::default()),
            names: RwLock::new(FxHashMap::default()),
        }
    }

    /// Catalog with the default configuration and comparator
    pub fn with_compiler(compiler: Arc<dyn QueryCompiler>) -> Self {
        Self::new(Config::default(), Arc::new(TypeSafeComparator), compiler)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn comparator(&self) -> &Arc<dyn ValueComparator> {
        &self.comparator
    }

    pub fn compiler(&self) -> &Arc<dyn QueryCompiler> {
        &self.compiler
    }

    fn allocate_id(&self) -> RelationId {
        RelationId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn qualified(&self, name: &str) -> QualifiedName {
        QualifiedName::new(self.config.schema.clone(), name)
    }

    /// Create a base table
    ///
    /// Every column starts with the configured default selectivity.
    pub fn create_table(&self, name: &str, columns: Vec<Column>) -> Result<Arc<Table>> {
        let key = name.to_lowercase();
        let mut names = self.names.write();
        if names.contains_key(&key) {
            return Err(Error::TableAlreadyExists(name.to_string()));
        }
        for column in &columns {
            column.set_selectivity(self.config.default_selectivity);
        }
        let id = self.allocate_id();
        let table = Arc::new(Table::new(
            id,
            self.qualified(name),
            columns,
            Arc::clone(&self.comparator),
        )?);
        names.insert(key, id);
        self.relations
            .write()
            .insert(id, Relation::Table(Arc::clone(&table)));
        drop(names);

        tracing::info!(target: "relpath::catalog", table = %table.name(), id = %id, "table created");
        Ok(table)
    }

    /// Drop a base table
    ///
    /// Refused while views depend on the table, unless `cascade` is set, in
    /// which case the dependent views are dropped first.
    pub fn drop_table(&self, name: &str, cascade: bool) -> Result<()> {
        let table = self.table(name)?;
        let dependents = table.dependent_views();
        if !dependents.is_empty() {
            if !cascade {
                return Err(self.cannot_drop(table.name(), dependents[0]));
            }
            let mut dropping = FxHashSet::default();
            for view_id in dependents {
                if let Some(Relation::View(view)) = self.relation_by_id(view_id) {
                    self.drop_view_cascade(&view, &mut dropping)?;
                }
            }
        }

        self.remove(table.id(), name);
        table.close()?;
        tracing::info!(target: "relpath::catalog", table = %table.name(), cascade, "table dropped");
        Ok(())
    }

    /// Create a view
    ///
    /// The view is created even when its query does not compile; it is then
    /// stored in the invalid state.
    pub fn create_view(&self, definition: ViewDefinition) -> Result<Arc<ViewRelation>> {
        let key = definition.lookup_key();
        if self.names.read().contains_key(&key) {
            return Err(Error::ViewAlreadyExists(definition.name));
        }

        let id = self.allocate_id();
        let view = Arc::new(ViewRelation::new(id, definition, self));

        let mut names = self.names.write();
        if names.contains_key(&key) {
            drop(names);
            view.drop_view(self)?;
            return Err(Error::ViewAlreadyExists(view.name().name.clone()));
        }
        names.insert(key, id);
        self.relations
            .write()
            .insert(id, Relation::View(Arc::clone(&view)));
        drop(names);

        tracing::info!(
            target: "relpath::catalog",
            view = %view.name(),
            id = %id,
            invalid = view.is_invalid(),
            "view created"
        );
        Ok(view)
    }

    /// Drop a view and its dependency edges
    ///
    /// Refused while other views select from it, unless `cascade` is set, in
    /// which case those views are dropped first.
    pub fn drop_view(&self, name: &str, cascade: bool) -> Result<()> {
        let view = self.view(name)?;
        if cascade {
            return self.drop_view_cascade(&view, &mut FxHashSet::default());
        }
        if let Some(&dependent) = view.dependent_views().first() {
            return Err(self.cannot_drop(view.name(), dependent));
        }
        self.drop_view_unchecked(&view)
    }

    /// Drop `view` after every view reading it
    ///
    /// `dropping` holds the views already on the way out, so a cycle of
    /// views ends instead of recursing forever.
    fn drop_view_cascade(
        &self,
        view: &Arc<ViewRelation>,
        dropping: &mut FxHashSet<RelationId>,
    ) -> Result<()> {
        if !dropping.insert(view.id()) {
            return Ok(());
        }
        for dependent_id in view.dependent_views() {
            if let Some(Relation::View(dependent)) = self.relation_by_id(dependent_id) {
                self.drop_view_cascade(&dependent, dropping)?;
            }
        }
        if self.relation_by_id(view.id()).is_none() {
            return Ok(());
        }
        self.drop_view_unchecked(view)
    }

    fn drop_view_unchecked(&self, view: &ViewRelation) -> Result<()> {
        view.drop_view(self)?;
        self.remove(view.id(), &view.name().name);
        tracing::info!(target: "relpath::catalog", view = %view.name(), "view dropped");
        Ok(())
    }

    fn cannot_drop(&self, name: &QualifiedName, dependent: RelationId) -> Error {
        let dependent = self
            .relation_by_id(dependent)
            .map(|r| r.name().to_string())
            .unwrap_or_else(|| dependent.to_string());
        Error::cannot_drop(name.to_string(), dependent)
    }

    /// Recompile one view
    pub fn recompile_view(&self, name: &str) -> Result<Arc<ViewRelation>> {
        let view = self.view(name)?;
        view.recompile(self)?;
        Ok(view)
    }

    /// Recompile every view that reads the named table or view
    ///
    /// Returns the number of views recompiled.
    pub fn recompile_dependents(&self, name: &str) -> Result<usize> {
        let relation = self
            .relation(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        let mut count = 0;
        for view_id in relation.dependent_views() {
            if let Some(Relation::View(view)) = self.relation_by_id(view_id) {
                view.recompile(self)?;
                count += 1;
            }
        }
        tracing::debug!(
            target: "relpath::catalog",
            relation = %relation.name(),
            views = count,
            "dependents recompiled"
        );
        Ok(count)
    }

    /// Recompile invalid views until no more of them can be fixed
    ///
    /// Views may reference each other in any order, so this keeps making
    /// passes while a pass repairs at least one view. Returns the number of
    /// views that became usable.
    pub fn recompile_invalid_views(&self) -> Result<usize> {
        let mut repaired = 0;
        loop {
            let invalid: Vec<Arc<ViewRelation>> = self
                .views()
                .into_iter()
                .filter(|v| v.is_invalid())
                .collect();
            let mut progress = 0;
            for view in &invalid {
                view.recompile(self)?;
                if !view.is_invalid() {
                    progress += 1;
                }
            }
            repaired += progress;
            if progress == 0 {
                return Ok(repaired);
            }
        }
    }

    fn remove(&self, id: RelationId, name: &str) {
        let mut names = self.names.write();
        names.remove(&name.to_lowercase());
        self.relations.write().remove(&id);
    }

    /// Relation by name, table or view
    pub fn relation(&self, name: &str) -> Option<Relation> {
        let id = *self.names.read().get(&name.to_lowercase())?;
        self.relation_by_id(id)
    }

    pub fn relation_by_id(&self, id: RelationId) -> Option<Relation> {
        self.relations.read().get(&id).cloned()
    }

    /// Base table by name
    pub fn table(&self, name: &str) -> Result<Arc<Table>> {
        self.relation(name)
            .and_then(|r| r.as_table().cloned())
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    pub fn table_by_id(&self, id: RelationId) -> Option<Arc<Table>> {
        self.relation_by_id(id).and_then(|r| r.as_table().cloned())
    }

    /// View by name
    pub fn view(&self, name: &str) -> Result<Arc<ViewRelation>> {
        self.relation(name)
            .and_then(|r| r.as_view().cloned())
            .ok_or_else(|| Error::ViewNotFound(name.to_string()))
    }

    /// Every view, ordered by id
    pub fn views(&self) -> Vec<Arc<ViewRelation>> {
        let mut views: Vec<Arc<ViewRelation>> = self
            .relations
            .read()
            .values()
            .filter_map(|r| r.as_view().cloned())
            .collect();
        views.sort_by_key(|v| v.id());
        views
    }

    /// Names of every relation, sorted
    pub fn relation_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .relations
            .read()
            .values()
            .map(|r| r.name().name.clone())
            .collect();
        names.sort();
        names
    }
}
