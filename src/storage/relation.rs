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

//! Handle to any relation of the catalog

use std::sync::Arc;

use super::table::Table;
use super::view::ViewRelation;
use crate::core::{Column, QualifiedName, RelationId, Result};
use crate::optimizer::{PlanChoice, PredicateMask};
use crate::storage::traits::AccessPath;

/// A base table or a view
#[derive(Debug, Clone)]
pub enum Relation {
    Table(Arc<Table>),
    View(Arc<ViewRelation>),
}

impl Relation {
    pub fn id(&self) -> RelationId {
        match self {
            Relation::Table(table) => table.id(),
            Relation::View(view) => view.id(),
        }
    }

    pub fn name(&self) -> &QualifiedName {
        match self {
            Relation::Table(table) => table.name(),
            Relation::View(view) => view.name(),
        }
    }

    /// Current column set
    pub fn columns(&self) -> Arc<[Column]> {
        match self {
            Relation::Table(table) => Arc::clone(table.columns()),
            Relation::View(view) => view.columns(),
        }
    }

    /// Cheapest access path for the given predicates
    pub fn best_plan(&self, masks: &[PredicateMask]) -> Result<PlanChoice> {
        match self {
            Relation::Table(table) => table.best_plan(masks),
            Relation::View(view) => view.best_plan(masks),
        }
    }

    /// Access path reading every row
    pub fn scan_path(&self) -> Result<Arc<dyn AccessPath>> {
        match self {
            Relation::Table(table) => Ok(table.scan_path()),
            Relation::View(view) => view.scan_path(),
        }
    }

    /// Data modification id the relation's readers see
    pub fn max_data_modification_id(&self) -> Result<u64> {
        match self {
            Relation::Table(table) => Ok(table.max_data_modification_id()),
            Relation::View(view) => view.max_data_modification_id(),
        }
    }

    /// Statement recreating the relation; fails for a dropped view
    pub fn create_statement(&self) -> Result<String> {
        match self {
            Relation::Table(table) => Ok(table.create_statement()),
            Relation::View(view) => view.create_statement(),
        }
    }

    /// Record a view that selects from this relation
    pub fn register_dependent_view(&self, view: RelationId) {
        match self {
            Relation::Table(table) => table.register_dependent_view(view),
            Relation::View(dependency) => dependency.register_dependent_view(view),
        }
    }

    /// Forget a dependent view; returns true if it was registered
    pub fn unregister_dependent_view(&self, view: RelationId) -> bool {
        match self {
            Relation::Table(table) => table.unregister_dependent_view(view),
            Relation::View(dependency) => dependency.unregister_dependent_view(view),
        }
    }

    /// Views selecting from this relation, ordered by id
    pub fn dependent_views(&self) -> Vec<RelationId> {
        match self {
            Relation::Table(table) => table.dependent_views(),
            Relation::View(view) => view.dependent_views(),
        }
    }

    pub fn as_table(&self) -> Option<&Arc<Table>> {
        match self {
            Relation::Table(table) => Some(table),
            Relation::View(_) => None,
        }
    }

    pub fn as_view(&self) -> Option<&Arc<ViewRelation>> {
        match self {
            Relation::View(view) => Some(view),
            Relation::Table(_) => None,
        }
    }

    pub fn is_view(&self) -> bool {
        matches!(self, Relation::View(_))
    }
}
