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

//! Access path over a view's compiled query
//!
//! A fresh path is built for every plan request and carries the predicate
//! masks it was planned for. Reading through it runs the compiled query.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::core::{Error, Result, Row, SearchRow, Value};
use crate::optimizer::PredicateMask;
use crate::storage::traits::{AccessPath, AccessPathDescriptor, CompiledQuery, Cursor};

/// What the path reads from
#[derive(Debug, Clone)]
pub enum ViewSource {
    /// The view's compiled query
    Query(Arc<dyn CompiledQuery>),

    /// Placeholder for a recursive view whose self-reference is still
    /// unresolved; yields no rows at a fixed cost
    Recursive { cost: f64 },
}

/// Synthetic access path of a view
pub struct ViewAccessPath {
    descriptor: AccessPathDescriptor,
    source: ViewSource,
    masks: SmallVec<[PredicateMask; 8]>,
}

impl std::fmt::Debug for ViewAccessPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewAccessPath")
            .field("descriptor", &self.descriptor)
            .field("source", &self.source)
            .field("masks", &self.masks)
            .finish()
    }
}

impl ViewAccessPath {
    pub fn new(descriptor: AccessPathDescriptor, source: ViewSource, masks: &[PredicateMask]) -> Self {
        Self {
            descriptor,
            source,
            masks: SmallVec::from_slice(masks),
        }
    }

    /// Masks the path was planned for
    pub fn masks(&self) -> &[PredicateMask] {
        &self.masks
    }

    /// Compiled query behind the path, if bound
    pub fn query(&self) -> Option<&Arc<dyn CompiledQuery>> {
        match &self.source {
            ViewSource::Query(query) => Some(query),
            ViewSource::Recursive { .. } => None,
        }
    }

    fn unsupported(&self, operation: &str) -> Error {
        Error::not_supported(format!(
            "{} on view {}",
            operation, self.descriptor.relation.name
        ))
    }
}

impl AccessPath for ViewAccessPath {
    fn descriptor(&self) -> &AccessPathDescriptor {
        &self.descriptor
    }

    fn add(&self, _row: &Row) -> Result<()> {
        Err(self.unsupported("add row"))
    }

    fn remove(&self, _row: &Row) -> Result<()> {
        Err(self.unsupported("remove row"))
    }

    fn find(&self, first: Option<&SearchRow>, last: Option<&SearchRow>) -> Result<Cursor> {
        match &self.source {
            ViewSource::Query(query) => query.execute(first, last),
            ViewSource::Recursive { .. } => Ok(Cursor::empty()),
        }
    }

    fn can_get_first_or_last(&self, _first: bool) -> bool {
        false
    }

    fn find_first_or_last(&self, _first: bool) -> Result<Value> {
        Err(self.unsupported("first/last lookup"))
    }

    fn cost(&self, masks: &[PredicateMask]) -> Result<f64> {
        match &self.source {
            ViewSource::Query(query) => query.cost(masks),
            ViewSource::Recursive { cost } => Ok(*cost),
        }
    }

    fn truncate(&self) -> Result<()> {
        Err(self.unsupported("truncate"))
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn row_count(&self) -> u64 {
        match &self.source {
            ViewSource::Query(query) => query.row_count_estimate(),
            ViewSource::Recursive { .. } => 0,
        }
    }

    fn is_recursive(&self) -> bool {
        matches!(self.source, ViewSource::Recursive { .. })
    }

    fn create_statement(&self) -> Option<String> {
        None
    }
}
