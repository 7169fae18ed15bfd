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

//! Query compiler interface consumed by views
//!
//! The crate never parses SQL itself. A view hands its query text to the
//! [`QueryCompiler`] it was created with and keeps the resulting
//! [`CompiledQuery`] until the next recompilation.

use std::fmt;
use std::sync::Arc;

use super::cursor::Cursor;
use crate::core::{DataType, RelationId, Result, SearchRow, Value};
use crate::optimizer::PredicateMask;
use crate::storage::catalog::Catalog;

/// One output expression of a compiled query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumn {
    /// Alias, or the expression text when unaliased
    pub alias: String,
    pub data_type: DataType,
    pub precision: u64,
    pub scale: u32,
}

impl OutputColumn {
    /// Output column with the type's default precision
    pub fn new(alias: impl Into<String>, data_type: DataType) -> Self {
        Self {
            alias: alias.into(),
            data_type,
            precision: data_type.default_precision(),
            scale: 0,
        }
    }

    /// Set precision and scale
    pub fn with_precision(mut self, precision: u64, scale: u32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }
}

/// A query bound to the current catalog
pub trait CompiledQuery: Send + Sync + fmt::Debug {
    /// Output expressions, in select-list order
    fn columns(&self) -> &[OutputColumn];

    /// Relations the query reads from
    fn tables(&self) -> &[RelationId];

    /// Cost of running the query with predicates on its output columns
    ///
    /// Masks are indexed by output column position.
    fn cost(&self, masks: &[PredicateMask]) -> Result<f64>;

    /// Estimated number of result rows
    fn row_count_estimate(&self) -> u64;

    /// Highest data modification id among the relations read
    fn max_data_modification_id(&self) -> u64;

    /// Run the query, restricted to rows between the bounds
    ///
    /// Bounds are positioned by output column.
    fn execute(&self, first: Option<&SearchRow>, last: Option<&SearchRow>) -> Result<Cursor>;
}

/// Compiles query text against a catalog
pub trait QueryCompiler: Send + Sync {
    /// Bind `sql` with `params` to the relations currently in `catalog`
    fn compile(
        &self,
        catalog: &Catalog,
        sql: &str,
        params: &[Value],
    ) -> Result<Arc<dyn CompiledQuery>>;
}
