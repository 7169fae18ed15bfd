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

//! # relpath - Access paths, cost model and view relations
//!
//! relpath is the access-path layer of a relational engine. It defines how a
//! relation's rows can be reached (ordered index, hash index, full scan, or
//! a view's compiled query), prices every path with one shared cost model,
//! and keeps views compiled against the tables they read.
//!
//! ## Key Features
//!
//! - **Access Path Contract** - Lookup, range scan, insert, remove and costing behind one trait
//! - **Shared Cost Model** - Selectivity-driven range-index cost, comparable across paths
//! - **Tolerant Views** - A view whose query does not compile is kept, not rejected
//! - **Recursive Views** - Placeholder columns until the self-reference binds
//! - **Id-Based Catalog** - Dependency edges by relation id, removed on both sides together
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use relpath::core::{AccessPathType, Column, DataType, QualifiedName, RelationId, TypeSafeComparator, Value};
//! use relpath::optimizer::PredicateMask;
//! use relpath::storage::{AccessPath, IndexKind, Table};
//!
//! let users = Table::new(
//!     RelationId(1),
//!     QualifiedName::new("PUBLIC", "USERS"),
//!     vec![
//!         Column::new("ID", DataType::Integer).not_null(),
//!         Column::new("NAME", DataType::Text),
//!     ],
//!     Arc::new(TypeSafeComparator),
//! )
//! .unwrap();
//! users
//!     .add_index("PK_USERS", &["ID"], AccessPathType::Primary, IndexKind::Ordered)
//!     .unwrap();
//! users.add_row(vec![Value::integer(1), Value::text("alice")]).unwrap();
//! users.add_row(vec![Value::integer(2), Value::text("bob")]).unwrap();
//!
//! // WHERE ID = ? is a single-row lookup on the primary key
//! let plan = users.best_plan(&[PredicateMask::EQUALITY]).unwrap();
//! assert_eq!(plan.path.name(), "PK_USERS");
//! assert_eq!(plan.cost, 3.0);
//! ```
//!
//! ## Modules
//!
//! - [`core`] - Core types ([`DataType`], [`Value`], [`Row`], [`Column`], [`Error`])
//! - [`optimizer`] - Predicate masks, the cost model and plan choice
//! - [`storage`] - Access paths, tables, views and the catalog

pub mod core;
pub mod optimizer;
pub mod storage;

// Re-export commonly used types at crate root
pub use core::{
    AccessPathType, Column, DataType, Error, QualifiedName, RelationId, RelationRef, Result,
    Row, RowValues, SearchRow, TypeSafeComparator, Value, ValueComparator,
};

pub use optimizer::{cost_range_index, PlanChoice, PredicateMask, COST_ROW_OFFSET};

pub use storage::{
    AccessPath, AccessPathDescriptor, Catalog, CompiledQuery, Config, Cursor, IndexKind,
    OutputColumn, QueryCompiler, Relation, Table, ViewAccessPath, ViewDefinition, ViewRelation,
    ViewState,
};
