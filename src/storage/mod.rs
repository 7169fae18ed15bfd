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

//! Storage module for relpath
//!
//! This module contains the relations and their access paths:
//! - Storage traits (AccessPath, Cursor, QueryCompiler)
//! - Access path implementations for base tables
//! - Base tables, views and the catalog that owns them
//! - Configuration types

pub mod catalog;
pub mod config;
pub mod index;
pub mod relation;
pub mod table;
pub mod traits;
pub mod view;

pub use catalog::Catalog;
pub use config::Config;
pub use index::{HashAccessPath, OrderedAccessPath, ScanAccessPath};
pub use relation::Relation;
pub use table::{IndexKind, Table};
pub use traits::{
    compare_rows_by, AccessPath, AccessPathDescriptor, CompiledQuery, Cursor, OutputColumn,
    QueryCompiler, RowSource,
};
pub use view::{ViewAccessPath, ViewDefinition, ViewRelation, ViewSource, ViewState};
