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

//! Core types and definitions
//!
//! - [`DataType`] - SQL data types
//! - [`AccessPathType`] - scan / primary / unique / non-unique
//! - [`Value`] - Runtime values with type information
//! - [`ValueComparator`] - The ordering every access path uses
//! - [`Row`], [`SearchRow`] - Stored rows and search bounds
//! - [`Column`], [`RelationId`], [`QualifiedName`] - Relation schema
//! - [`Error`] - Error type for all operations

pub mod compare;
pub mod error;
pub mod row;
pub mod schema;
pub mod types;
pub mod value;

pub use compare::{TypeSafeComparator, ValueComparator};
pub use error::{Error, Result};
pub use row::{Row, RowValues, SearchRow, UNASSIGNED_KEY};
pub use schema::{
    assign_ordinals, quote_identifier, quote_string, Column, QualifiedName, RelationId,
    RelationRef, DEFAULT_SELECTIVITY,
};
pub use types::{AccessPathType, DataType};
pub use value::Value;
