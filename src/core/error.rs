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

//! Error types for relpath
//!
//! A single error enum covers access paths, relations, views and the catalog.
//! It is `Clone` so a view can keep the failure that made it invalid and
//! raise it again later.

use thiserror::Error;

/// Result type alias for relpath operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Table errors
    // =========================================================================
    /// Table not found in the catalog
    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// Table already exists when trying to create
    #[error("table '{0}' already exists")]
    TableAlreadyExists(String),

    /// Row width does not match the relation
    #[error("table columns don't match, expected {expected}, got {got}")]
    TableColumnsNotMatch { expected: usize, got: usize },

    /// Relation cannot be dropped because other objects depend on it
    #[error("cannot drop '{name}' because '{dependent}' depends on it")]
    CannotDrop { name: String, dependent: String },

    // =========================================================================
    // Column errors
    // =========================================================================
    /// Column not found in a relation
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// Duplicate column name in a relation
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    /// Column ordinal outside the relation
    #[error("column index {index} out of bounds")]
    ColumnIndexOutOfBounds { index: usize },

    /// NULL stored into a NOT NULL column
    #[error("NULL not allowed for column '{0}'")]
    NullNotAllowed(String),

    // =========================================================================
    // Index errors
    // =========================================================================
    /// Index not found
    #[error("index '{0}' not found")]
    IndexNotFound(String),

    /// Index already exists
    #[error("index '{0}' already exists")]
    IndexAlreadyExists(String),

    /// Unique access path already holds the key
    #[error("duplicate key: {index} ON {table}({columns})")]
    DuplicateKey {
        index: String,
        table: String,
        columns: String,
    },

    /// Row with the given storage key is not present in the access path
    #[error("row {0} not found in index")]
    RowNotFound(i64),

    // =========================================================================
    // View errors
    // =========================================================================
    /// View already exists
    #[error("view '{0}' already exists")]
    ViewAlreadyExists(String),

    /// View not found
    #[error("view '{0}' not found")]
    ViewNotFound(String),

    /// View definition currently fails to compile
    #[error("view {view} is invalid: {message}")]
    ViewInvalid { view: String, message: String },

    /// Query text could not be compiled
    #[error("compile error: {0}")]
    Compile(String),

    // =========================================================================
    // Comparison errors
    // =========================================================================
    /// Cannot compare incompatible types
    #[error("cannot compare {left} with {right}")]
    IncomparableTypes { left: String, right: String },

    // =========================================================================
    // Other errors
    // =========================================================================
    /// Operation not supported by this relation or access path
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Internal error for broken invariants
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new TableColumnsNotMatch error
    pub fn table_columns_not_match(expected: usize, got: usize) -> Self {
        Error::TableColumnsNotMatch { expected, got }
    }

    /// Create a new CannotDrop error
    pub fn cannot_drop(name: impl Into<String>, dependent: impl Into<String>) -> Self {
        Error::CannotDrop {
            name: name.into(),
            dependent: dependent.into(),
        }
    }

    /// Create a new DuplicateKey error
    pub fn duplicate_key(
        index: impl Into<String>,
        table: impl Into<String>,
        columns: impl Into<String>,
    ) -> Self {
        Error::DuplicateKey {
            index: index.into(),
            table: table.into(),
            columns: columns.into(),
        }
    }

    /// Create a new ViewInvalid error
    pub fn view_invalid(view: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ViewInvalid {
            view: view.into(),
            message: message.into(),
        }
    }

    /// Create a new Compile error
    pub fn compile(message: impl Into<String>) -> Self {
        Error::Compile(message.into())
    }

    /// Create a new IncomparableTypes error
    pub fn incomparable(left: impl Into<String>, right: impl Into<String>) -> Self {
        Error::IncomparableTypes {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create a new NotSupported error
    pub fn not_supported(operation: impl Into<String>) -> Self {
        Error::NotSupported(operation.into())
    }

    /// Create a new Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::TableNotFound(_)
                | Error::ColumnNotFound(_)
                | Error::IndexNotFound(_)
                | Error::ViewNotFound(_)
                | Error::RowNotFound(_)
        )
    }

    /// Check if this is a constraint violation error
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Error::DuplicateKey { .. } | Error::NullNotAllowed(_))
    }

    /// Check if this error marks an operation a relation can never perform
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::NotSupported(_))
    }

    /// Message without the variant prefix, as stored for invalid views
    pub fn detail(&self) -> String {
        match self {
            Error::Compile(message) => message.clone(),
            Error::Internal { message } => message.clone(),
            other => other.to_string(),
        }
    }
}
