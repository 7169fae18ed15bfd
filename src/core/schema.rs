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

//! Schema types: relation identity and column definitions

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use super::types::DataType;

/// Selectivity assumed for a column nobody has analyzed
pub const DEFAULT_SELECTIVITY: u8 = 50;

/// Catalog-wide identifier of a table or view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationId(pub u64);

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for RelationId {
    fn from(value: u64) -> Self {
        RelationId(value)
    }
}

/// Quote an identifier for generated SQL
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal for generated SQL
pub fn quote_string(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Schema-qualified relation name
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub schema: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Quoted `"SCHEMA"."NAME"` form
    pub fn sql(&self) -> String {
        format!(
            "{}.{}",
            quote_identifier(&self.schema),
            quote_identifier(&self.name)
        )
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Non-owning reference from an access path to the relation that owns it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationRef {
    pub id: RelationId,
    pub name: QualifiedName,
}

impl RelationRef {
    pub fn new(id: RelationId, name: QualifiedName) -> Self {
        Self { id, name }
    }
}

/// A column of a table or view
///
/// Everything but the selectivity statistic is fixed once the column is
/// attached to a relation. Selectivity is refreshed by `ANALYZE`-style
/// statistics collection while planners read it, so it is atomic.
#[derive(Debug)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Declared type
    pub data_type: DataType,

    /// Declared precision
    pub precision: u64,

    /// Declared scale
    pub scale: u32,

    /// Position within the owning relation
    pub ordinal: usize,

    /// Whether NULL is allowed
    pub nullable: bool,

    /// Percentage (0-100) of rows expected to hold distinct values
    selectivity: AtomicU8,
}

impl Column {
    /// Create a nullable column with the type's default precision
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            precision: data_type.default_precision(),
            scale: 0,
            ordinal: 0,
            nullable: true,
            selectivity: AtomicU8::new(DEFAULT_SELECTIVITY),
        }
    }

    /// Set precision and scale
    pub fn with_precision(mut self, precision: u64, scale: u32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    /// Mark the column NOT NULL
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Attach the column at an ordinal of its relation
    pub fn at(mut self, ordinal: usize) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// Initial selectivity
    pub fn with_selectivity(self, selectivity: u8) -> Self {
        self.set_selectivity(selectivity);
        self
    }

    /// Current selectivity (0-100)
    pub fn selectivity(&self) -> u8 {
        self.selectivity.load(Ordering::Relaxed)
    }

    /// Update selectivity, clamped to 0-100
    pub fn set_selectivity(&self, selectivity: u8) {
        self.selectivity
            .store(selectivity.min(100), Ordering::Relaxed);
    }

    /// Quoted column name
    pub fn sql(&self) -> String {
        quote_identifier(&self.name)
    }
}

impl Clone for Column {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            data_type: self.data_type,
            precision: self.precision,
            scale: self.scale,
            ordinal: self.ordinal,
            nullable: self.nullable,
            selectivity: AtomicU8::new(self.selectivity()),
        }
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.data_type == other.data_type
            && self.precision == other.precision
            && self.scale == other.scale
            && self.ordinal == other.ordinal
            && self.nullable == other.nullable
            && self.selectivity() == other.selectivity()
    }
}

impl Eq for Column {}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if !self.nullable {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}

/// Give each column its position in the slice
pub fn assign_ordinals(columns: Vec<Column>) -> Vec<Column> {
    columns
        .into_iter()
        .enumerate()
        .map(|(i, c)| c.at(i))
        .collect()
}
