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

//! Row types
//!
//! - [`Row`] - a stored row: every column bound, plus its storage key
//! - [`SearchRow`] - a search bound where any column may be left unbound
//!
//! Both implement [`RowValues`], which is what access paths compare.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use super::error::{Error, Result};
use super::value::Value;

/// Storage key of a row that has not been inserted yet
pub const UNASSIGNED_KEY: i64 = -1;

/// Read access shared by stored rows and search bounds
pub trait RowValues {
    /// Value at a relation column ordinal, `None` when the position is unbound
    fn value_at(&self, ordinal: usize) -> Option<&Value>;

    /// Storage position of the row
    fn key(&self) -> i64;
}

/// A stored row
///
/// Values live in an `Arc<[Value]>` so the same row can sit in every access
/// path of a table and be handed out by cursors without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    key: i64,
    values: Arc<[Value]>,
}

impl Row {
    /// Create a row that has no storage key yet
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            key: UNASSIGNED_KEY,
            values: Arc::from(values),
        }
    }

    /// Create a row at a known storage key
    pub fn with_key(key: i64, values: Vec<Value>) -> Self {
        Self {
            key,
            values: Arc::from(values),
        }
    }

    /// Same values, different storage key
    pub fn rekeyed(&self, key: i64) -> Self {
        Self {
            key,
            values: Arc::clone(&self.values),
        }
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at an ordinal
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// All values
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Keep only the given ordinals, in the given order
    pub fn project(&self, ordinals: &[usize]) -> Result<Row> {
        let mut values = Vec::with_capacity(ordinals.len());
        for &i in ordinals {
            let value = self
                .values
                .get(i)
                .ok_or(Error::ColumnIndexOutOfBounds { index: i })?;
            values.push(value.clone());
        }
        Ok(Row::with_key(self.key, values))
    }
}

impl RowValues for Row {
    #[inline]
    fn value_at(&self, ordinal: usize) -> Option<&Value> {
        self.values.get(ordinal)
    }

    #[inline]
    fn key(&self) -> i64 {
        self.key
    }
}

impl Index<usize> for Row {
    type Output = Value;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::from_values(values)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

/// A partially bound row used as a range bound for `find`
///
/// Unbound positions are `None`. A comparison against a search row stops at
/// the first unbound indexed column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchRow {
    key: i64,
    values: Vec<Option<Value>>,
}

impl SearchRow {
    /// Create a search row with every position unbound
    pub fn new(width: usize) -> Self {
        Self {
            key: UNASSIGNED_KEY,
            values: vec![None; width],
        }
    }

    /// Bind a position, growing the row if needed
    pub fn set(&mut self, ordinal: usize, value: Value) {
        if ordinal >= self.values.len() {
            self.values.resize(ordinal + 1, None);
        }
        self.values[ordinal] = Some(value);
    }

    /// Builder form of [`SearchRow::set`]
    pub fn with(mut self, ordinal: usize, value: impl Into<Value>) -> Self {
        self.set(ordinal, value.into());
        self
    }

    /// Set the storage key used for tie-breaking
    pub fn with_key(mut self, key: i64) -> Self {
        self.key = key;
        self
    }

    /// Number of positions, bound or not
    pub fn width(&self) -> usize {
        self.values.len()
    }
}

impl RowValues for SearchRow {
    #[inline]
    fn value_at(&self, ordinal: usize) -> Option<&Value> {
        self.values.get(ordinal).and_then(Option::as_ref)
    }

    #[inline]
    fn key(&self) -> i64 {
        self.key
    }
}

impl From<&Row> for SearchRow {
    fn from(row: &Row) -> Self {
        Self {
            key: row.key,
            values: row.values.iter().cloned().map(Some).collect(),
        }
    }
}

/// Macro for creating rows conveniently
#[macro_export]
macro_rules! row {
    () => {
        $crate::core::Row::from_values(Vec::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::core::Row::from_values(vec![$($crate::core::Value::from($value)),+])
    };
}
