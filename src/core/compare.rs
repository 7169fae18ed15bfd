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

//! Value comparison capability
//!
//! Access paths never compare values on their own. They go through a
//! [`ValueComparator`] handed to them by the catalog, so the ordering used by
//! every index of a database is the same.

use std::cmp::Ordering;
use std::fmt;

use super::error::{Error, Result};
use super::value::Value;

/// Total order over two bound values
pub trait ValueComparator: Send + Sync + fmt::Debug {
    /// Compare two values
    ///
    /// NULL sorts before every other value and equals another NULL.
    fn compare(&self, a: &Value, b: &Value) -> Result<Ordering>;
}

/// Default comparator
///
/// Compares integers and floats numerically, values of the same type by their
/// natural order, and refuses to order values of unrelated types.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeSafeComparator;

impl ValueComparator for TypeSafeComparator {
    fn compare(&self, a: &Value, b: &Value) -> Result<Ordering> {
        match (a.is_null(), b.is_null()) {
            (true, true) => return Ok(Ordering::Equal),
            (true, false) => return Ok(Ordering::Less),
            (false, true) => return Ok(Ordering::Greater),
            (false, false) => {}
        }

        match (a, b) {
            (Value::Integer(x), Value::Integer(y)) => Ok(x.cmp(y)),
            (Value::Text(x), Value::Text(y)) => Ok(x.cmp(y)),
            (Value::Boolean(x), Value::Boolean(y)) => Ok(x.cmp(y)),
            (Value::Timestamp(x), Value::Timestamp(y)) => Ok(x.cmp(y)),
            _ => match (a.as_float64(), b.as_float64()) {
                (Some(x), Some(y)) => Ok(compare_floats(x, y)),
                _ => Err(Error::incomparable(
                    a.data_type().to_string(),
                    b.data_type().to_string(),
                )),
            },
        }
    }
}

/// NaN sorts after every number and equals itself
fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}
