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

//! Cost model for access paths
//!
//! Every access path of every relation is costed with the same integer
//! formula, so the numbers are comparable across implementations:
//!
//! 1. The row count is padded with [`COST_ROW_OFFSET`], the base price of
//!    touching row storage at all. With no usable predicate that padded
//!    count is the cost (a full scan).
//! 2. Indexed columns are walked in declared order. Equality predicates
//!    stack: their selectivities combine as a union of independent
//!    probabilities, `total = 100 - (100 - total) * (100 - sel) / 100`.
//!    A unique path whose last column is pinned by equality is a single-row
//!    lookup.
//! 3. A range, an open start (`>`/`>=`) or an open end (`<`/`<=`) ends the
//!    walk with a fixed fraction of the rows, as does the first column with
//!    no predicate at all.
//!
//! Plans are tuned against this exact arithmetic, including the integer
//! truncation. Do not "improve" it.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::core::Column;

/// Base cost of touching row storage, added to every row count
pub const COST_ROW_OFFSET: u64 = 1000;

/// Default price of one positioned lookup
pub const DEFAULT_LOOKUP_COST: u64 = 2;

/// Predicate shapes a query applies to one column
///
/// Masks are indexed by column ordinal across the whole relation.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PredicateMask(u8);

impl PredicateMask {
    /// No predicate
    pub const NONE: PredicateMask = PredicateMask(0);

    /// `column = value`
    pub const EQUALITY: PredicateMask = PredicateMask(1);

    /// Lower bound: `column > value` or `column >= value`
    pub const START: PredicateMask = PredicateMask(2);

    /// Upper bound: `column < value` or `column <= value`
    pub const END: PredicateMask = PredicateMask(4);

    /// Bounded on both sides
    pub const RANGE: PredicateMask = PredicateMask(2 | 4);

    /// Raw bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones
    pub const fn from_bits(bits: u8) -> Self {
        PredicateMask(bits & 0b111)
    }

    /// Returns true if every bit of `other` is set
    pub const fn contains(self, other: PredicateMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn is_equality(self) -> bool {
        self.contains(Self::EQUALITY)
    }

    pub const fn is_range(self) -> bool {
        self.contains(Self::RANGE)
    }

    pub const fn has_start(self) -> bool {
        self.contains(Self::START)
    }

    pub const fn has_end(self) -> bool {
        self.contains(Self::END)
    }
}

impl BitOr for PredicateMask {
    type Output = PredicateMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        PredicateMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for PredicateMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for PredicateMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "NONE");
        }
        let mut parts = Vec::with_capacity(3);
        if self.is_equality() {
            parts.push("EQUALITY");
        }
        if self.has_start() {
            parts.push("START");
        }
        if self.has_end() {
            parts.push("END");
        }
        write!(f, "{}", parts.join("|"))
    }
}

/// Mask for a relation column, NONE when the caller supplied fewer masks
#[inline]
pub fn mask_at(masks: &[PredicateMask], ordinal: usize) -> PredicateMask {
    masks.get(ordinal).copied().unwrap_or_default()
}

/// Range-index cost of a path over `columns`
///
/// `lookup_cost` is the path's price for one positioned lookup; it receives
/// the padded row count.
pub fn cost_range_index<'a, I, F>(
    columns: I,
    unique: bool,
    masks: &[PredicateMask],
    row_count: u64,
    lookup_cost: F,
) -> u64
where
    I: IntoIterator<Item = &'a Column>,
    I::IntoIter: ExactSizeIterator,
    F: Fn(u64) -> u64,
{
    let row_count = row_count.saturating_add(COST_ROW_OFFSET);
    let mut cost = row_count;
    let mut total_selectivity: u64 = 0;

    let columns = columns.into_iter();
    let last = columns.len().saturating_sub(1);

    for (i, column) in columns.enumerate() {
        let mask = mask_at(masks, column.ordinal);
        if mask.is_equality() {
            if i == last && unique {
                cost = lookup_cost(row_count) + 1;
                break;
            }
            let selectivity = u64::from(column.selectivity());
            total_selectivity = 100 - ((100 - total_selectivity) * (100 - selectivity) / 100);
            let distinct_rows = (row_count.saturating_mul(total_selectivity) / 100).max(1);
            let rows_selected = (row_count / distinct_rows).max(1);
            cost = lookup_cost(row_count) + rows_selected;
        } else if mask.is_range() {
            cost = lookup_cost(row_count) + row_count / 4;
            break;
        } else if mask.has_start() {
            cost = lookup_cost(row_count) + row_count / 3;
            break;
        } else if mask.has_end() {
            cost = row_count / 3;
            break;
        } else {
            break;
        }
    }
    cost
}
