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

//! Access path costing and plan choice
//!
//! - `cost` - Predicate masks and the shared range-index cost formula
//! - `plan` - [`PlanChoice`] and picking the cheapest path of a relation

pub mod cost;
pub mod plan;

pub use cost::{
    cost_range_index, mask_at, PredicateMask, COST_ROW_OFFSET, DEFAULT_LOOKUP_COST,
};
pub use plan::{cheapest, PlanChoice};
