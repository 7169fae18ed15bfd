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

//! Plan choice: a costed access path

use std::fmt;
use std::sync::Arc;

use crate::core::Result;
use crate::optimizer::cost::PredicateMask;
use crate::storage::traits::AccessPath;

/// A candidate access path and what it costs for one set of predicates
///
/// Produced fresh for every planning call; callers may cache it.
#[derive(Clone)]
pub struct PlanChoice {
    /// Estimated cost in cost-model units
    pub cost: f64,

    /// Path to read the relation through
    pub path: Arc<dyn AccessPath>,
}

impl PlanChoice {
    pub fn new(cost: f64, path: Arc<dyn AccessPath>) -> Self {
        Self { cost, path }
    }

    /// Cost `path` for `masks`
    pub fn evaluate(path: Arc<dyn AccessPath>, masks: &[PredicateMask]) -> Result<Self> {
        let cost = path.cost(masks)?;
        Ok(Self { cost, path })
    }

    /// Strictly cheaper; ties keep the earlier candidate
    pub fn is_cheaper_than(&self, other: &PlanChoice) -> bool {
        self.cost < other.cost
    }
}

impl fmt::Debug for PlanChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanChoice")
            .field("cost", &self.cost)
            .field("path", &self.path.descriptor().name)
            .finish()
    }
}

/// Cheapest of the given paths, the first one winning ties
pub fn cheapest<I>(paths: I, masks: &[PredicateMask]) -> Result<Option<PlanChoice>>
where
    I: IntoIterator<Item = Arc<dyn AccessPath>>,
{
    let mut best: Option<PlanChoice> = None;
    for path in paths {
        let candidate = PlanChoice::evaluate(path, masks)?;
        match &best {
            Some(current) if !candidate.is_cheaper_than(current) => {}
            _ => best = Some(candidate),
        }
    }
    Ok(best)
}
