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

//! Catalog configuration
//!

use crate::core::{DataType, DEFAULT_SELECTIVITY};

/// Configuration for a [`Catalog`](crate::storage::Catalog)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Schema every relation is created in
    /// Default: "PUBLIC"
    pub schema: String,

    /// Selectivity given to new table columns (0-100)
    /// Default: 50
    pub default_selectivity: u8,

    /// Type of the placeholder columns of a recursive view still being bound
    /// Default: Text
    pub recursive_column_type: DataType,

    /// Precision of those placeholder columns
    /// Default: 255
    pub recursive_column_precision: u64,

    /// Cost reported for a recursive view still being bound
    /// Default: 1000.0
    pub recursive_view_cost: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: "PUBLIC".to_string(),
            default_selectivity: DEFAULT_SELECTIVITY,
            recursive_column_type: DataType::Text,
            recursive_column_precision: 255,
            recursive_view_cost: 1000.0,
        }
    }
}

impl Config {
    /// Creates a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the schema name
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Builder method to set the default column selectivity, clamped to 100
    pub fn with_default_selectivity(mut self, selectivity: u8) -> Self {
        self.default_selectivity = selectivity.min(100);
        self
    }

    /// Builder method to set the recursive placeholder column type
    pub fn with_recursive_column(mut self, data_type: DataType, precision: u64) -> Self {
        self.recursive_column_type = data_type;
        self.recursive_column_precision = precision;
        self
    }

    /// Builder method to set the cost of a recursive view still being bound
    pub fn with_recursive_view_cost(mut self, cost: f64) -> Self {
        self.recursive_view_cost = cost;
        self
    }
}
