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

//! View definition: the parts of a view that survive recompilation

use crate::core::Value;

/// View definition storing the query that defines the view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDefinition {
    /// View name (preserves case)
    pub name: String,
    /// The query text that defines the view
    pub query: String,
    /// Parameters bound into the query on every compilation
    pub params: Vec<Value>,
    /// Explicit column names; empty means use the query's aliases
    pub column_names: Vec<String>,
    /// The query refers to the view itself
    pub recursive: bool,
    pub comment: Option<String>,
}

impl ViewDefinition {
    /// Create a new view definition
    pub fn new(name: &str, query: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            query: query.into(),
            params: Vec::new(),
            column_names: Vec::new(),
            recursive: false,
            comment: None,
        }
    }

    /// Name the view's columns explicitly
    pub fn with_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = params;
        self
    }

    /// Mark the view as referring to itself
    pub fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Lowercase name for case-insensitive lookup
    pub fn lookup_key(&self) -> String {
        self.name.to_lowercase()
    }
}
