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

//! Views
//!
//! - [`ViewDefinition`] - Query text, parameters and declared column names
//! - [`ViewRelation`] - The view itself and its compile / recompile cycle
//! - [`ViewState`] - Derived state published by each compilation
//! - [`ViewAccessPath`] - Per-plan access path over the compiled query

pub mod access_path;
pub mod definition;
pub mod relation;

pub use access_path::{ViewAccessPath, ViewSource};
pub use definition::ViewDefinition;
pub use relation::{ViewRelation, ViewState};
