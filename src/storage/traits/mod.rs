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

//! Storage traits for relpath
//!
//! This module defines the interfaces of the storage layer:
//!
//! - [`AccessPath`] - Index, scan and view access (find, cost, maintenance)
//! - [`Cursor`] - Single-pass row iteration with close-on-drop
//! - [`QueryCompiler`] / [`CompiledQuery`] - The query compiler views consume
//!

pub mod access_path;
pub mod compiler;
pub mod cursor;

pub use access_path::{compare_rows_by, AccessPath, AccessPathDescriptor};
pub use compiler::{CompiledQuery, OutputColumn, QueryCompiler};
pub use cursor::{Cursor, RowSource};
