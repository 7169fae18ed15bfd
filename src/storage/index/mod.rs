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

//! Access path implementations for base tables
//!
//! - [`OrderedAccessPath`] - Sorted index for range lookups and first/last
//! - [`HashAccessPath`] - Hash index for equality lookups
//! - [`ScanAccessPath`] - Row storage read as a full scan

pub mod hash;
pub mod ordered;
pub mod scan;

pub use hash::HashAccessPath;
pub use ordered::OrderedAccessPath;
pub use scan::ScanAccessPath;
