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

//! Cursor returned by `AccessPath::find`

use std::fmt;
use std::iter::FusedIterator;

use crate::core::{Result, Row};

/// Producer of rows behind a [`Cursor`]
///
/// Implementations may hold resources of the storage engine (snapshots,
/// latches, remote cursors). `close` is called exactly once by the owning
/// cursor.
pub trait RowSource: Send {
    /// Next row, `None` once exhausted
    fn next_row(&mut self) -> Option<Result<Row>>;

    /// Release whatever the source holds
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Finite, forward-only, single-pass sequence of rows
///
/// The cursor owns its source. The source is closed when the rows run out,
/// when the first error is returned, on [`Cursor::close`], or when the cursor
/// is dropped half-way, whichever comes first.
///
/// # Example
///
/// ```ignore
/// for row in path.find(Some(&first), Some(&last))? {
///     let row = row?;
///     // ...
/// }
/// ```
pub struct Cursor {
    source: Option<Box<dyn RowSource>>,
}

impl Cursor {
    /// Wrap a row source
    pub fn new(source: impl RowSource + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
        }
    }

    /// A cursor with no rows
    pub fn empty() -> Self {
        Self { source: None }
    }

    /// A cursor over rows already in memory
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::new(VecSource {
            rows: rows.into_iter(),
        })
    }

    /// Stop early and release the source
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    /// Returns true once the source has been released
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    fn release(&mut self) -> Result<()> {
        match self.source.take() {
            Some(mut source) => source.close(),
            None => Ok(()),
        }
    }
}

impl Iterator for Cursor {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.source.as_mut()?;
        match source.next_row() {
            Some(Ok(row)) => Some(Ok(row)),
            Some(Err(err)) => {
                // the row error wins over a close error
                let _ = self.release();
                Some(Err(err))
            }
            None => self.release().err().map(Err),
        }
    }
}

impl FusedIterator for Cursor {}

impl Drop for Cursor {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            tracing::warn!(target: "relpath::cursor", error = %err, "failed to close cursor");
        }
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Rows already materialized
struct VecSource {
    rows: std::vec::IntoIter<Row>,
}

impl RowSource for VecSource {
    fn next_row(&mut self) -> Option<Result<Row>> {
        self.rows.next().map(Ok)
    }
}
