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

//! Shared helpers for integration tests
//!
//! `SimpleCompiler` understands exactly one query shape:
//! `SELECT <col [AS alias], ... | *> FROM <relation>`, over base tables and
//! views that currently compile. `FlakyCompiler` fails a set number of
//! compilations before handing over to it.

#![allow(dead_code)]

use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use relpath::core::{
    DataType, Error, RelationId, Result, Row, SearchRow, TypeSafeComparator, Value,
};
use relpath::optimizer::{mask_at, PredicateMask};
use relpath::storage::{
    compare_rows_by, Catalog, CompiledQuery, Cursor, OutputColumn, QueryCompiler, Relation,
    Table,
};
use relpath::Column;

/// Compiler for `SELECT ... FROM <relation>`
#[derive(Debug, Default)]
pub struct SimpleCompiler {
    compilations: AtomicUsize,
}

impl SimpleCompiler {
    /// Number of compile calls so far
    pub fn compilations(&self) -> usize {
        self.compilations.load(AtomicOrdering::SeqCst)
    }
}

impl QueryCompiler for SimpleCompiler {
    fn compile(
        &self,
        catalog: &Catalog,
        sql: &str,
        _params: &[Value],
    ) -> Result<Arc<dyn CompiledQuery>> {
        self.compilations.fetch_add(1, AtomicOrdering::SeqCst);

        let sql = sql.trim();
        let upper = sql.to_uppercase();
        if !upper.starts_with("SELECT ") {
            return Err(Error::compile(format!("syntax error in {}", sql)));
        }
        let from = upper
            .find(" FROM ")
            .ok_or_else(|| Error::compile(format!("missing FROM in {}", sql)))?;
        let select_list = sql["SELECT ".len()..from].trim();
        let source_name = sql[from + " FROM ".len()..].trim();

        let relation = catalog
            .relation(source_name)
            .ok_or_else(|| Error::TableNotFound(source_name.to_string()))?;
        if let Relation::View(view) = &relation {
            if !view.state().is_valid() {
                return Err(Error::compile(format!("view {} is not usable", source_name)));
            }
        }
        let source_columns = relation.columns();

        let mut ordinals = Vec::new();
        let mut columns = Vec::new();
        if select_list == "*" {
            for column in source_columns.iter() {
                ordinals.push(column.ordinal);
                columns.push(output_of(column, &column.name));
            }
        } else {
            for item in select_list.split(',') {
                let item = item.trim();
                let (expr, alias) = match item.to_uppercase().find(" AS ") {
                    Some(at) => (item[..at].trim(), item[at + " AS ".len()..].trim()),
                    None => (item, item),
                };
                let column = source_columns
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(expr))
                    .ok_or_else(|| Error::ColumnNotFound(expr.to_string()))?;
                ordinals.push(column.ordinal);
                columns.push(output_of(column, alias));
            }
        }

        Ok(Arc::new(RelationQuery {
            tables: vec![relation.id()],
            relation,
            ordinals,
            columns,
        }))
    }
}

fn output_of(column: &Column, alias: &str) -> OutputColumn {
    OutputColumn::new(alias, column.data_type).with_precision(column.precision, column.scale)
}

/// Fails the first `failures` compilations, then compiles like `SimpleCompiler`
#[derive(Debug)]
pub struct FlakyCompiler {
    failures: AtomicUsize,
    inner: SimpleCompiler,
}

impl FlakyCompiler {
    pub fn new(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            inner: SimpleCompiler::default(),
        }
    }
}

impl QueryCompiler for FlakyCompiler {
    fn compile(
        &self,
        catalog: &Catalog,
        sql: &str,
        params: &[Value],
    ) -> Result<Arc<dyn CompiledQuery>> {
        let failing = self
            .failures
            .fetch_update(AtomicOrdering::SeqCst, AtomicOrdering::SeqCst, |n| {
                n.checked_sub(1)
            })
            .is_ok();
        if failing {
            return Err(Error::compile(format!("cannot compile {} yet", sql)));
        }
        self.inner.compile(catalog, sql, params)
    }
}

/// Projection of one relation
#[derive(Debug)]
pub struct RelationQuery {
    relation: Relation,
    ordinals: Vec<usize>,
    columns: Vec<OutputColumn>,
    tables: Vec<RelationId>,
}

impl CompiledQuery for RelationQuery {
    fn columns(&self) -> &[OutputColumn] {
        &self.columns
    }

    fn tables(&self) -> &[RelationId] {
        &self.tables
    }

    fn cost(&self, masks: &[PredicateMask]) -> Result<f64> {
        let mut source_masks = vec![PredicateMask::NONE; self.relation.columns().len()];
        for (position, &ordinal) in self.ordinals.iter().enumerate() {
            source_masks[ordinal] |= mask_at(masks, position);
        }
        Ok(self.relation.best_plan(&source_masks)?.cost)
    }

    fn row_count_estimate(&self) -> u64 {
        match &self.relation {
            Relation::Table(table) => table.row_count(),
            Relation::View(view) => view
                .state()
                .query()
                .map(|query| query.row_count_estimate())
                .unwrap_or(0),
        }
    }

    fn max_data_modification_id(&self) -> u64 {
        self.relation.max_data_modification_id().unwrap_or(u64::MAX)
    }

    fn execute(&self, first: Option<&SearchRow>, last: Option<&SearchRow>) -> Result<Cursor> {
        let positions: Vec<usize> = (0..self.ordinals.len()).collect();
        let mut rows = Vec::new();
        for row in self.relation.scan_path()?.find(None, None)? {
            let row = row?.project(&self.ordinals)?;
            if let Some(first) = first {
                if compare_rows_by(&TypeSafeComparator, &positions, &row, first)? == Ordering::Less {
                    continue;
                }
            }
            if let Some(last) = last {
                if compare_rows_by(&TypeSafeComparator, &positions, &row, last)? == Ordering::Greater
                {
                    continue;
                }
            }
            rows.push(row);
        }
        Ok(Cursor::from_rows(rows))
    }
}

/// Catalog backed by `SimpleCompiler`
pub fn catalog() -> Catalog {
    Catalog::with_compiler(Arc::new(SimpleCompiler::default()))
}

/// Catalog whose compiler fails the first `failures` compilations
pub fn flaky_catalog(failures: usize) -> Catalog {
    Catalog::with_compiler(Arc::new(FlakyCompiler::new(failures)))
}

/// Catalog plus a handle on its compiler
pub fn catalog_with_compiler() -> (Catalog, Arc<SimpleCompiler>) {
    let compiler = Arc::new(SimpleCompiler::default());
    let catalog = Catalog::with_compiler(Arc::clone(&compiler) as Arc<dyn QueryCompiler>);
    (catalog, compiler)
}

/// T(A INTEGER NOT NULL, B TEXT, C INTEGER)
pub fn create_t(catalog: &Catalog) -> Arc<Table> {
    catalog
        .create_table(
            "T",
            vec![
                Column::new("A", DataType::Integer).not_null(),
                Column::new("B", DataType::Text),
                Column::new("C", DataType::Integer),
            ],
        )
        .expect("Failed to create table T")
}

/// Insert `count` rows `(i % modulo, 'row<i>', i)`
pub fn fill_t(table: &Table, count: i64, modulo: i64) {
    for i in 0..count {
        table
            .add_row(vec![
                Value::integer(i % modulo),
                Value::text(format!("row{}", i)),
                Value::integer(i),
            ])
            .expect("Failed to insert row");
    }
}

/// Collect a cursor, failing the test on a row error
pub fn collect(cursor: Cursor) -> Vec<Row> {
    cursor
        .collect::<Result<Vec<_>>>()
        .expect("Failed to read cursor")
}
