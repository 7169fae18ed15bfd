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

//! Integration tests for view relations
//!
//! Covers the compile / recompile / drop cycle, tolerant creation of views
//! whose query does not compile yet, recursive placeholders, dependency
//! bookkeeping on tables and views, and planning through a view.

mod common;

use common::{catalog, catalog_with_compiler, collect, create_t, fill_t, flaky_catalog};
use relpath::core::{AccessPathType, DataType, Error, SearchRow, Value};
use relpath::optimizer::PredicateMask;
use relpath::storage::{AccessPath, IndexKind, Relation, ViewDefinition};

#[test]
fn test_view_columns_from_query() {
    let catalog = catalog();
    let t = create_t(&catalog);

    let v = catalog
        .create_view(ViewDefinition::new("V", "SELECT A, B FROM T"))
        .expect("Failed to create view");

    assert!(!v.is_invalid());
    let columns = v.columns();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(columns[0].data_type, DataType::Integer);
    assert_eq!(columns[1].data_type, DataType::Text);
    assert_eq!(columns[1].ordinal, 1);

    assert_eq!(v.tables(), vec![t.id()]);
    assert_eq!(t.dependent_views(), vec![v.id()]);
}

#[test]
fn test_explicit_names_override_aliases() {
    let catalog = catalog();
    create_t(&catalog);

    let v = catalog
        .create_view(ViewDefinition::new("V", "SELECT A, B AS LABEL, C FROM T").with_columns(["X"]))
        .expect("Failed to create view");

    let names: Vec<String> = v.columns().iter().map(|c| c.name.clone()).collect();
    assert_eq!(names, vec!["X", "LABEL", "C"]);
}

#[test]
fn test_view_plan_with_equality_beats_full_scan() {
    let catalog = catalog();
    let t = create_t(&catalog);
    fill_t(&t, 1000, 500);
    t.add_index("IDX_T_A", &["A"], AccessPathType::NonUnique, IndexKind::Ordered)
        .expect("Failed to create index");
    assert_eq!(t.columns()[0].selectivity(), 50);

    let v = catalog
        .create_view(ViewDefinition::new("V", "SELECT A, B FROM T"))
        .expect("Failed to create view");

    let full_scan = t.best_plan(&[]).expect("Failed to plan table");
    assert_eq!(full_scan.cost, 2000.0);

    let plan = v
        .best_plan(&[PredicateMask::EQUALITY])
        .expect("Failed to plan view");
    assert!(plan.cost < full_scan.cost);
    assert_eq!(plan.cost, 4.0);
    assert!(!plan.path.is_recursive());

    let unfiltered = v.best_plan(&[]).expect("Failed to plan view");
    assert_eq!(unfiltered.cost, full_scan.cost);
}

#[test]
fn test_each_plan_gets_a_fresh_path() {
    let catalog = catalog();
    let t = create_t(&catalog);
    fill_t(&t, 10, 10);
    let v = catalog
        .create_view(ViewDefinition::new("V", "SELECT * FROM T"))
        .expect("Failed to create view");

    let a = v.best_plan(&[PredicateMask::EQUALITY]).unwrap();
    let b = v.best_plan(&[PredicateMask::START]).unwrap();
    assert!(!std::sync::Arc::ptr_eq(&a.path, &b.path));
    assert_eq!(a.path.row_count(), 10);
}

#[test]
fn test_forward_reference_then_recompile() {
    let catalog = catalog();

    let v = catalog
        .create_view(ViewDefinition::new("V", "SELECT A, B FROM T"))
        .expect("Creating a view over a missing table must not fail");
    assert!(v.is_invalid());
    assert!(v.columns().is_empty());
    assert!(v.tables().is_empty());
    assert_eq!(v.failure(), Some(Error::TableNotFound("T".to_string())));

    let err = v.best_plan(&[]).unwrap_err();
    assert_eq!(
        err,
        Error::view_invalid("\"PUBLIC\".\"V\"", "table 'T' not found")
    );
    assert!(matches!(v.scan_path(), Err(Error::ViewInvalid { .. })));
    assert!(matches!(
        v.max_data_modification_id(),
        Err(Error::Internal { .. })
    ));

    let t = create_t(&catalog);
    catalog.recompile_view("v").expect("Failed to recompile");

    assert!(!v.is_invalid());
    let names: Vec<String> = v.columns().iter().map(|c| c.name.clone()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(t.dependent_views(), vec![v.id()]);
    assert!(v.best_plan(&[]).is_ok());
}

#[test]
fn test_recompile_invalid_views_after_load() {
    let catalog = catalog();
    catalog
        .create_view(ViewDefinition::new("V1", "SELECT A FROM T"))
        .unwrap();
    catalog
        .create_view(ViewDefinition::new("V2", "SELECT B FROM T"))
        .unwrap();
    catalog
        .create_view(ViewDefinition::new("V3", "SELECT A FROM MISSING"))
        .unwrap();

    create_t(&catalog);
    assert_eq!(catalog.recompile_invalid_views().unwrap(), 2);
    assert!(!catalog.view("V1").unwrap().is_invalid());
    assert!(!catalog.view("V2").unwrap().is_invalid());
    assert!(catalog.view("V3").unwrap().is_invalid());
}

#[test]
fn test_recursive_view_gets_placeholder_columns() {
    let catalog = catalog();

    let v = catalog
        .create_view(
            ViewDefinition::new("TREE", "SELECT ID, PARENT_ID FROM TREE")
                .with_columns(["ID", "PARENT_ID"])
                .recursive(),
        )
        .expect("Failed to create recursive view");

    assert!(!v.is_invalid());
    assert!(v.state().is_recursive_pending());
    let columns = v.columns();
    assert_eq!(columns.len(), 2);
    for (i, column) in columns.iter().enumerate() {
        assert_eq!(column.data_type, DataType::Text);
        assert_eq!(column.precision, 255);
        assert_eq!(column.scale, 0);
        assert_eq!(column.ordinal, i);
    }
    assert_eq!(columns[1].name, "PARENT_ID");

    let plan = v.best_plan(&[PredicateMask::EQUALITY]).unwrap();
    assert!(plan.path.is_recursive());
    assert_eq!(plan.cost, 1000.0);
    assert!(collect(plan.path.find(None, None).unwrap()).is_empty());
    assert_eq!(v.max_data_modification_id().unwrap(), u64::MAX);

    // the self-reference still does not bind to a base table
    v.recompile(&catalog).unwrap();
    assert!(v.state().is_recursive_pending());
    assert_eq!(v.columns().len(), 2);
}

#[test]
fn test_recursive_without_names_is_invalid() {
    let catalog = catalog();
    let v = catalog
        .create_view(ViewDefinition::new("TREE", "SELECT ID FROM TREE").recursive())
        .unwrap();
    assert!(v.is_invalid());
    assert!(v.columns().is_empty());
}

#[test]
fn test_recompile_is_idempotent() {
    let (catalog, compiler) = catalog_with_compiler();
    let t = create_t(&catalog);
    let v = catalog
        .create_view(ViewDefinition::new("V", "SELECT C, A AS KEY FROM T").with_comment("ids"))
        .unwrap();

    let before = compiler.compilations();
    v.recompile(&catalog).unwrap();
    let first_columns = v.columns().to_vec();
    let first_sql = v.create_statement().unwrap();
    v.recompile(&catalog).unwrap();
    assert_eq!(compiler.compilations(), before + 2);

    assert_eq!(v.columns().to_vec(), first_columns);
    assert_eq!(v.create_statement().unwrap(), first_sql);
    assert_eq!(t.dependent_views(), vec![v.id()]);
}

#[test]
fn test_drop_view_clears_dependents() {
    let catalog = catalog();
    let t = create_t(&catalog);
    let v = catalog
        .create_view(ViewDefinition::new("V", "SELECT A FROM T"))
        .unwrap();
    let w = catalog
        .create_view(ViewDefinition::new("W", "SELECT B FROM T"))
        .unwrap();
    assert_eq!(t.dependent_views(), vec![v.id(), w.id()]);

    catalog.drop_view("V", false).expect("Failed to drop view");
    assert_eq!(t.dependent_views(), vec![w.id()]);
    assert!(matches!(catalog.view("V"), Err(Error::ViewNotFound(_))));

    // a handle kept past the drop is unusable
    assert!(v.state().is_dropped());
    assert!(v.columns().is_empty());
    assert!(matches!(v.best_plan(&[]), Err(Error::Internal { .. })));
    assert!(matches!(v.recompile(&catalog), Err(Error::Internal { .. })));
    assert!(matches!(v.drop_view(&catalog), Err(Error::Internal { .. })));
    assert!(matches!(
        v.max_data_modification_id(),
        Err(Error::Internal { .. })
    ));
}

#[test]
fn test_dropped_view_refuses_everything() {
    let catalog = catalog();
    create_t(&catalog);
    let v = catalog
        .create_view(ViewDefinition::new("V", "SELECT A FROM T"))
        .unwrap();
    let relation = catalog.relation("V").unwrap();
    catalog.drop_view("V", false).unwrap();

    assert!(matches!(v.create_statement(), Err(Error::Internal { .. })));
    assert!(matches!(v.drop_statement(), Err(Error::Internal { .. })));
    assert!(matches!(relation.create_statement(), Err(Error::Internal { .. })));

    // not "unsupported": the view no longer exists
    let refusals = [
        v.add_row(vec![Value::integer(1)]),
        v.remove_row(0),
        v.truncate(),
        v.row_count().map(|_| ()),
        v.add_index("IDX", &["A"]),
        v.remove_index("IDX"),
        v.check_support_alter(),
    ];
    for refusal in refusals {
        assert!(matches!(refusal, Err(Error::Internal { .. })), "{:?}", refusal);
    }
}

#[test]
fn test_view_over_view_dependencies() {
    let catalog = catalog();
    let t = create_t(&catalog);
    fill_t(&t, 6, 3);
    let v1 = catalog
        .create_view(ViewDefinition::new("V1", "SELECT A, C FROM T"))
        .unwrap();
    let v2 = catalog
        .create_view(ViewDefinition::new("V2", "SELECT C AS N FROM V1"))
        .unwrap();

    assert!(!v2.is_invalid());
    assert_eq!(v2.tables(), vec![v1.id()]);
    assert_eq!(v1.dependent_views(), vec![v2.id()]);
    assert_eq!(t.dependent_views(), vec![v1.id()]);
    let n: Vec<Value> = collect(v2.scan_path().unwrap().find(None, None).unwrap())
        .iter()
        .map(|r| r[0].clone())
        .collect();
    assert_eq!(n, (0..6).map(Value::integer).collect::<Vec<_>>());

    let err = catalog.drop_view("v1", false).unwrap_err();
    assert_eq!(err, Error::cannot_drop("PUBLIC.V1", "PUBLIC.V2"));
    assert!(!v1.state().is_dropped());
    assert_eq!(catalog.recompile_dependents("V1").unwrap(), 1);
    assert_eq!(v1.dependent_views(), vec![v2.id()]);

    catalog.drop_view("V1", true).expect("Failed to drop views");
    assert!(v1.state().is_dropped());
    assert!(v2.state().is_dropped());
    assert!(catalog.relation("V1").is_none());
    assert!(catalog.relation("V2").is_none());
    assert!(t.dependent_views().is_empty());
}

#[test]
fn test_drop_table_cascades_through_views() {
    let catalog = catalog();
    let t = create_t(&catalog);
    let v1 = catalog
        .create_view(ViewDefinition::new("V1", "SELECT A FROM T"))
        .unwrap();
    let v2 = catalog
        .create_view(ViewDefinition::new("V2", "SELECT A FROM V1"))
        .unwrap();

    // dropping the leaf is fine and releases its edge
    catalog.drop_view("V2", false).unwrap();
    assert!(v1.dependent_views().is_empty());
    assert!(v2.state().is_dropped());

    let v2 = catalog
        .create_view(ViewDefinition::new("V2", "SELECT A FROM V1"))
        .unwrap();
    catalog.drop_table("T", true).unwrap();
    assert!(v1.state().is_dropped());
    assert!(v2.state().is_dropped());
    assert!(t.dependent_views().is_empty());
    assert!(catalog.relation_names().is_empty());
}

#[test]
fn test_recursive_view_binds_on_recompile() {
    let catalog = flaky_catalog(1);
    let edges = catalog
        .create_table(
            "EDGES",
            vec![
                relpath::Column::new("ID", DataType::Integer).not_null(),
                relpath::Column::new("PARENT_ID", DataType::Integer),
            ],
        )
        .unwrap();
    edges
        .add_row(vec![Value::integer(1), Value::null(DataType::Integer)])
        .unwrap();

    let tree = catalog
        .create_view(
            ViewDefinition::new("TREE", "SELECT ID, PARENT_ID FROM EDGES")
                .with_columns(["ID", "PARENT_ID"])
                .recursive(),
        )
        .unwrap();
    assert!(tree.state().is_recursive_pending());
    assert!(edges.dependent_views().is_empty());
    assert_eq!(tree.columns()[0].data_type, DataType::Text);

    tree.recompile(&catalog).unwrap();
    assert!(tree.state().is_valid());
    let columns = tree.columns();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["ID", "PARENT_ID"]);
    assert_eq!(columns[0].data_type, DataType::Integer);
    assert_eq!(tree.tables(), vec![edges.id()]);
    assert_eq!(edges.dependent_views(), vec![tree.id()]);

    let plan = tree.best_plan(&[PredicateMask::EQUALITY]).unwrap();
    assert!(!plan.path.is_recursive());
    assert_eq!(collect(plan.path.find(None, None).unwrap()).len(), 1);
    assert_eq!(
        tree.max_data_modification_id().unwrap(),
        edges.max_data_modification_id()
    );
}

#[test]
fn test_drop_table_with_dependents() {
    let catalog = catalog();
    let t = create_t(&catalog);
    catalog
        .create_view(ViewDefinition::new("V", "SELECT A FROM T"))
        .unwrap();

    let err = catalog.drop_table("T", false).unwrap_err();
    assert_eq!(err, Error::cannot_drop("PUBLIC.T", "PUBLIC.V"));
    assert!(catalog.table("T").is_ok());

    catalog.drop_table("t", true).expect("Failed to drop table");
    assert!(catalog.relation("T").is_none());
    assert!(catalog.relation("V").is_none());
    assert!(t.dependent_views().is_empty());
    assert!(catalog.relation_names().is_empty());
}

#[test]
fn test_view_mutations_unsupported() {
    let catalog = catalog();
    create_t(&catalog);
    let v = catalog
        .create_view(ViewDefinition::new("V", "SELECT A FROM T"))
        .unwrap();

    assert!(v.add_row(vec![Value::integer(1)]).unwrap_err().is_unsupported());
    assert!(v.remove_row(0).unwrap_err().is_unsupported());
    assert!(v.truncate().unwrap_err().is_unsupported());
    assert!(v.row_count().unwrap_err().is_unsupported());
    assert!(v.add_index("IDX", &["A"]).unwrap_err().is_unsupported());
    assert!(v.remove_index("IDX").unwrap_err().is_unsupported());
    assert!(v.check_support_alter().unwrap_err().is_unsupported());

    let path = v.scan_path().unwrap();
    let row = relpath::Row::from_values(vec![Value::integer(1)]);
    assert!(path.add(&row).unwrap_err().is_unsupported());
    assert!(path.remove(&row).unwrap_err().is_unsupported());
    assert!(path.truncate().unwrap_err().is_unsupported());
    assert!(!path.can_get_first_or_last(true));
    assert!(path.find_first_or_last(true).unwrap_err().is_unsupported());
}

#[test]
fn test_find_reads_through_compiled_query() {
    let catalog = catalog();
    let t = create_t(&catalog);
    fill_t(&t, 10, 10);
    let v = catalog
        .create_view(ViewDefinition::new("V", "SELECT C, B FROM T"))
        .unwrap();

    let path = v.scan_path().unwrap();
    let rows = collect(path.find(None, None).unwrap());
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[3].values(), &[Value::integer(3), Value::text("row3")]);

    let first = SearchRow::new(2).with(0, 4i64);
    let last = SearchRow::new(2).with(0, 6i64);
    let c: Vec<Value> = collect(path.find(Some(&first), Some(&last)).unwrap())
        .iter()
        .map(|r| r[0].clone())
        .collect();
    assert_eq!(c, vec![Value::integer(4), Value::integer(5), Value::integer(6)]);
}

#[test]
fn test_create_and_drop_statements() {
    let catalog = catalog();
    create_t(&catalog);
    let v = catalog
        .create_view(ViewDefinition::new("V", "SELECT A, B FROM T").with_comment("it's"))
        .unwrap();
    assert_eq!(v.comment(), Some("it's"));
    assert_eq!(
        v.create_statement().unwrap(),
        "CREATE FORCE VIEW \"PUBLIC\".\"V\" COMMENT 'it''s'(\"A\", \"B\") AS\nSELECT A, B FROM T"
    );
    assert_eq!(
        v.drop_statement().unwrap(),
        "DROP VIEW IF EXISTS \"PUBLIC\".\"V\""
    );

    let broken = catalog
        .create_view(ViewDefinition::new("BROKEN", "SELECT A FROM NOWHERE"))
        .unwrap();
    assert_eq!(
        broken.create_statement().unwrap(),
        "CREATE FORCE VIEW \"PUBLIC\".\"BROKEN\" AS\nSELECT A FROM NOWHERE"
    );
}

#[test]
fn test_max_data_modification_id_follows_table() {
    let catalog = catalog();
    let t = create_t(&catalog);
    let v = catalog
        .create_view(ViewDefinition::new("V", "SELECT A FROM T"))
        .unwrap();

    let before = v.max_data_modification_id().unwrap();
    assert_eq!(before, t.max_data_modification_id());
    fill_t(&t, 3, 3);
    assert!(v.max_data_modification_id().unwrap() > before);
}

#[test]
fn test_name_conflicts() {
    let catalog = catalog();
    create_t(&catalog);
    assert!(matches!(
        catalog.create_view(ViewDefinition::new("t", "SELECT A FROM T")),
        Err(Error::ViewAlreadyExists(_))
    ));
    catalog
        .create_view(ViewDefinition::new("V", "SELECT A FROM T"))
        .unwrap();
    assert!(matches!(
        catalog.create_table("v", vec![relpath::Column::new("X", DataType::Integer)]),
        Err(Error::TableAlreadyExists(_))
    ));
    assert!(matches!(catalog.relation("v"), Some(Relation::View(_))));
    assert!(matches!(catalog.table("V"), Err(Error::TableNotFound(_))));
}

#[test]
fn test_recompile_dependents() {
    let (catalog, compiler) = catalog_with_compiler();
    create_t(&catalog);
    for name in ["V1", "V2"] {
        catalog
            .create_view(ViewDefinition::new(name, "SELECT A FROM T"))
            .unwrap();
    }
    let before = compiler.compilations();
    assert_eq!(catalog.recompile_dependents("T").unwrap(), 2);
    assert_eq!(compiler.compilations(), before + 2);
}

#[test]
fn test_columns_and_query_swap_together() {
    let catalog = catalog();
    let t = create_t(&catalog);
    fill_t(&t, 50, 5);
    let v = catalog
        .create_view(ViewDefinition::new("V", "SELECT A, B, C FROM T"))
        .unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..200 {
                    let state = v.state();
                    let query = state.query().expect("view stays valid");
                    assert_eq!(query.columns().len(), state.columns().len());
                    let plan = v.best_plan(&[PredicateMask::EQUALITY]).unwrap();
                    assert!(plan.cost > 0.0);
                }
            });
        }
        for _ in 0..50 {
            v.recompile(&catalog).unwrap();
        }
    });
    assert_eq!(t.dependent_views(), vec![v.id()]);
}
