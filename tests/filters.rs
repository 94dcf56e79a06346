mod support;

use std::collections::BTreeSet;

use pod_query::{
    Column, Row, StoreError, Table, Value,
    condition::{eq, in_array, is_null, like, not, not_in_array, or},
};
use support::database;

fn people(container: &str) -> Table {
    Table::build(
        "people",
        format!("/drizzle-tests/{container}/"),
        "http://schema.org/Person",
    )
    .column(Column::string("id").primary_key())
    .column(Column::string("name").required())
    .column(Column::integer("age"))
    .finish()
    .unwrap()
}

fn names(rows: &[Row]) -> BTreeSet<String> {
    rows.iter()
        .map(|r| match r.get("name") {
            Some(Value::String(s)) => s.clone(),
            other => panic!("name should be a string, got {other:?}"),
        })
        .collect()
}

async fn seed_search_rows(db: &pod_query::Database, table: &Table) {
    for (id, name, age) in [
        ("s1", "Search Alpha", Some(20)),
        ("s2", "Search Beta", Some(25)),
        ("s3", "Search Gamma", Some(30)),
        ("s4", "Other Delta", None),
    ] {
        db.insert(table)
            .values([
                ("id", Value::from(id)),
                ("name", Value::from(name)),
                ("age", Value::from(age.map(i64::from))),
            ])
            .execute()
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn like_is_case_insensitive_with_wildcards() {
    let (db, _session) = database();
    let table = people("f1");
    seed_search_rows(&db, &table).await;

    let rows = db
        .select()
        .from(&table)
        .filter(like("name", "search%"))
        .execute()
        .await
        .unwrap();
    assert_eq!(
        names(&rows),
        BTreeSet::from([
            "Search Alpha".to_string(),
            "Search Beta".to_string(),
            "Search Gamma".to_string()
        ])
    );

    let rows = db
        .select()
        .from(&table)
        .filter(like("name", "search _lpha"))
        .execute()
        .await
        .unwrap();
    assert_eq!(names(&rows), BTreeSet::from(["Search Alpha".to_string()]));
}

#[tokio::test]
async fn or_null_and_not_filters() {
    let (db, _session) = database();
    let table = people("f2");
    seed_search_rows(&db, &table).await;

    let rows = db
        .select()
        .from(&table)
        .filter(or([eq("age", 20), eq("age", 30)]))
        .execute()
        .await
        .unwrap();
    assert_eq!(
        names(&rows),
        BTreeSet::from(["Search Alpha".to_string(), "Search Gamma".to_string()])
    );

    let rows = db
        .select()
        .from(&table)
        .filter(is_null("age"))
        .execute()
        .await
        .unwrap();
    assert_eq!(names(&rows), BTreeSet::from(["Other Delta".to_string()]));

    let rows = db
        .select()
        .from(&table)
        .filter(not(eq("name", "Search Beta")))
        .execute()
        .await
        .unwrap();
    let found = names(&rows);
    assert!(!found.contains("Search Beta"));
    assert_eq!(found.len(), 3);
}

#[tokio::test]
async fn in_list_boundaries() {
    let (db, _session) = database();
    let table = people("f3");
    seed_search_rows(&db, &table).await;

    let rows = db
        .select()
        .from(&table)
        .filter(in_array("age", [20, 25]))
        .execute()
        .await
        .unwrap();
    assert_eq!(
        names(&rows),
        BTreeSet::from(["Search Alpha".to_string(), "Search Beta".to_string()])
    );

    // Empty IN matches nothing
    let rows = db
        .select()
        .from(&table)
        .filter(in_array("age", Vec::<Value>::new()))
        .execute()
        .await
        .unwrap();
    assert!(rows.is_empty());

    // Empty NOT IN matches every row that binds the column
    let rows = db
        .select()
        .from(&table)
        .filter(not_in_array("age", Vec::<Value>::new()))
        .execute()
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn id_in_list_narrows_to_subjects() {
    let (db, _session) = database();
    let table = people("f4");
    seed_search_rows(&db, &table).await;

    let rows = db
        .select()
        .from(&table)
        .filter(in_array("id", ["s1", "s3"]))
        .execute()
        .await
        .unwrap();
    assert_eq!(
        names(&rows),
        BTreeSet::from(["Search Alpha".to_string(), "Search Gamma".to_string()])
    );
}

#[tokio::test]
async fn negative_limit_and_offset_are_programmer_errors() {
    let (db, _session) = database();
    let table = people("f5");

    let err = db
        .select()
        .from(&table)
        .limit(-1)
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(pod_query::DomainError::InvalidLimit(-1))
    ));

    let err = db
        .select()
        .from(&table)
        .offset(-3)
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(pod_query::DomainError::InvalidOffset(-3))
    ));
}

#[tokio::test]
async fn update_without_filter_is_rejected() {
    let (db, _session) = database();
    let table = people("f6");

    let err = db
        .update(&table)
        .set([("age", Value::from(1))])
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(pod_query::DomainError::UpdateWithoutFilter)
    ));
}

#[tokio::test]
async fn unknown_filter_column_is_rejected() {
    let (db, _session) = database();
    let table = people("f7");
    seed_search_rows(&db, &table).await;

    let err = db
        .select()
        .from(&table)
        .filter(eq("nickname", "x"))
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(pod_query::DomainError::UnknownColumn { .. })
    ));
}
