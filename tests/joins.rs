mod support;

use pod_query::{SelectField, SortDirection, StoreError, Value, condition::{eq, or}};
use support::{database, posts, users};

async fn seed_authors_and_posts(
    db: &pod_query::Database,
    users: &pod_query::Table,
    posts: &pod_query::Table,
) {
    for (id, name) in [("user-1", "Alice Author"), ("user-2", "Bob Writer")] {
        db.insert(users)
            .values([("id", Value::from(id)), ("name", Value::from(name))])
            .execute()
            .await
            .unwrap();
    }
    for (id, title, author) in [
        ("post-1", "Solid Intro", "user-1"),
        ("post-2", "SPARQL Tricks", "user-2"),
        ("post-3", "No Author Yet", "user-999"),
    ] {
        db.insert(posts)
            .values([
                ("id", Value::from(id)),
                ("title", Value::from(title)),
                ("authorId", Value::from(author)),
            ])
            .execute()
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn inner_join_matches_authors() {
    let (db, _session) = database();
    let users = users("j1");
    let posts = posts("j1");
    seed_authors_and_posts(&db, &users, &posts).await;

    let rows = db
        .select()
        .fields([
            ("title".to_string(), SelectField::from("title")),
            ("authorName".to_string(), SelectField::from("users.name")),
        ])
        .from(&posts)
        .inner_join(&users, [("posts.authorId", "users.id")])
        .order_by("title", SortDirection::Asc)
        .execute()
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("title"), Some(&Value::from("SPARQL Tricks")));
    assert_eq!(rows[0].get("authorName"), Some(&Value::from("Bob Writer")));
    assert_eq!(rows[1].get("title"), Some(&Value::from("Solid Intro")));
    assert_eq!(rows[1].get("authorName"), Some(&Value::from("Alice Author")));
}

#[tokio::test]
async fn left_join_pads_missing_authors() {
    let (db, _session) = database();
    let users = users("j2");
    let posts = posts("j2");
    seed_authors_and_posts(&db, &users, &posts).await;

    let rows = db
        .select()
        .fields([
            ("title".to_string(), SelectField::from("title")),
            ("authorName".to_string(), SelectField::from("users.name")),
        ])
        .from(&posts)
        .left_join(&users, [("posts.authorId", "users.id")])
        .order_by("authorName", SortDirection::Asc)
        .execute()
        .await
        .unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get("authorName"), Some(&Value::from("Alice Author")));
    assert_eq!(rows[1].get("authorName"), Some(&Value::from("Bob Writer")));
    // Nulls sort last: the orphaned post comes at the end
    assert_eq!(rows[2].get("title"), Some(&Value::from("No Author Yet")));
    assert_eq!(rows[2].get("authorName"), Some(&Value::Null));
}

#[tokio::test]
async fn join_filter_on_joined_alias_applies_post_merge() {
    let (db, _session) = database();
    let users = users("j3");
    let posts = posts("j3");
    seed_authors_and_posts(&db, &users, &posts).await;

    let rows = db
        .select()
        .from(&posts)
        .inner_join(&users, [("posts.authorId", "users.id")])
        .filter(eq("users.name", "Alice Author"))
        .execute()
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("title"), Some(&Value::from("Solid Intro")));
}

#[tokio::test]
async fn secondary_join_conditions_are_post_filters() {
    let (db, _session) = database();
    let users = users("j4");
    let posts = posts("j4");

    db.insert(&users)
        .values([("id", Value::from("user-1")), ("name", Value::from("same"))])
        .execute()
        .await
        .unwrap();
    db.insert(&posts)
        .values([
            ("id", Value::from("post-1")),
            ("title", Value::from("same")),
            ("authorId", Value::from("user-1")),
        ])
        .execute()
        .await
        .unwrap();
    db.insert(&posts)
        .values([
            ("id", Value::from("post-2")),
            ("title", Value::from("different")),
            ("authorId", Value::from("user-1")),
        ])
        .execute()
        .await
        .unwrap();

    // Second condition compares title with the joined name after merge
    let rows = db
        .select()
        .from(&posts)
        .inner_join(
            &users,
            [("posts.authorId", "users.id"), ("posts.title", "users.name")],
        )
        .execute()
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("id"), Some(&Value::from("post-1")));
}

#[tokio::test]
async fn join_condition_must_reference_the_new_alias() {
    let (db, _session) = database();
    let users = users("j5");
    let posts = posts("j5");

    let err = db
        .select()
        .from(&posts)
        .inner_join(&users, [("posts.authorId", "posts.id")])
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(pod_query::DomainError::JoinConditionScope { .. })
    ));

    let err = db
        .select()
        .from(&posts)
        .inner_join(&users, Vec::<(&str, &str)>::new())
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(pod_query::DomainError::EmptyJoinCondition(_))
    ));
}

#[tokio::test]
async fn conditional_update_by_non_id_predicate() {
    let (db, _session) = database();
    let users = users("j6");

    for (id, name) in [("u1", "A"), ("u2", "B"), ("u3", "C")] {
        db.insert(&users)
            .values([("id", Value::from(id)), ("name", Value::from(name))])
            .execute()
            .await
            .unwrap();
    }

    let outcomes = db
        .update(&users)
        .set([("name", Value::from("Z"))])
        .filter(or([eq("name", "A"), eq("name", "C")]))
        .execute()
        .await
        .unwrap();
    assert_eq!(outcomes.len(), 2);

    let rows = db
        .select()
        .from(&users)
        .order_by("id", SortDirection::Asc)
        .execute()
        .await
        .unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.get("name").cloned().unwrap()).collect();
    assert_eq!(
        names,
        vec![Value::from("Z"), Value::from("B"), Value::from("Z")]
    );
}

#[tokio::test]
async fn conditional_delete_removes_exactly_matches() {
    let (db, _session) = database();
    let users = users("j7");

    for (id, name) in [("u1", "keep"), ("u2", "drop"), ("u3", "drop")] {
        db.insert(&users)
            .values([("id", Value::from(id)), ("name", Value::from(name))])
            .execute()
            .await
            .unwrap();
    }

    let outcomes = db
        .delete(&users)
        .filter(eq("name", "drop"))
        .execute()
        .await
        .unwrap();
    assert_eq!(outcomes.len(), 2);

    let rows = db.select().from(&users).execute().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&Value::from("keep")));

    let rows = db
        .select()
        .from(&users)
        .filter(eq("name", "drop"))
        .execute()
        .await
        .unwrap();
    assert!(rows.is_empty());
}
