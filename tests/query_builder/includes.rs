use crate::common::seeded_store;
use logbook_core::database::Store;
use logbook_core::models::{Log, LogTag};
use logbook_core::query_builder::{Condition, Include, QueryBuilder};
use logbook_core::repositories::{RecordRepository, Repository};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_many_to_many_include_with_attributes() {
    let store = seeded_store();
    let logs = RecordRepository::new(Arc::clone(store.schema()), "logs");
    let query = QueryBuilder::new()
        .where_field("id")
        .is(2)
        .include(Include::new("runs").attributes(&["id", "run_number"]))
        .include(Include::new("lhc_fills").attributes(&["fill_number"]));

    let mut tx = store.begin().await.unwrap();
    let log = logs.find_one(&mut *tx, &query).await.unwrap().unwrap();
    assert_eq!(log["runs"], json!([{"id": 1, "run_number": 1}]));
    assert_eq!(log["lhc_fills"], json!([{"fill_number": 1}, {"fill_number": 2}]));
}

#[tokio::test]
async fn test_belongs_to_and_has_many_includes() {
    let store = seeded_store();
    let logs = RecordRepository::new(Arc::clone(store.schema()), "logs");
    let query = QueryBuilder::new()
        .where_field("id")
        .one_of([1, 6])
        .order_asc("id")
        .include("user")
        .include("attachments");

    let mut tx = store.begin().await.unwrap();
    let rows = logs.find_all(&mut *tx, &query).await.unwrap();
    assert_eq!(rows[0]["user"]["name"], json!("John Doe"));
    assert_eq!(rows[0]["attachments"][0]["file_name"], json!("wire.png"));
    assert_eq!(rows[1]["user"], json!(null));
    assert_eq!(rows[1]["attachments"], json!([]));
}

#[tokio::test]
async fn test_include_conditions_filter_included_rows_only() {
    let store = seeded_store();
    let logs = RecordRepository::new(Arc::clone(store.schema()), "logs");
    let query = QueryBuilder::new()
        .order_asc("id")
        .limit(2)
        .include(Include::new("tags").where_condition(Condition::is("text", "RUN")));

    let mut tx = store.begin().await.unwrap();
    let rows = logs.find_all(&mut *tx, &query).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["tags"], json!([{"id": 2, "text": "RUN"}]));
    assert_eq!(rows[1]["tags"], json!([]));
}

#[tokio::test]
async fn test_typed_repository_decodes_includes() {
    let store = seeded_store();
    let logs = Repository::<Log>::new(Arc::clone(store.schema()));
    let query = QueryBuilder::new()
        .where_field("id")
        .is(1)
        .include("user")
        .include("tags")
        .include(Include::new("environments").attributes(&["id"]))
        .include("subsystems");

    let mut tx = store.begin().await.unwrap();
    let page = logs.find_and_count_all(&mut *tx, &query).await.unwrap();
    assert_eq!(page.count, 1);
    let log = &page.rows[0];
    assert_eq!(log.user.as_ref().map(|u| u.name.as_str()), Some("John Doe"));
    let tags: Vec<&str> = log.tags.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(tags, vec!["FOOD", "RUN"]);
    let environments: Vec<&str> = log.environments.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(environments, vec!["CmCvjNbg", "EIDO13i3D"]);
    assert_eq!(log.subsystems[0].name, "ITS");
    assert!(log.runs.is_empty());
}

#[tokio::test]
async fn test_find_all_and_group() {
    let store = seeded_store();
    let log_tags = Repository::<LogTag>::new(Arc::clone(store.schema()));
    let query = QueryBuilder::new()
        .where_field("tag_id")
        .one_of([1, 2])
        .order_asc("log_id");

    let mut tx = store.begin().await.unwrap();
    let groups = log_tags
        .find_all_and_group(&mut *tx, &query, "log_id")
        .await
        .unwrap();
    let summary: Vec<(i64, usize)> = groups
        .iter()
        .map(|g| (g.index.as_i64().unwrap(), g.values.len()))
        .collect();
    assert_eq!(summary, vec![(1, 2), (2, 1), (4, 1)]);
}

#[tokio::test]
async fn test_find_one_without_match() {
    let store = seeded_store();
    let logs = Repository::<Log>::new(Arc::clone(store.schema()));
    let mut tx = store.begin().await.unwrap();
    let missing = logs
        .find_one(&mut *tx, &QueryBuilder::new().where_field("id").is(42))
        .await
        .unwrap();
    assert!(missing.is_none());
}
