use super::log_ids;
use crate::common::{ms, seeded_store};
use logbook_core::database::Store;
use logbook_core::error::LogbookError;
use logbook_core::query_builder::{Condition, QueryBuilder};
use logbook_core::repositories::RecordRepository;
use serde_json::json;
use std::sync::Arc;

fn by_id() -> QueryBuilder {
    QueryBuilder::new().order_asc("id")
}

#[tokio::test]
async fn test_is_and_its_negation() {
    assert_eq!(log_ids(by_id().where_field("parent_log_id").is(1)).await, vec![4]);
    // Logs without a parent are unknown for both polarities
    assert_eq!(log_ids(by_id().where_field("parent_log_id").not().is(1)).await, vec![5]);
}

#[tokio::test]
async fn test_one_of_returns_requested_rows() {
    assert_eq!(log_ids(by_id().where_field("id").one_of([1, 2])).await, vec![1, 2]);
    assert_eq!(
        log_ids(by_id().where_field("id").not().one_of([1, 2])).await,
        vec![3, 4, 5, 6]
    );
}

#[tokio::test]
async fn test_empty_one_of_matches_nothing() {
    assert!(log_ids(by_id().where_field("id").one_of(Vec::<i64>::new())).await.is_empty());
    assert_eq!(
        log_ids(by_id().where_field("id").not().one_of(Vec::<i64>::new())).await.len(),
        6
    );
}

#[tokio::test]
async fn test_all_of_on_single_valued_field() {
    assert!(log_ids(by_id().where_field("id").all_of([1, 2])).await.is_empty());
    assert_eq!(
        log_ids(by_id().where_field("id").not().all_of([1, 2])).await,
        vec![3, 4, 5, 6]
    );
}

#[tokio::test]
async fn test_between_is_inclusive_and_negation_is_exact_complement() {
    assert_eq!(log_ids(by_id().where_field("id").between(2, 4)).await, vec![2, 3, 4]);
    assert_eq!(
        log_ids(by_id().where_field("id").not().between(2, 4)).await,
        vec![1, 5, 6]
    );
}

#[tokio::test]
async fn test_between_on_timestamps() {
    let query = by_id()
        .where_field("created_at")
        .between(ms(2019, 8, 10, 10, 0, 0), ms(2019, 8, 11, 10, 0, 0));
    assert_eq!(log_ids(query).await, vec![3, 4]);

    let query = by_id()
        .where_field("created_at")
        .between("2019-08-10T10:00:00Z", "2019-08-11T10:00:00Z");
    assert_eq!(log_ids(query).await, vec![3, 4]);
}

#[tokio::test]
async fn test_substring_is_case_insensitive() {
    assert_eq!(log_ids(by_id().where_field("title").substring("POWER")).await, vec![1, 4, 5]);
}

#[tokio::test]
async fn test_prefix_and_suffix_matching() {
    assert_eq!(
        log_ids(by_id().where_field("title").starts_with("Power interruption")).await,
        vec![1]
    );
    assert_eq!(
        log_ids(by_id().where_field("title").not().starts_with("Power interruption")).await,
        vec![2, 3, 4, 5, 6]
    );
    assert!(log_ids(by_id().where_field("title").starts_with("power interruption"))
        .await
        .is_empty());
    assert_eq!(log_ids(by_id().where_field("title").ends_with("ABC123")).await, vec![2]);
    assert_eq!(
        log_ids(by_id().where_field("title").not().ends_with("wire.")).await,
        vec![2, 3, 4, 5, 6]
    );
}

#[tokio::test]
async fn test_not_only_negates_the_next_combinator() {
    let query = by_id()
        .where_field("origin")
        .not()
        .is("process")
        .where_field("title")
        .substring("power");
    assert_eq!(log_ids(query).await, vec![1, 4, 5]);
}

#[tokio::test]
async fn test_comparisons_and_null_checks() {
    assert_eq!(log_ids(by_id().where_field("id").greater_than(4)).await, vec![5, 6]);
    assert_eq!(log_ids(by_id().where_field("id").lower_than_or_equal(2)).await, vec![1, 2]);
    assert_eq!(log_ids(by_id().where_field("user_id").is_null()).await, vec![6]);
    assert_eq!(
        log_ids(by_id().where_field("root_log_id").not().is_null()).await,
        vec![4, 5]
    );
}

#[tokio::test]
async fn test_where_any_groups_a_disjunction() {
    let query = by_id().where_any(vec![
        Condition::is("origin", "process"),
        Condition::one_of("id", [1]),
    ]);
    assert_eq!(log_ids(query).await, vec![1, 2, 6]);
}

#[tokio::test]
async fn test_literal_where_binds_parameters() {
    let store = seeded_store();
    store.register_literal("length(\"logs\".\"title\") > :min", |record, params| {
        let min = params[0].1.as_u64().unwrap_or(0) as usize;
        record["title"].as_str().map(|t| t.len() > min).unwrap_or(false)
    });
    let logs = RecordRepository::new(Arc::clone(store.schema()), "logs");
    let query = by_id().literal_where("length(\"logs\".\"title\") > :min", [("min", json!(24))]);
    let mut tx = store.begin().await.unwrap();
    let ids: Vec<i64> = logs
        .find_all(&mut *tx, &query)
        .await
        .unwrap()
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3, 5]);
}

#[tokio::test]
async fn test_unknown_field_is_rejected() {
    let store = seeded_store();
    let logs = RecordRepository::new(Arc::clone(store.schema()), "logs");
    let mut tx = store.begin().await.unwrap();
    let err = logs
        .find_all(&mut *tx, &QueryBuilder::new().where_field("titel").is("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, LogbookError::ConfigurationError(_)));
}

#[tokio::test]
async fn test_uncoercible_value_is_rejected() {
    let store = seeded_store();
    let logs = RecordRepository::new(Arc::clone(store.schema()), "logs");
    let mut tx = store.begin().await.unwrap();
    let err = logs
        .find_all(&mut *tx, &QueryBuilder::new().where_field("id").is("abc"))
        .await
        .unwrap_err();
    assert!(matches!(err, LogbookError::ValidationError(_)));
}
