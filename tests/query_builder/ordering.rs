use super::log_ids;
use logbook_core::query_builder::{QueryBuilder, SortDirection};

#[tokio::test]
async fn test_text_ordering_is_case_sensitive() {
    assert_eq!(log_ids(QueryBuilder::new().order_asc("title")).await, vec![3, 2, 1, 4, 5, 6]);
    assert_eq!(log_ids(QueryBuilder::new().order_desc("title")).await, vec![6, 5, 4, 1, 2, 3]);
}

#[tokio::test]
async fn test_earlier_keys_take_precedence() {
    let query = QueryBuilder::new().order_asc("origin").order_desc("id");
    assert_eq!(log_ids(query).await, vec![5, 4, 3, 1, 6, 2]);
}

#[tokio::test]
async fn test_order_through_belongs_to() {
    let ascending = QueryBuilder::new()
        .order_by("name", SortDirection::Asc, Some("user"))
        .order_asc("id");
    assert_eq!(log_ids(ascending).await, vec![5, 2, 4, 1, 3, 6]);

    // Logs without author come first when descending
    let descending = QueryBuilder::new()
        .order_by("name", SortDirection::Desc, Some("user"))
        .order_asc("id");
    assert_eq!(log_ids(descending).await, vec![6, 1, 3, 2, 4, 5]);
}

#[tokio::test]
async fn test_order_through_many_to_many_uses_min_and_max() {
    let ascending = QueryBuilder::new()
        .order_by("text", SortDirection::Asc, Some("tags"))
        .order_asc("id");
    assert_eq!(log_ids(ascending).await, vec![3, 1, 2, 4, 5, 6]);

    let descending = QueryBuilder::new()
        .order_by("text", SortDirection::Desc, Some("tags"))
        .order_asc("id");
    assert_eq!(log_ids(descending).await, vec![5, 6, 1, 4, 3, 2]);
}

#[tokio::test]
async fn test_limit_and_offset() {
    let query = QueryBuilder::new().order_asc("id").limit(2).offset(1);
    assert_eq!(log_ids(query).await, vec![2, 3]);

    let past_the_end = QueryBuilder::new().order_asc("id").offset(10);
    assert!(log_ids(past_the_end).await.is_empty());
}
