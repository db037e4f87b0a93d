//! Query builder tests against the seeded store

pub mod includes;
pub mod ordering;
pub mod predicates;

use crate::common::seeded_store;
use logbook_core::database::Store;
use logbook_core::query_builder::QueryBuilder;
use logbook_core::repositories::RecordRepository;
use std::sync::Arc;

/// Ids of the logs matching `query`, in result order
pub async fn log_ids(query: QueryBuilder) -> Vec<i64> {
    let store = seeded_store();
    let logs = RecordRepository::new(Arc::clone(store.schema()), "logs");
    let mut tx = store.begin().await.unwrap();
    let rows = logs.find_all(&mut *tx, &query).await.unwrap();
    rows.iter().map(|row| row["id"].as_i64().unwrap()).collect()
}
