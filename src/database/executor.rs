//! The storage adapter boundary.
//!
//! Stores open transactions; transactions execute resolved queries and hand
//! back plain JSON records. Nothing engine-specific crosses this boundary.

use super::resolve::ResolvedQuery;
use super::schema::Schema;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// A plain record keyed by field name
pub type Record = serde_json::Map<String, serde_json::Value>;

#[async_trait]
pub trait Executor: Send {
    /// Rows matching the query, ordered and paginated, projected to `select`
    async fn fetch_all(&mut self, query: &ResolvedQuery) -> Result<Vec<Record>>;

    /// Number of rows matching the query filter, ignoring order and pagination
    async fn count(&mut self, query: &ResolvedQuery) -> Result<i64>;
}

#[async_trait]
pub trait Transaction: Executor {
    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait Store: Send + Sync {
    fn schema(&self) -> &Arc<Schema>;

    async fn begin(&self) -> Result<Box<dyn Transaction>>;
}

/// Release a transaction according to the outcome of the work done in it.
///
/// Commits on success. On failure the transaction is rolled back and the
/// original error is returned; a rollback failure is only logged.
pub async fn finish<T>(transaction: Box<dyn Transaction>, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            transaction.commit().await?;
            Ok(value)
        }
        Err(err) => {
            warn!(error = %err, "Rolling back transaction");
            if let Err(rollback_err) = transaction.rollback().await {
                warn!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(err)
        }
    }
}
