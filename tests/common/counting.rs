//! A store wrapper that counts the queries each model receives

use async_trait::async_trait;
use logbook_core::database::{Executor, MemoryStore, Record, ResolvedQuery, Schema, Store, Transaction};
use logbook_core::error::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct QueryCounts(Arc<Mutex<HashMap<&'static str, usize>>>);

impl QueryCounts {
    /// Fetches and counts issued against `model`
    pub fn of(&self, model: &str) -> usize {
        self.0.lock().get(model).copied().unwrap_or(0)
    }

    fn record(&self, query: &ResolvedQuery) {
        *self.0.lock().entry(query.model.name).or_insert(0) += 1;
    }
}

pub struct CountingStore {
    inner: MemoryStore,
    pub counts: QueryCounts,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            counts: QueryCounts::default(),
        }
    }
}

#[async_trait]
impl Store for CountingStore {
    fn schema(&self) -> &Arc<Schema> {
        self.inner.schema()
    }

    async fn begin(&self) -> Result<Box<dyn Transaction>> {
        let inner = self.inner.begin().await?;
        Ok(Box::new(CountingTransaction {
            inner,
            counts: self.counts.clone(),
        }))
    }
}

struct CountingTransaction {
    inner: Box<dyn Transaction>,
    counts: QueryCounts,
}

#[async_trait]
impl Executor for CountingTransaction {
    async fn fetch_all(&mut self, query: &ResolvedQuery) -> Result<Vec<Record>> {
        self.counts.record(query);
        self.inner.fetch_all(query).await
    }

    async fn count(&mut self, query: &ResolvedQuery) -> Result<i64> {
        self.counts.record(query);
        self.inner.count(query).await
    }
}

#[async_trait]
impl Transaction for CountingTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.inner.rollback().await
    }
}
