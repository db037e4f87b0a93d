//! # Repositories
//!
//! Typed access to one model. Every method takes the executor it runs on, so
//! several repositories can share one transaction.
//!
//! ```rust,no_run
//! use logbook_core::database::{finish, MemoryStore, Store};
//! use logbook_core::models::{logbook_schema, Tag};
//! use logbook_core::query_builder::QueryBuilder;
//! use logbook_core::repositories::Repository;
//! use std::sync::Arc;
//!
//! # async fn example() -> logbook_core::error::Result<()> {
//! let store = MemoryStore::new(Arc::new(logbook_schema()));
//! let tags = Repository::<Tag>::new(Arc::clone(store.schema()));
//! let mut tx = store.begin().await?;
//! let found = tags
//!     .find_all(&mut *tx, &QueryBuilder::new().where_field("text").one_of(["DCS", "FLP"]))
//!     .await;
//! let found = finish(tx, found).await?;
//! # Ok(())
//! # }
//! ```

pub mod record;

pub use record::{Group, Page, RecordRepository};

use crate::database::{Executor, Record, Schema};
use crate::error::Result;
use crate::query_builder::QueryBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// A type records of `MODEL` deserialise into
pub trait Entity: DeserializeOwned + Send {
    const MODEL: &'static str;
}

fn decode<T: Entity>(record: Record) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(record))?)
}

pub struct Repository<T: Entity> {
    records: RecordRepository,
    entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            entity: PhantomData,
        }
    }
}

impl<T: Entity> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("model", &T::MODEL)
            .finish()
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            records: RecordRepository::new(schema, T::MODEL),
            entity: PhantomData,
        }
    }

    pub async fn find_one<E>(&self, executor: &mut E, query: &QueryBuilder) -> Result<Option<T>>
    where
        E: Executor + ?Sized,
    {
        self.records
            .find_one(executor, query)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn find_all<E>(&self, executor: &mut E, query: &QueryBuilder) -> Result<Vec<T>>
    where
        E: Executor + ?Sized,
    {
        self.records
            .find_all(executor, query)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn find_and_count_all<E>(&self, executor: &mut E, query: &QueryBuilder) -> Result<Page<T>>
    where
        E: Executor + ?Sized,
    {
        let page = self.records.find_and_count_all(executor, query).await?;
        Ok(Page {
            count: page.count,
            rows: page.rows.into_iter().map(decode).collect::<Result<Vec<_>>>()?,
        })
    }

    /// Rows grouped by the value of `key`, groups in first-seen order
    pub async fn find_all_and_group<E>(
        &self,
        executor: &mut E,
        query: &QueryBuilder,
        key: &str,
    ) -> Result<Vec<Group<T>>>
    where
        E: Executor + ?Sized,
    {
        self.records
            .find_all_and_group(executor, query, key)
            .await?
            .into_iter()
            .map(|group| {
                Ok(Group {
                    index: group.index,
                    values: group.values.into_iter().map(decode).collect::<Result<Vec<_>>>()?,
                })
            })
            .collect()
    }
}
