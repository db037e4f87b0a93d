//! PostgreSQL store backed by a sqlx connection pool.

use super::executor::{Executor, Record, Store, Transaction};
use super::resolve::ResolvedQuery;
use super::schema::{FieldKind, Schema};
use super::sql::{render_count, render_select, SqlParam};
use crate::config::DatabaseConfig;
use crate::error::{LogbookError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub struct PgStore {
    pool: PgPool,
    schema: Arc<Schema>,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig, schema: Arc<Schema>) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        info!(max_connections = config.max_connections, "Connected to PostgreSQL");
        Ok(Self { pool, schema })
    }

    pub fn from_pool(pool: PgPool, schema: Arc<Schema>) -> Self {
        Self { pool, schema }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<bool> {
        let row = sqlx::query("SELECT 1 AS health")
            .fetch_one(&self.pool)
            .await?;
        let health: i32 = row.try_get("health")?;
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Store for PgStore {
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    async fn begin(&self) -> Result<Box<dyn Transaction>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LogbookError::TransactionError(e.to_string()))?;
        Ok(Box::new(PgTransaction {
            tx,
            schema: Arc::clone(&self.schema),
        }))
    }
}

struct PgTransaction {
    tx: sqlx::Transaction<'static, Postgres>,
    schema: Arc<Schema>,
}

fn bind_param<'q>(
    query: Query<'q, Postgres, PgArguments>,
    param: &SqlParam,
) -> Result<Query<'q, Postgres, PgArguments>> {
    let invalid = || {
        LogbookError::ValidationError(format!(
            "cannot bind {} as {:?}",
            param.value, param.kind
        ))
    };
    let null = param.value.is_null();

    Ok(match param.kind {
        FieldKind::Integer => {
            let value = if null {
                None
            } else {
                let wide = param.value.as_i64().ok_or_else(invalid)?;
                Some(i32::try_from(wide).map_err(|_| invalid())?)
            };
            query.bind(value)
        }
        FieldKind::BigInt => {
            let value = if null {
                None
            } else {
                Some(param.value.as_i64().ok_or_else(invalid)?)
            };
            query.bind(value)
        }
        FieldKind::Text => {
            let value = if null {
                None
            } else {
                Some(param.value.as_str().ok_or_else(invalid)?.to_string())
            };
            query.bind(value)
        }
        FieldKind::Timestamp => {
            let value: Option<DateTime<Utc>> = if null {
                None
            } else {
                let millis = param.value.as_i64().ok_or_else(invalid)?;
                Some(DateTime::from_timestamp_millis(millis).ok_or_else(invalid)?)
            };
            query.bind(value)
        }
        FieldKind::Boolean => {
            let value = if null {
                None
            } else {
                Some(param.value.as_bool().ok_or_else(invalid)?)
            };
            query.bind(value)
        }
    })
}

fn decode_row(row: &PgRow, query: &ResolvedQuery) -> Result<Record> {
    let mut record = Record::new();
    for field in &query.select {
        let value = match field.kind {
            FieldKind::Integer => Value::from(row.try_get::<Option<i32>, _>(field.name)?),
            FieldKind::BigInt | FieldKind::Timestamp => {
                Value::from(row.try_get::<Option<i64>, _>(field.name)?)
            }
            FieldKind::Text => Value::from(row.try_get::<Option<String>, _>(field.name)?),
            FieldKind::Boolean => Value::from(row.try_get::<Option<bool>, _>(field.name)?),
        };
        record.insert(field.name.to_string(), value);
    }
    Ok(record)
}

#[async_trait]
impl Executor for PgTransaction {
    async fn fetch_all(&mut self, query: &ResolvedQuery) -> Result<Vec<Record>> {
        let started = Instant::now();
        let statement = render_select(&self.schema, query)?;
        debug!(sql = %statement.sql, params = statement.params.len(), "Executing select");

        let mut prepared = sqlx::query(&statement.sql);
        for param in &statement.params {
            prepared = bind_param(prepared, param)?;
        }
        let rows = prepared.fetch_all(&mut *self.tx).await?;
        let records = rows
            .iter()
            .map(|row| decode_row(row, query))
            .collect::<Result<Vec<_>>>()?;

        crate::logging::log_query_operation(
            "fetch_all",
            query.model.name,
            records.len(),
            started.elapsed().as_millis(),
        );
        Ok(records)
    }

    async fn count(&mut self, query: &ResolvedQuery) -> Result<i64> {
        let statement = render_count(&self.schema, query)?;
        debug!(sql = %statement.sql, params = statement.params.len(), "Executing count");

        let mut prepared = sqlx::query(&statement.sql);
        for param in &statement.params {
            prepared = bind_param(prepared, param)?;
        }
        let row = prepared.fetch_one(&mut *self.tx).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| LogbookError::TransactionError(e.to_string()))
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| LogbookError::TransactionError(e.to_string()))
    }
}
