//! Untyped repository over plain records, including association loading.

use crate::database::{
    AssociationKind, Executor, ModelDefinition, Record, ResolvedInclude, Schema,
};
use crate::error::Result;
use crate::query_builder::QueryBuilder;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Rows of one page together with the number of rows matching the filter
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub count: i64,
    pub rows: Vec<T>,
}

/// Rows sharing the same value of the grouping field, in first-seen order
#[derive(Debug, Clone, PartialEq)]
pub struct Group<T> {
    pub index: Value,
    pub values: Vec<T>,
}

#[derive(Debug, Clone)]
pub struct RecordRepository {
    schema: Arc<Schema>,
    model: &'static str,
}

impl RecordRepository {
    pub fn new(schema: Arc<Schema>, model: &'static str) -> Self {
        Self { schema, model }
    }

    pub async fn find_all<E>(&self, executor: &mut E, query: &QueryBuilder) -> Result<Vec<Record>>
    where
        E: Executor + ?Sized,
    {
        let resolved = self.schema.resolve(self.model, query)?;
        let mut rows = executor.fetch_all(&resolved).await?;
        for include in &resolved.includes {
            self.load_include(executor, resolved.model, &mut rows, include)
                .await?;
        }
        Ok(rows)
    }

    pub async fn find_one<E>(&self, executor: &mut E, query: &QueryBuilder) -> Result<Option<Record>>
    where
        E: Executor + ?Sized,
    {
        let rows = self.find_all(executor, &query.clone().limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn find_and_count_all<E>(
        &self,
        executor: &mut E,
        query: &QueryBuilder,
    ) -> Result<Page<Record>>
    where
        E: Executor + ?Sized,
    {
        let resolved = self.schema.resolve(self.model, query)?;
        let count = executor.count(&resolved).await?;
        let rows = self.find_all(executor, query).await?;
        Ok(Page { count, rows })
    }

    pub async fn find_all_and_group<E>(
        &self,
        executor: &mut E,
        query: &QueryBuilder,
        key: &str,
    ) -> Result<Vec<Group<Record>>>
    where
        E: Executor + ?Sized,
    {
        self.schema.model(self.model)?.require_field(key)?;
        let rows = self.find_all(executor, query).await?;
        Ok(group_by(rows, |row| row.get(key).cloned().unwrap_or(Value::Null)))
    }

    async fn load_include<E>(
        &self,
        executor: &mut E,
        source: &'static ModelDefinition,
        rows: &mut [Record],
        include: &ResolvedInclude,
    ) -> Result<()>
    where
        E: Executor + ?Sized,
    {
        let name = include.association.name;
        let target = include.target;
        let target_pk = target.require_primary_key()?.name;
        debug!(model = source.name, association = name, rows = rows.len(), "Loading include");

        match include.association.kind {
            AssociationKind::BelongsTo { foreign_key } => {
                let ids = distinct(rows.iter().filter_map(|row| row.get(foreign_key).cloned()));
                let related = self
                    .fetch_related(executor, include, target_pk, ids, &[target_pk])
                    .await?;
                for row in rows.iter_mut() {
                    let found = row
                        .get(foreign_key)
                        .filter(|fk| !fk.is_null())
                        .and_then(|fk| related.iter().find(|r| r.get(target_pk) == Some(fk)));
                    let value = found
                        .map(|r| Value::Object(project(r, include)))
                        .unwrap_or(Value::Null);
                    row.insert(name.to_string(), value);
                }
            }
            AssociationKind::HasMany { foreign_key } => {
                let pk = source.require_primary_key()?.name;
                let ids = distinct(rows.iter().filter_map(|row| row.get(pk).cloned()));
                let related = self
                    .fetch_related(executor, include, foreign_key, ids, &[foreign_key])
                    .await?;
                for row in rows.iter_mut() {
                    let own = row.get(pk).cloned().unwrap_or(Value::Null);
                    let children: Vec<Value> = related
                        .iter()
                        .filter(|r| !own.is_null() && r.get(foreign_key) == Some(&own))
                        .map(|r| Value::Object(project(r, include)))
                        .collect();
                    row.insert(name.to_string(), Value::Array(children));
                }
            }
            AssociationKind::ManyToMany {
                through,
                source_key,
                target_key,
            } => {
                let pk = source.require_primary_key()?.name;
                let ids = distinct(rows.iter().filter_map(|row| row.get(pk).cloned()));
                let edges = if ids.is_empty() {
                    Vec::new()
                } else {
                    let edge_query = QueryBuilder::new()
                        .select(&[source_key, target_key])
                        .where_field(source_key)
                        .one_of(ids);
                    executor
                        .fetch_all(&self.schema.resolve(through, &edge_query)?)
                        .await?
                };

                let target_ids = distinct(edges.iter().filter_map(|e| e.get(target_key).cloned()));
                let related = self
                    .fetch_related(executor, include, target_pk, target_ids, &[target_pk])
                    .await?;

                for row in rows.iter_mut() {
                    let own = row.get(pk).cloned().unwrap_or(Value::Null);
                    let linked: Vec<&Value> = edges
                        .iter()
                        .filter(|e| !own.is_null() && e.get(source_key) == Some(&own))
                        .filter_map(|e| e.get(target_key))
                        .collect();
                    let values: Vec<Value> = related
                        .iter()
                        .filter(|r| r.get(target_pk).map(|id| linked.contains(&id)).unwrap_or(false))
                        .map(|r| Value::Object(project(r, include)))
                        .collect();
                    row.insert(name.to_string(), Value::Array(values));
                }
            }
        }
        Ok(())
    }

    /// Target rows whose `key` is one of `ids`, ordered by the target primary key
    async fn fetch_related<E>(
        &self,
        executor: &mut E,
        include: &ResolvedInclude,
        key: &str,
        ids: Vec<Value>,
        required: &[&str],
    ) -> Result<Vec<Record>>
    where
        E: Executor + ?Sized,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let target = include.target;
        let mut query = QueryBuilder::new().where_field(key).one_of(ids);
        for condition in &include.include.conditions {
            query = query.where_condition(condition.clone());
        }
        if let Some(attributes) = &include.include.attributes {
            let mut fields: Vec<&str> = attributes.iter().map(String::as_str).collect();
            for &field in required {
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
            query = query.select(&fields);
        }
        if let Some(pk) = target.primary_key {
            query = query.order_asc(pk);
        }
        executor
            .fetch_all(&self.schema.resolve(target.name, &query)?)
            .await
    }
}

/// Restrict an included record to the requested attributes
fn project(record: &Record, include: &ResolvedInclude) -> Record {
    match &include.include.attributes {
        Some(attributes) => record
            .iter()
            .filter(|(key, _)| attributes.iter().any(|a| a == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        None => record.clone(),
    }
}

/// Non-null values, deduplicated, in first-seen order
fn distinct(values: impl Iterator<Item = Value>) -> Vec<Value> {
    let mut seen = Vec::new();
    for value in values {
        if !value.is_null() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

pub(crate) fn group_by<T, F>(rows: Vec<T>, key: F) -> Vec<Group<T>>
where
    F: Fn(&T) -> Value,
{
    let mut groups: Vec<Group<T>> = Vec::new();
    for row in rows {
        let index = key(&row);
        match groups.iter_mut().find(|g| g.index == index) {
            Some(group) => group.values.push(row),
            None => groups.push(Group {
                index,
                values: vec![row],
            }),
        }
    }
    groups
}
