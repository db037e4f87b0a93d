//! In-memory store.
//!
//! Tables live behind a `parking_lot::RwLock`; every transaction works on an
//! immutable snapshot taken when it begins, so reads inside one transaction
//! never observe concurrent inserts.

use super::evaluation::{compare_values, matches_filter, LiteralMatcher};
use super::executor::{Executor, Record, Store, Transaction};
use super::resolve::{OrderKey, ResolvedOrder, ResolvedQuery};
use super::schema::{AssociationKind, ModelDefinition, Schema};
use crate::error::{LogbookError, Result};
use crate::query_builder::SortDirection;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

type Tables = HashMap<&'static str, Vec<Record>>;

#[derive(Clone)]
pub struct MemoryStore {
    schema: Arc<Schema>,
    tables: Arc<RwLock<Tables>>,
    literals: Arc<RwLock<HashMap<String, LiteralMatcher>>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("tables", &self.tables.read().keys().collect::<Vec<_>>())
            .field("literals", &self.literals.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MemoryStore {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            tables: Arc::new(RwLock::new(HashMap::new())),
            literals: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert one row into `model`'s table.
    ///
    /// Every value is coerced to its field kind, missing nullable fields become
    /// NULL and the model's unique key is enforced.
    pub fn insert(&self, model: &str, row: Value) -> Result<()> {
        let model = self.schema.model(model)?;
        let Value::Object(input) = row else {
            return Err(LogbookError::ValidationError(format!(
                "rows inserted into '{}' must be JSON objects",
                model.name
            )));
        };

        for key in input.keys() {
            model.require_field(key)?;
        }

        let mut record = Record::new();
        for field in model.fields {
            let value = match input.get(field.name) {
                Some(value) => field.kind.coerce(value)?,
                None => Value::Null,
            };
            if value.is_null() && !field.nullable {
                return Err(LogbookError::ValidationError(format!(
                    "field '{}' of '{}' may not be null",
                    field.name, model.name
                )));
            }
            record.insert(field.name.to_string(), value);
        }

        let mut tables = self.tables.write();
        let rows = tables.entry(model.table).or_default();
        if !model.unique_key.is_empty() {
            let duplicate = rows.iter().any(|existing| {
                model
                    .unique_key
                    .iter()
                    .all(|key| existing.get(*key) == record.get(*key))
            });
            if duplicate {
                return Err(LogbookError::ConstraintViolation {
                    table: model.table.to_string(),
                    reason: format!("duplicate ({})", model.unique_key.join(", ")),
                });
            }
        }
        rows.push(record);
        Ok(())
    }

    /// Register how an opaque literal expression evaluates in memory
    pub fn register_literal<F>(&self, expression: &str, matcher: F)
    where
        F: Fn(&Record, &[(String, Value)]) -> bool + Send + Sync + 'static,
    {
        self.literals
            .write()
            .insert(expression.to_string(), Arc::new(matcher));
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    async fn begin(&self) -> Result<Box<dyn Transaction>> {
        let snapshot = Arc::new(self.tables.read().clone());
        let literals = self.literals.read().clone();
        debug!(tables = snapshot.len(), "Memory transaction started");
        Ok(Box::new(MemoryTransaction {
            schema: Arc::clone(&self.schema),
            snapshot,
            literals,
        }))
    }
}

struct MemoryTransaction {
    schema: Arc<Schema>,
    snapshot: Arc<Tables>,
    literals: HashMap<String, LiteralMatcher>,
}

impl MemoryTransaction {
    fn rows(&self, model: &ModelDefinition) -> &[Record] {
        self.snapshot
            .get(model.table)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn filtered(&self, query: &ResolvedQuery) -> Result<Vec<&Record>> {
        let mut kept = Vec::new();
        for record in self.rows(query.model) {
            if matches_filter(record, &query.filter, &self.literals)? {
                kept.push(record);
            }
        }
        Ok(kept)
    }

    /// Values of the sort key for one record; several for to-many associations
    fn order_values(
        &self,
        model: &ModelDefinition,
        record: &Record,
        key: &OrderKey,
    ) -> Result<Vec<Value>> {
        let (association, target, field) = match key {
            OrderKey::Field(field) => {
                return Ok(vec![record.get(field.name).cloned().unwrap_or(Value::Null)]);
            }
            OrderKey::Association {
                association,
                target,
                field,
            } => (association, target, field),
        };

        let related: Vec<&Record> = match association.kind {
            AssociationKind::BelongsTo { foreign_key } => {
                let target_pk = target.require_primary_key()?.name;
                let fk = record.get(foreign_key).unwrap_or(&Value::Null);
                self.rows(target)
                    .iter()
                    .filter(|row| !fk.is_null() && row.get(target_pk) == Some(fk))
                    .collect()
            }
            AssociationKind::HasMany { foreign_key } => {
                let pk = record.get(model.require_primary_key()?.name);
                self.rows(target)
                    .iter()
                    .filter(|row| pk.is_some() && row.get(foreign_key) == pk)
                    .collect()
            }
            AssociationKind::ManyToMany {
                through,
                source_key,
                target_key,
            } => {
                let through = self.schema.model(through)?;
                let target_pk = target.require_primary_key()?.name;
                let pk = record.get(model.require_primary_key()?.name);
                let target_ids: Vec<&Value> = self
                    .rows(through)
                    .iter()
                    .filter(|edge| pk.is_some() && edge.get(source_key) == pk)
                    .filter_map(|edge| edge.get(target_key))
                    .collect();
                self.rows(target)
                    .iter()
                    .filter(|row| {
                        row.get(target_pk)
                            .map(|id| target_ids.contains(&id))
                            .unwrap_or(false)
                    })
                    .collect()
            }
        };

        Ok(related
            .into_iter()
            .filter_map(|row| row.get(field.name))
            .filter(|v| !v.is_null())
            .cloned()
            .collect())
    }

    fn sort_keys(&self, query: &ResolvedQuery, record: &Record) -> Result<Vec<Value>> {
        query
            .order
            .iter()
            .map(|order| {
                let values = self.order_values(query.model, record, &order.key)?;
                Ok(aggregate_sort_value(values, order.direction))
            })
            .collect()
    }
}

/// Collapse several associated values into one sort value: the minimum when
/// ascending, the maximum when descending
fn aggregate_sort_value(values: Vec<Value>, direction: SortDirection) -> Value {
    let pick = match direction {
        SortDirection::Asc => Ordering::Less,
        SortDirection::Desc => Ordering::Greater,
    };
    values
        .into_iter()
        .reduce(|best, candidate| {
            if compare_values(&candidate, &best) == Some(pick) {
                candidate
            } else {
                best
            }
        })
        .unwrap_or(Value::Null)
}

/// NULLs last when ascending and first when descending
fn compare_sort_values(a: &Value, b: &Value, direction: SortDirection) -> Ordering {
    let ascending = match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => compare_values(a, b).unwrap_or(Ordering::Equal),
    };
    match direction {
        SortDirection::Asc => ascending,
        SortDirection::Desc => ascending.reverse(),
    }
}

fn compare_keys(a: &[Value], b: &[Value], order: &[ResolvedOrder]) -> Ordering {
    a.iter()
        .zip(b)
        .zip(order)
        .map(|((a, b), order)| compare_sort_values(a, b, order.direction))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl Executor for MemoryTransaction {
    async fn fetch_all(&mut self, query: &ResolvedQuery) -> Result<Vec<Record>> {
        let started = Instant::now();
        let rows = self.filtered(query)?;

        let mut keyed = rows
            .into_iter()
            .map(|record| Ok((self.sort_keys(query, record)?, record)))
            .collect::<Result<Vec<_>>>()?;
        // Stable: rows with equal keys keep insertion order
        keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, &query.order));

        let ordered: Vec<&Record> = keyed.into_iter().map(|(_, record)| record).collect();
        let window = match query.pagination {
            Some(pagination) => pagination.apply(ordered),
            None => ordered,
        };

        let projected: Vec<Record> = window
            .into_iter()
            .map(|record| {
                query
                    .select
                    .iter()
                    .map(|field| {
                        (
                            field.name.to_string(),
                            record.get(field.name).cloned().unwrap_or(Value::Null),
                        )
                    })
                    .collect()
            })
            .collect();

        crate::logging::log_query_operation(
            "fetch_all",
            query.model.name,
            projected.len(),
            started.elapsed().as_millis(),
        );
        Ok(projected)
    }

    async fn count(&mut self, query: &ResolvedQuery) -> Result<i64> {
        Ok(self.filtered(query)?.len() as i64)
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
