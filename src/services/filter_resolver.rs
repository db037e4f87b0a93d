//! Resolution of association filters into qualifying log identifiers.
//!
//! Each dimension is resolved on its own: target values are looked up, the
//! join table is read for the resolved targets and the edges are reduced with
//! AND (every target linked) or OR (any target linked) semantics.

use crate::database::{Executor, Schema};
use crate::error::Result;
use crate::query_builder::QueryBuilder;
use crate::repositories::RecordRepository;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperation {
    And,
    Or,
}

/// Target values of one dimension and how they combine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationFilter {
    pub operation: FilterOperation,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl AssociationFilter {
    pub fn and<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            operation: FilterOperation::And,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn or<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            operation: FilterOperation::Or,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Where the targets of a dimension live and how logs link to them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDimension {
    pub name: &'static str,
    /// Model holding the targets
    pub lookup_model: &'static str,
    /// Field the filter values are matched against
    pub lookup_field: &'static str,
    /// Join table between logs and targets
    pub edge_model: &'static str,
    /// Join table column referencing the target primary key
    pub target_key: &'static str,
}

impl FilterDimension {
    pub const TAGS: FilterDimension = FilterDimension {
        name: "tags",
        lookup_model: "tags",
        lookup_field: "text",
        edge_model: "log_tags",
        target_key: "tag_id",
    };

    pub const RUNS: FilterDimension = FilterDimension {
        name: "runs",
        lookup_model: "runs",
        lookup_field: "run_number",
        edge_model: "log_runs",
        target_key: "run_id",
    };

    pub const LHC_FILLS: FilterDimension = FilterDimension {
        name: "lhc_fills",
        lookup_model: "lhc_fills",
        lookup_field: "fill_number",
        edge_model: "log_lhc_fills",
        target_key: "lhc_fill_id",
    };

    pub const ENVIRONMENTS: FilterDimension = FilterDimension {
        name: "environments",
        lookup_model: "environments",
        lookup_field: "id",
        edge_model: "log_environments",
        target_key: "environment_id",
    };
}

const LOG_KEY: &str = "log_id";

/// Comparable key of an identifier, whatever its JSON type
fn target_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reduce `(log_id, target)` edges to the logs satisfying `operation`.
///
/// With AND a log qualifies when its linked targets include every target.
pub fn qualifying_log_ids(
    edges: &[(i64, String)],
    targets: &BTreeSet<String>,
    operation: FilterOperation,
) -> BTreeSet<i64> {
    let relevant = edges.iter().filter(|(_, target)| targets.contains(target));
    match operation {
        FilterOperation::Or => relevant.map(|(log_id, _)| *log_id).collect(),
        FilterOperation::And => {
            let mut linked: BTreeMap<i64, BTreeSet<&str>> = BTreeMap::new();
            for (log_id, target) in relevant {
                linked.entry(*log_id).or_default().insert(target.as_str());
            }
            linked
                .into_iter()
                .filter(|(_, set)| targets.iter().all(|t| set.contains(t.as_str())))
                .map(|(log_id, _)| log_id)
                .collect()
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterResolver {
    schema: Arc<Schema>,
}

impl FilterResolver {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    /// Logs satisfying `filter` along `dimension`.
    ///
    /// `None` when the filter has no values and therefore does not restrict
    /// anything. Unknown or malformed values are dropped; when nothing
    /// resolves the set is empty.
    pub async fn resolve<E>(
        &self,
        executor: &mut E,
        dimension: &FilterDimension,
        filter: &AssociationFilter,
    ) -> Result<Option<BTreeSet<i64>>>
    where
        E: Executor + ?Sized,
    {
        if filter.values.is_empty() {
            debug!(dimension = dimension.name, "Skipping filter without values");
            return Ok(None);
        }

        let lookup = self.schema.model(dimension.lookup_model)?;
        let field = lookup.require_field(dimension.lookup_field)?;
        let pk = lookup.require_primary_key()?;

        let mut values: Vec<Value> = Vec::new();
        for value in &filter.values {
            match field.kind.coerce(value) {
                Ok(coerced) if !coerced.is_null() => {
                    if !values.contains(&coerced) {
                        values.push(coerced);
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(
                        dimension = dimension.name,
                        value = %value,
                        error = %err,
                        "Dropping filter value"
                    );
                }
            }
        }
        if values.is_empty() {
            return Ok(Some(BTreeSet::new()));
        }

        let lookup_query = QueryBuilder::new()
            .select(&[pk.name])
            .where_field(dimension.lookup_field)
            .one_of(values);
        let target_ids: Vec<Value> = RecordRepository::new(Arc::clone(&self.schema), lookup.name)
            .find_all(executor, &lookup_query)
            .await?
            .into_iter()
            .filter_map(|mut record| record.remove(pk.name))
            .collect();
        if target_ids.is_empty() {
            debug!(dimension = dimension.name, "No filter value resolved to a target");
            return Ok(Some(BTreeSet::new()));
        }
        let targets: BTreeSet<String> = target_ids.iter().map(target_key).collect();

        let edge_query = QueryBuilder::new()
            .select(&[LOG_KEY, dimension.target_key])
            .where_field(dimension.target_key)
            .one_of(target_ids)
            .order_asc(LOG_KEY);
        let edge_repository = RecordRepository::new(Arc::clone(&self.schema), dimension.edge_model);
        let edges: Vec<(i64, String)> = edge_repository
            .find_all(executor, &edge_query)
            .await?
            .iter()
            .filter_map(|edge| {
                let log_id = edge.get(LOG_KEY)?.as_i64()?;
                Some((log_id, target_key(edge.get(dimension.target_key)?)))
            })
            .collect();

        let log_ids = qualifying_log_ids(&edges, &targets, filter.operation);
        info!(
            dimension = dimension.name,
            operation = ?filter.operation,
            targets = targets.len(),
            edges = edges.len(),
            logs = log_ids.len(),
            "Resolved association filter"
        );
        Ok(Some(log_ids))
    }
}
