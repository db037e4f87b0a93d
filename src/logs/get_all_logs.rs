//! Listing of logs with scalar filters, association filters, sorting and
//! pagination, executed in a single transaction.

use super::adapter::{to_entity, LogEntity};
use super::dto::{GetAllLogsDto, LogFilter, LogQuery, LogSort};
use crate::config::PaginationConfig;
use crate::database::{finish, Executor, Record, Store};
use crate::error::Result;
use crate::logging::log_error;
use crate::models::{Log, LogReference, User};
use crate::query_builder::{Condition, Include, QueryBuilder, SortDirection};
use crate::repositories::Repository;
use crate::services::{AssociationFilter, FilterDimension, FilterResolver};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Phrase search over the log text
pub const CONTENT_SEARCH_EXPRESSION: &str =
    "to_tsvector('simple', \"logs\".\"text\") @@ phraseto_tsquery('simple', :content_search)";

pub const CONTENT_SEARCH_PARAM: &str = "content_search";

/// Lowercased alphanumeric words, as the `simple` text search parser splits them
fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// In-memory counterpart of [`CONTENT_SEARCH_EXPRESSION`]: the phrase words
/// must appear as consecutive whole words of the text
pub fn content_search_matches(record: &Record, params: &[(String, Value)]) -> bool {
    let phrase = params
        .iter()
        .find(|(name, _)| name == CONTENT_SEARCH_PARAM)
        .and_then(|(_, value)| value.as_str());
    let text = record.get("text").and_then(Value::as_str);
    let (Some(phrase), Some(text)) = (phrase, text) else {
        return false;
    };

    let phrase = tokens(phrase);
    if phrase.is_empty() {
        return false;
    }
    tokens(text).windows(phrase.len()).any(|window| window == phrase.as_slice())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetAllLogsResult {
    /// Logs matching the filters, regardless of pagination
    pub count: i64,
    pub logs: Vec<LogEntity>,
}

pub struct GetAllLogsUseCase {
    store: Arc<dyn Store>,
    pagination: PaginationConfig,
    logs: Repository<Log>,
    references: Repository<LogReference>,
    users: Repository<User>,
    resolver: FilterResolver,
}

impl GetAllLogsUseCase {
    pub fn new(store: Arc<dyn Store>, pagination: PaginationConfig) -> Self {
        let schema = Arc::clone(store.schema());
        Self {
            logs: Repository::new(Arc::clone(&schema)),
            references: Repository::new(Arc::clone(&schema)),
            users: Repository::new(Arc::clone(&schema)),
            resolver: FilterResolver::new(schema),
            store,
            pagination,
        }
    }

    pub async fn execute(&self, dto: GetAllLogsDto) -> Result<GetAllLogsResult> {
        let started = Instant::now();
        let LogQuery { filter, sort, page } = dto.query;

        let mut query = base_query();
        // A sort whose keys were all absent or malformed orders like no sort
        let sort = sort.filter(|sort| *sort != LogSort::default());
        query = apply_sort(query, sort.unwrap_or(LogSort {
            id: Some(SortDirection::Desc),
            ..LogSort::default()
        }));
        let page = page.unwrap_or_default();
        query = query
            .limit(page.limit.unwrap_or(self.pagination.limit))
            .offset(page.offset.unwrap_or(0));

        let mut tx = self.store.begin().await?;
        let outcome = self.run(&mut *tx, query, filter.as_ref()).await;
        let result = finish(tx, outcome).await;

        match &result {
            Ok(found) => info!(
                count = found.count,
                returned = found.logs.len(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Listed logs"
            ),
            Err(err) => log_error("GetAllLogsUseCase", "execute", &err.to_string()),
        }
        result
    }

    async fn run<E>(
        &self,
        executor: &mut E,
        mut query: QueryBuilder,
        filter: Option<&LogFilter>,
    ) -> Result<GetAllLogsResult>
    where
        E: Executor + ?Sized,
    {
        if let Some(filter) = filter {
            query = self.apply_scalar_filters(executor, query, filter).await?;

            let dimensions: [(FilterDimension, Option<&AssociationFilter>); 4] = [
                (FilterDimension::TAGS, filter.tags.as_ref()),
                (FilterDimension::RUNS, filter.run.as_ref()),
                (FilterDimension::LHC_FILLS, filter.lhc_fills.as_ref()),
                (FilterDimension::ENVIRONMENTS, filter.environments.as_ref()),
            ];
            for (dimension, association_filter) in dimensions {
                let Some(association_filter) = association_filter else {
                    continue;
                };
                if let Some(log_ids) = self
                    .resolver
                    .resolve(executor, &dimension, association_filter)
                    .await?
                {
                    query = query.where_field("id").one_of(log_ids);
                }
            }
        }

        let page = self.logs.find_and_count_all(executor, &query).await?;
        let ids: BTreeSet<i64> = page.rows.iter().map(|log| log.id).collect();
        let replies = self.count_replies(executor, &ids).await?;

        Ok(GetAllLogsResult {
            count: page.count,
            logs: page
                .rows
                .into_iter()
                .map(|log| {
                    let count = replies.get(&log.id).copied().unwrap_or(0);
                    to_entity(log, count)
                })
                .collect(),
        })
    }

    async fn apply_scalar_filters<E>(
        &self,
        executor: &mut E,
        mut query: QueryBuilder,
        filter: &LogFilter,
    ) -> Result<QueryBuilder>
    where
        E: Executor + ?Sized,
    {
        if let Some(title) = non_empty(&filter.title) {
            query = query.where_field("title").substring(title);
        }

        if let Some(content) = non_empty(&filter.content) {
            query = query.literal_where(
                CONTENT_SEARCH_EXPRESSION,
                [(CONTENT_SEARCH_PARAM, Value::from(content))],
            );
        }

        if let Some(author) = non_empty(&filter.author) {
            let authors = self
                .users
                .find_all(
                    executor,
                    &QueryBuilder::new().where_field("name").substring(author),
                )
                .await?;
            debug!(author, matches = authors.len(), "Resolved author filter");
            query = query
                .where_field("user_id")
                .one_of(authors.iter().map(|user| user.id));
        }

        if let Some(created) = filter.created {
            let from = created.from.unwrap_or(0);
            let to = created.to.unwrap_or_else(|| Utc::now().timestamp_millis());
            query = query.where_field("created_at").between(from, to);
        }

        if let Some(origin) = non_empty(&filter.origin) {
            query = query.where_field("origin").is(origin);
        }

        if let Some(parent) = filter.parent_log {
            query = query.where_field("parent_log_id").is(parent);
        }

        if let Some(root) = filter.root_log {
            query = query.where_field("root_log_id").is(root);
        }

        Ok(query)
    }

    /// Replies per log in `ids`; a reply counts once per log it references
    async fn count_replies<E>(&self, executor: &mut E, ids: &BTreeSet<i64>) -> Result<HashMap<i64, i64>>
    where
        E: Executor + ?Sized,
    {
        let mut counts = HashMap::new();
        if ids.is_empty() {
            return Ok(counts);
        }

        let query = QueryBuilder::new()
            .select(LogReference::FIELDS)
            .where_condition(Condition::any(vec![
                Condition::one_of("parent_log_id", ids.iter().copied()),
                Condition::one_of("root_log_id", ids.iter().copied()),
            ]));
        for reply in self.references.find_all(executor, &query).await? {
            for referenced in reply.referenced().filter(|id| ids.contains(id)) {
                *counts.entry(referenced).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn base_query() -> QueryBuilder {
    QueryBuilder::new()
        .include("user")
        .include("tags")
        .include(Include::new("runs").attributes(&["id", "run_number"]))
        .include(Include::new("lhc_fills").attributes(&["fill_number"]))
        .include("subsystems")
        .include("attachments")
        .include(Include::new("environments").attributes(&["id"]))
}

fn apply_sort(mut query: QueryBuilder, sort: LogSort) -> QueryBuilder {
    let keys: [(Option<SortDirection>, &str, Option<&str>); 7] = [
        (sort.id, "id", None),
        (sort.title, "title", None),
        (sort.author, "name", Some("user")),
        (sort.created_at, "created_at", None),
        (sort.tags, "text", Some("tags")),
        (sort.runs, "id", Some("runs")),
        (sort.environments, "id", Some("environments")),
    ];
    for (direction, field, through) in keys {
        if let Some(direction) = direction {
            query = query.order_by(field, direction, through);
        }
    }
    query
}
