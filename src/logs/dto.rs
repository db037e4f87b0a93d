//! Request shapes of the log listing.
//!
//! Unknown keys are ignored and so are malformed values: a field that does not
//! deserialise reads as absent instead of rejecting the whole request.

use crate::query_builder::SortDirection;
use crate::services::AssociationFilter;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Deserialise a field, reading a malformed value as `None`
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            debug!(error = %err, "Ignoring malformed request field");
            Ok(None)
        }
    }
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAllLogsDto {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub query: LogQuery,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    #[serde(default, deserialize_with = "lenient")]
    pub filter: Option<LogFilter>,
    #[serde(default, deserialize_with = "lenient")]
    pub sort: Option<LogSort>,
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<PageRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    /// Case-insensitive substring of the title
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    /// Phrase searched in the log text
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
    /// Case-insensitive substring of the author name
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created: Option<CreatedRange>,
    #[serde(default, deserialize_with = "lenient")]
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent_log: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub root_log: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Option<AssociationFilter>,
    #[serde(default, deserialize_with = "lenient")]
    pub run: Option<AssociationFilter>,
    #[serde(default, deserialize_with = "lenient")]
    pub lhc_fills: Option<AssociationFilter>,
    #[serde(default, deserialize_with = "lenient")]
    pub environments: Option<AssociationFilter>,
}

/// Inclusive creation range in epoch milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRange {
    #[serde(default, deserialize_with = "lenient")]
    pub from: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub to: Option<i64>,
}

/// Sort keys, applied in declaration order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSort {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<SortDirection>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<SortDirection>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<SortDirection>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<SortDirection>,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Option<SortDirection>,
    #[serde(default, deserialize_with = "lenient")]
    pub runs: Option<SortDirection>,
    #[serde(default, deserialize_with = "lenient")]
    pub environments: Option<SortDirection>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub limit: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub offset: Option<u32>,
}
