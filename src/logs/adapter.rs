//! Conversion of log entities into the shape returned to callers.

use crate::models::{Attachment, EnvironmentSummary, FillSummary, Log, RunSummary, Subsystem, Tag, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntity {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub author: Option<User>,
    /// Epoch milliseconds
    pub created_at: i64,
    pub origin: String,
    pub parent_log_id: Option<i64>,
    pub root_log_id: Option<i64>,
    pub tags: Vec<Tag>,
    pub runs: Vec<RunSummary>,
    pub lhc_fills: Vec<FillSummary>,
    pub environments: Vec<EnvironmentSummary>,
    pub subsystems: Vec<Subsystem>,
    pub attachments: Vec<Attachment>,
    /// Number of logs replying to this one
    pub replies: i64,
}

pub fn to_entity(log: Log, replies: i64) -> LogEntity {
    LogEntity {
        id: log.id,
        title: log.title,
        text: log.text,
        author: log.user,
        created_at: log.created_at.timestamp_millis(),
        origin: log.origin,
        parent_log_id: log.parent_log_id,
        root_log_id: log.root_log_id,
        tags: log.tags,
        runs: log.runs,
        lhc_fills: log.lhc_fills,
        environments: log.environments,
        subsystems: log.subsystems,
        attachments: log.attachments,
        replies,
    }
}
