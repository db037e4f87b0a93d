use super::attachment::Attachment;
use super::environment::EnvironmentSummary;
use super::lhc_fill::FillSummary;
use super::run::RunSummary;
use super::subsystem::Subsystem;
use super::tag::Tag;
use super::user::User;
use crate::database::{Association, AssociationKind, Field, FieldKind, ModelDefinition};
use crate::repositories::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maps to the `logs` table.
///
/// Replies point at the log they answer (`parent_log_id`) and at the first
/// log of their thread (`root_log_id`).
pub static LOGS: ModelDefinition = ModelDefinition {
    name: "logs",
    table: "logs",
    primary_key: Some("id"),
    fields: &[
        Field::required("id", FieldKind::BigInt),
        Field::required("title", FieldKind::Text),
        Field::required("text", FieldKind::Text),
        Field::optional("user_id", FieldKind::BigInt),
        Field::optional("parent_log_id", FieldKind::BigInt),
        Field::optional("root_log_id", FieldKind::BigInt),
        Field::required("created_at", FieldKind::Timestamp),
        Field::required("origin", FieldKind::Text),
    ],
    associations: &[
        Association {
            name: "user",
            target: "users",
            kind: AssociationKind::BelongsTo {
                foreign_key: "user_id",
            },
        },
        Association {
            name: "tags",
            target: "tags",
            kind: AssociationKind::ManyToMany {
                through: "log_tags",
                source_key: "log_id",
                target_key: "tag_id",
            },
        },
        Association {
            name: "runs",
            target: "runs",
            kind: AssociationKind::ManyToMany {
                through: "log_runs",
                source_key: "log_id",
                target_key: "run_id",
            },
        },
        Association {
            name: "lhc_fills",
            target: "lhc_fills",
            kind: AssociationKind::ManyToMany {
                through: "log_lhc_fills",
                source_key: "log_id",
                target_key: "lhc_fill_id",
            },
        },
        Association {
            name: "environments",
            target: "environments",
            kind: AssociationKind::ManyToMany {
                through: "log_environments",
                source_key: "log_id",
                target_key: "environment_id",
            },
        },
        Association {
            name: "subsystems",
            target: "subsystems",
            kind: AssociationKind::ManyToMany {
                through: "log_subsystems",
                source_key: "log_id",
                target_key: "subsystem_id",
            },
        },
        Association {
            name: "attachments",
            target: "attachments",
            kind: AssociationKind::HasMany {
                foreign_key: "log_id",
            },
        },
    ],
    unique_key: &["id"],
};

/// A log entry together with whatever associations were included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub user_id: Option<i64>,
    pub parent_log_id: Option<i64>,
    pub root_log_id: Option<i64>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub origin: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub runs: Vec<RunSummary>,
    #[serde(default)]
    pub lhc_fills: Vec<FillSummary>,
    #[serde(default)]
    pub environments: Vec<EnvironmentSummary>,
    #[serde(default)]
    pub subsystems: Vec<Subsystem>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Entity for Log {
    const MODEL: &'static str = "logs";
}

/// The reply-tree columns of a log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogReference {
    pub id: i64,
    pub parent_log_id: Option<i64>,
    pub root_log_id: Option<i64>,
}

impl LogReference {
    pub const FIELDS: &'static [&'static str] = &["id", "parent_log_id", "root_log_id"];

    /// Distinct logs this one replies to, excluding itself
    pub fn referenced(&self) -> impl Iterator<Item = i64> + '_ {
        let parent = self.parent_log_id.filter(|id| *id != self.id);
        let root = self
            .root_log_id
            .filter(|id| *id != self.id && Some(*id) != parent);
        parent.into_iter().chain(root)
    }
}

impl Entity for LogReference {
    const MODEL: &'static str = "logs";
}
