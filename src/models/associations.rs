//! Join tables between logs and the entities they reference.
//!
//! Each edge is unique per `(log_id, target)` pair.

use crate::database::{Field, FieldKind, ModelDefinition};
use crate::repositories::Entity;
use serde::{Deserialize, Serialize};

pub static LOG_TAGS: ModelDefinition = ModelDefinition {
    name: "log_tags",
    table: "log_tags",
    primary_key: None,
    fields: &[
        Field::required("log_id", FieldKind::BigInt),
        Field::required("tag_id", FieldKind::BigInt),
    ],
    associations: &[],
    unique_key: &["log_id", "tag_id"],
};

pub static LOG_RUNS: ModelDefinition = ModelDefinition {
    name: "log_runs",
    table: "log_runs",
    primary_key: None,
    fields: &[
        Field::required("log_id", FieldKind::BigInt),
        Field::required("run_id", FieldKind::BigInt),
    ],
    associations: &[],
    unique_key: &["log_id", "run_id"],
};

pub static LOG_LHC_FILLS: ModelDefinition = ModelDefinition {
    name: "log_lhc_fills",
    table: "log_lhc_fills",
    primary_key: None,
    fields: &[
        Field::required("log_id", FieldKind::BigInt),
        Field::required("lhc_fill_id", FieldKind::BigInt),
    ],
    associations: &[],
    unique_key: &["log_id", "lhc_fill_id"],
};

pub static LOG_ENVIRONMENTS: ModelDefinition = ModelDefinition {
    name: "log_environments",
    table: "log_environments",
    primary_key: None,
    fields: &[
        Field::required("log_id", FieldKind::BigInt),
        Field::required("environment_id", FieldKind::Text),
    ],
    associations: &[],
    unique_key: &["log_id", "environment_id"],
};

pub static LOG_SUBSYSTEMS: ModelDefinition = ModelDefinition {
    name: "log_subsystems",
    table: "log_subsystems",
    primary_key: None,
    fields: &[
        Field::required("log_id", FieldKind::BigInt),
        Field::required("subsystem_id", FieldKind::BigInt),
    ],
    associations: &[],
    unique_key: &["log_id", "subsystem_id"],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogTag {
    pub log_id: i64,
    pub tag_id: i64,
}

impl Entity for LogTag {
    const MODEL: &'static str = "log_tags";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRun {
    pub log_id: i64,
    pub run_id: i64,
}

impl Entity for LogRun {
    const MODEL: &'static str = "log_runs";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLhcFill {
    pub log_id: i64,
    pub lhc_fill_id: i64,
}

impl Entity for LogLhcFill {
    const MODEL: &'static str = "log_lhc_fills";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEnvironment {
    pub log_id: i64,
    pub environment_id: String,
}

impl Entity for LogEnvironment {
    const MODEL: &'static str = "log_environments";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSubsystem {
    pub log_id: i64,
    pub subsystem_id: i64,
}

impl Entity for LogSubsystem {
    const MODEL: &'static str = "log_subsystems";
}
