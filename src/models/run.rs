use crate::database::{Field, FieldKind, ModelDefinition};
use crate::repositories::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maps to the `runs` table. `fill_number` refers to `lhc_fills.fill_number`.
pub static RUNS: ModelDefinition = ModelDefinition {
    name: "runs",
    table: "runs",
    primary_key: Some("id"),
    fields: &[
        Field::required("id", FieldKind::BigInt),
        Field::required("run_number", FieldKind::Integer),
        Field::optional("fill_number", FieldKind::Integer),
        Field::optional("time_start", FieldKind::Timestamp),
        Field::optional("time_end", FieldKind::Timestamp),
        Field::optional("ctf_file_size", FieldKind::BigInt),
        Field::optional("tf_file_size", FieldKind::BigInt),
    ],
    associations: &[],
    unique_key: &["run_number"],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: i64,
    pub run_number: i32,
    pub fill_number: Option<i32>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub time_start: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub time_end: Option<DateTime<Utc>>,
    /// Bytes of compressed time frames
    pub ctf_file_size: Option<i64>,
    /// Bytes of raw time frames
    pub tf_file_size: Option<i64>,
}

impl Entity for Run {
    const MODEL: &'static str = "runs";
}

/// Run as included on a log (`id`, `run_number`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub id: i64,
    pub run_number: i32,
}
