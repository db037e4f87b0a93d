use crate::database::{Field, FieldKind, ModelDefinition};
use crate::repositories::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maps to the `lhc_fills` table
pub static LHC_FILLS: ModelDefinition = ModelDefinition {
    name: "lhc_fills",
    table: "lhc_fills",
    primary_key: Some("id"),
    fields: &[
        Field::required("id", FieldKind::BigInt),
        Field::required("fill_number", FieldKind::Integer),
        Field::optional("stable_beams_start", FieldKind::Timestamp),
        Field::optional("stable_beams_end", FieldKind::Timestamp),
    ],
    associations: &[],
    unique_key: &["fill_number"],
};

/// A beam fill; the stable beams period is open while `stable_beams_end` is unset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LhcFill {
    pub id: i64,
    pub fill_number: i32,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub stable_beams_start: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub stable_beams_end: Option<DateTime<Utc>>,
}

impl Entity for LhcFill {
    const MODEL: &'static str = "lhc_fills";
}

/// Fill as included on a log (`fill_number` only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillSummary {
    pub fill_number: i32,
}
