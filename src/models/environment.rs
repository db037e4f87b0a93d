use crate::database::{Field, FieldKind, ModelDefinition};
use serde::{Deserialize, Serialize};

/// Environments are identified by their text id
pub static ENVIRONMENTS: ModelDefinition = ModelDefinition {
    name: "environments",
    table: "environments",
    primary_key: Some("id"),
    fields: &[
        Field::required("id", FieldKind::Text),
        Field::optional("created_at", FieldKind::Timestamp),
    ],
    associations: &[],
    unique_key: &["id"],
};

/// Environment as included on a log (`id` only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSummary {
    pub id: String,
}
