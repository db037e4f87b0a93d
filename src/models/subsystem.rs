use crate::database::{Field, FieldKind, ModelDefinition};
use crate::repositories::Entity;
use serde::{Deserialize, Serialize};

pub static SUBSYSTEMS: ModelDefinition = ModelDefinition {
    name: "subsystems",
    table: "subsystems",
    primary_key: Some("id"),
    fields: &[
        Field::required("id", FieldKind::BigInt),
        Field::required("name", FieldKind::Text),
    ],
    associations: &[],
    unique_key: &["id"],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsystem {
    pub id: i64,
    pub name: String,
}

impl Entity for Subsystem {
    const MODEL: &'static str = "subsystems";
}
