use crate::database::{Field, FieldKind, ModelDefinition};
use crate::repositories::Entity;
use serde::{Deserialize, Serialize};

/// Maps to the `users` table
pub static USERS: ModelDefinition = ModelDefinition {
    name: "users",
    table: "users",
    primary_key: Some("id"),
    fields: &[
        Field::required("id", FieldKind::BigInt),
        Field::optional("external_id", FieldKind::BigInt),
        Field::required("name", FieldKind::Text),
    ],
    associations: &[],
    unique_key: &["id"],
};

/// Author of log entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub external_id: Option<i64>,
    pub name: String,
}

impl Entity for User {
    const MODEL: &'static str = "users";
}
