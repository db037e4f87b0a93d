use crate::database::{Field, FieldKind, ModelDefinition};
use crate::repositories::Entity;
use serde::{Deserialize, Serialize};

/// Maps to the `tags` table; tag text is unique
pub static TAGS: ModelDefinition = ModelDefinition {
    name: "tags",
    table: "tags",
    primary_key: Some("id"),
    fields: &[
        Field::required("id", FieldKind::BigInt),
        Field::required("text", FieldKind::Text),
    ],
    associations: &[],
    unique_key: &["text"],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub text: String,
}

impl Entity for Tag {
    const MODEL: &'static str = "tags";
}
