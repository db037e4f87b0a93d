use crate::database::{Field, FieldKind, ModelDefinition};
use crate::repositories::Entity;
use serde::{Deserialize, Serialize};

/// File attached to a single log; maps to the `attachments` table
pub static ATTACHMENTS: ModelDefinition = ModelDefinition {
    name: "attachments",
    table: "attachments",
    primary_key: Some("id"),
    fields: &[
        Field::required("id", FieldKind::BigInt),
        Field::required("log_id", FieldKind::BigInt),
        Field::required("file_name", FieldKind::Text),
        Field::optional("mime_type", FieldKind::Text),
        Field::optional("size", FieldKind::BigInt),
    ],
    associations: &[],
    unique_key: &["id"],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub log_id: i64,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub size: Option<i64>,
}

impl Entity for Attachment {
    const MODEL: &'static str = "attachments";
}
