//! Model definitions and the schema registry.
//!
//! A [`ModelDefinition`] names a table, its typed fields and its associations.
//! Query resolution consults the [`Schema`] so that unknown names are reported
//! instead of silently ignored.

use crate::error::{LogbookError, Result};
use chrono::DateTime;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 32-bit integer column
    Integer,
    /// 64-bit integer column
    BigInt,
    Text,
    /// Stored as `timestamptz`, carried as epoch milliseconds
    Timestamp,
    Boolean,
}

impl FieldKind {
    /// Coerce a loosely typed value to the canonical representation of this kind.
    ///
    /// `NULL` passes through untouched.
    pub fn coerce(&self, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        let coerced = match self {
            FieldKind::Integer | FieldKind::BigInt | FieldKind::Timestamp => {
                let number = match value {
                    Value::Number(n) => n.as_i64().or_else(|| {
                        n.as_f64()
                            .filter(|f| f.fract() == 0.0)
                            .filter(|f| (i64::MIN as f64..i64::MAX as f64).contains(f))
                            .map(|f| f as i64)
                    }),
                    Value::String(s) => s.trim().parse::<i64>().ok().or_else(|| {
                        if *self == FieldKind::Timestamp {
                            DateTime::parse_from_rfc3339(s)
                                .ok()
                                .map(|dt| dt.timestamp_millis())
                        } else {
                            None
                        }
                    }),
                    _ => None,
                };
                match self {
                    FieldKind::Integer => number
                        .and_then(|n| i32::try_from(n).ok())
                        .map(Value::from),
                    _ => number.map(Value::from),
                }
            }
            FieldKind::Text => match value {
                Value::String(_) => Some(value.clone()),
                Value::Number(n) => Some(Value::String(n.to_string())),
                Value::Bool(b) => Some(Value::String(b.to_string())),
                _ => None,
            },
            FieldKind::Boolean => match value {
                Value::Bool(_) => Some(value.clone()),
                Value::String(s) => match s.as_str() {
                    "true" => Some(Value::Bool(true)),
                    "false" => Some(Value::Bool(false)),
                    _ => None,
                },
                _ => None,
            },
        };

        coerced.ok_or_else(|| {
            LogbookError::ValidationError(format!("value {value} is not a valid {self:?}"))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
}

impl Field {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            nullable: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationKind {
    /// The source row holds `foreign_key` pointing at the target primary key
    BelongsTo { foreign_key: &'static str },
    /// Target rows hold `foreign_key` pointing at the source primary key
    HasMany { foreign_key: &'static str },
    /// Edges in `through` pair `source_key` with `target_key`
    ManyToMany {
        through: &'static str,
        source_key: &'static str,
        target_key: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
    pub name: &'static str,
    pub target: &'static str,
    pub kind: AssociationKind,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ModelDefinition {
    pub name: &'static str,
    pub table: &'static str,
    pub primary_key: Option<&'static str>,
    pub fields: &'static [Field],
    pub associations: &'static [Association],
    /// Fields whose combined values must be unique across rows
    pub unique_key: &'static [&'static str],
}

impl ModelDefinition {
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn require_field(&self, name: &str) -> Result<&'static Field> {
        self.field(name)
            .ok_or_else(|| LogbookError::unknown_field(self.name, name))
    }

    pub fn association(&self, name: &str) -> Option<&'static Association> {
        self.associations.iter().find(|a| a.name == name)
    }

    pub fn require_primary_key(&self) -> Result<&'static Field> {
        let name = self.primary_key.ok_or_else(|| {
            LogbookError::ConfigurationError(format!("model '{}' has no primary key", self.name))
        })?;
        self.require_field(name)
    }
}

/// Registry of every model a store knows about
#[derive(Debug, Clone, Default)]
pub struct Schema {
    models: HashMap<&'static str, &'static ModelDefinition>,
}

impl Schema {
    pub fn new(models: &[&'static ModelDefinition]) -> Self {
        Self {
            models: models.iter().map(|m| (m.name, *m)).collect(),
        }
    }

    pub fn model(&self, name: &str) -> Result<&'static ModelDefinition> {
        self.models
            .get(name)
            .copied()
            .ok_or_else(|| LogbookError::unknown_model(name))
    }

    pub fn models(&self) -> impl Iterator<Item = &'static ModelDefinition> + '_ {
        self.models.values().copied()
    }
}
