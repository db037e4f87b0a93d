//! PostgreSQL rendering of resolved queries.
//!
//! Every value reaches the database as a bound parameter; identifiers come
//! from static model definitions and are always quoted.

use super::resolve::{OrderKey, ResolvedClause, ResolvedCondition, ResolvedQuery};
use super::schema::{AssociationKind, Field, FieldKind, ModelDefinition, Schema};
use crate::error::{LogbookError, Result};
use crate::query_builder::{Join, LogicalOperator, Predicate, SortDirection};
use serde_json::Value;

/// A value to bind, with the kind that decides its SQL type
#[derive(Debug, Clone, PartialEq)]
pub struct SqlParam {
    pub value: Value,
    pub kind: FieldKind,
}

impl SqlParam {
    /// Parameter of a literal expression, typed from its JSON shape
    fn inferred(value: &Value) -> Self {
        let kind = match value {
            Value::Number(_) => FieldKind::BigInt,
            Value::Bool(_) => FieldKind::Boolean,
            _ => FieldKind::Text,
        };
        Self {
            value: value.clone(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn column(table: &str, field: &str) -> String {
    format!("{}.{}", quote_ident(table), quote_ident(field))
}

/// Escape LIKE wildcards so user text only ever matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

struct Renderer<'a> {
    schema: &'a Schema,
    model: &'static ModelDefinition,
    params: Vec<SqlParam>,
}

impl<'a> Renderer<'a> {
    fn new(schema: &'a Schema, model: &'static ModelDefinition) -> Self {
        Self {
            schema,
            model,
            params: Vec::new(),
        }
    }

    fn bind(&mut self, value: Value, kind: FieldKind) -> String {
        self.params.push(SqlParam { value, kind });
        format!("${}", self.params.len())
    }

    fn select_list(&self, fields: &[&'static Field]) -> String {
        fields
            .iter()
            .map(|field| {
                let col = column(self.model.table, field.name);
                match field.kind {
                    FieldKind::Timestamp => format!(
                        "(EXTRACT(EPOCH FROM {col}) * 1000)::BIGINT AS {}",
                        quote_ident(field.name)
                    ),
                    _ => format!("{col} AS {}", quote_ident(field.name)),
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn where_sql(&mut self, filter: &[ResolvedClause]) -> Result<String> {
        if filter.is_empty() {
            return Ok(String::new());
        }
        let parts = filter
            .iter()
            .map(|clause| self.clause(clause))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!(" WHERE {}", parts.join(" AND ")))
    }

    fn clause(&mut self, clause: &ResolvedClause) -> Result<String> {
        if clause.conditions.is_empty() {
            return Ok(match clause.operator {
                LogicalOperator::And => "TRUE".to_string(),
                LogicalOperator::Or => "FALSE".to_string(),
            });
        }
        let parts = clause
            .conditions
            .iter()
            .map(|condition| self.condition(condition))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("({})", parts.join(clause.operator.to_sql())))
    }

    fn condition(&mut self, condition: &ResolvedCondition) -> Result<String> {
        match condition {
            ResolvedCondition::Field {
                field,
                predicate,
                negated,
            } => Ok(self.predicate(field, predicate, *negated)),
            ResolvedCondition::Literal { expression, params } => self.literal(expression, params),
            ResolvedCondition::Group(clause) => self.clause(clause),
        }
    }

    fn predicate(&mut self, field: &'static Field, predicate: &Predicate, negated: bool) -> String {
        let col = column(self.model.table, field.name);
        let kind = field.kind;

        let positive = match predicate {
            Predicate::IsNull => {
                return if negated {
                    format!("{col} IS NOT NULL")
                } else {
                    format!("{col} IS NULL")
                };
            }
            Predicate::OneOf(values) if values.is_empty() => {
                return if negated {
                    format!("{col} IS NOT NULL")
                } else {
                    "FALSE".to_string()
                };
            }
            Predicate::AllOf(values) => {
                if values.is_empty() {
                    return format!("{col} IS NOT NULL");
                }
                let operator = if negated { "<>" } else { "=" };
                let parts: Vec<String> = values
                    .iter()
                    .map(|v| format!("{col} {operator} {}", self.bind(v.clone(), kind)))
                    .collect();
                return format!("({})", parts.join(" AND "));
            }
            Predicate::Is(value) => format!("{col} = {}", self.bind(value.clone(), kind)),
            Predicate::OneOf(values) => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|v| self.bind(v.clone(), kind))
                    .collect();
                format!("{col} IN ({})", placeholders.join(", "))
            }
            Predicate::Between(lo, hi) => {
                let lo = self.bind(lo.clone(), kind);
                let hi = self.bind(hi.clone(), kind);
                format!("{col} BETWEEN {lo} AND {hi}")
            }
            Predicate::Substring(text) => format!(
                "{col} ILIKE {}",
                self.bind(Value::String(format!("%{}%", escape_like(text))), kind)
            ),
            Predicate::StartsWith(text) => format!(
                "{col} LIKE {}",
                self.bind(Value::String(format!("{}%", escape_like(text))), kind)
            ),
            Predicate::EndsWith(text) => format!(
                "{col} LIKE {}",
                self.bind(Value::String(format!("%{}", escape_like(text))), kind)
            ),
            Predicate::Compare(comparison, value) => format!(
                "{col} {} {}",
                comparison.to_sql(),
                self.bind(value.clone(), kind)
            ),
        };

        if negated {
            format!("NOT ({positive})")
        } else {
            positive
        }
    }

    /// Replace `:name` placeholders with positional parameters; `::` casts pass through
    fn literal(&mut self, expression: &str, params: &[(String, Value)]) -> Result<String> {
        let mut sql = String::with_capacity(expression.len());
        let mut chars = expression.chars().peekable();

        while let Some(c) = chars.next() {
            if c != ':' {
                sql.push(c);
                continue;
            }
            match chars.peek() {
                Some(':') => {
                    sql.push_str("::");
                    chars.next();
                }
                Some(next) if next.is_ascii_alphabetic() || *next == '_' => {
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if n.is_ascii_alphanumeric() || n == '_' {
                            name.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    let (_, value) = params.iter().find(|(key, _)| *key == name).ok_or_else(|| {
                        LogbookError::ValidationError(format!(
                            "literal expression references unbound parameter ':{name}'"
                        ))
                    })?;
                    self.params.push(SqlParam::inferred(value));
                    sql.push_str(&format!("${}", self.params.len()));
                }
                _ => sql.push(c),
            }
        }

        Ok(sql)
    }

    fn order_sql(&self, query: &ResolvedQuery) -> Result<String> {
        if query.order.is_empty() {
            return Ok(String::new());
        }
        let keys = query
            .order
            .iter()
            .map(|order| {
                let expression = self.order_expression(&order.key, order.direction)?;
                let nulls = match order.direction {
                    SortDirection::Asc => "NULLS LAST",
                    SortDirection::Desc => "NULLS FIRST",
                };
                Ok(format!("{expression} {} {nulls}", order.direction.to_sql()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(format!(" ORDER BY {}", keys.join(", ")))
    }

    fn order_expression(&self, key: &OrderKey, direction: SortDirection) -> Result<String> {
        let collated = |table: &str, field: &Field| {
            let col = column(table, field.name);
            if field.kind == FieldKind::Text {
                format!("{col} COLLATE \"C\"")
            } else {
                col
            }
        };

        let (association, target, field) = match key {
            OrderKey::Field(field) => return Ok(collated(self.model.table, *field)),
            OrderKey::Association {
                association,
                target,
                field,
            } => (association, target, field),
        };

        let aggregate = match direction {
            SortDirection::Asc => "MIN",
            SortDirection::Desc => "MAX",
        };
        let value = format!("{aggregate}({})", collated(target.table, *field));

        let subquery = match association.kind {
            AssociationKind::BelongsTo { foreign_key } => {
                let target_pk = target.require_primary_key()?;
                format!(
                    "SELECT {value} FROM {} WHERE {} = {}",
                    quote_ident(target.table),
                    column(target.table, target_pk.name),
                    column(self.model.table, foreign_key)
                )
            }
            AssociationKind::HasMany { foreign_key } => {
                let pk = self.model.require_primary_key()?;
                format!(
                    "SELECT {value} FROM {} WHERE {} = {}",
                    quote_ident(target.table),
                    column(target.table, foreign_key),
                    column(self.model.table, pk.name)
                )
            }
            AssociationKind::ManyToMany {
                through,
                source_key,
                target_key,
            } => {
                let through = self.schema.model(through)?;
                let pk = self.model.require_primary_key()?;
                let target_pk = target.require_primary_key()?;
                let join = Join::inner(
                    &quote_ident(target.table),
                    &format!(
                        "{} = {}",
                        column(target.table, target_pk.name),
                        column(through.table, target_key)
                    ),
                );
                format!(
                    "SELECT {value} FROM {} {} WHERE {} = {}",
                    quote_ident(through.table),
                    join.to_sql(),
                    column(through.table, source_key),
                    column(self.model.table, pk.name)
                )
            }
        };

        Ok(format!("({subquery})"))
    }
}

/// Render the rows query: projection, filter, order and pagination
pub fn render_select(schema: &Schema, query: &ResolvedQuery) -> Result<SqlStatement> {
    let mut renderer = Renderer::new(schema, query.model);
    let mut sql = format!(
        "SELECT {} FROM {}",
        renderer.select_list(&query.select),
        quote_ident(query.model.table)
    );
    sql.push_str(&renderer.where_sql(&query.filter)?);
    sql.push_str(&renderer.order_sql(query)?);
    if let Some(pagination) = &query.pagination {
        sql.push_str(&pagination.to_sql());
    }
    Ok(SqlStatement {
        sql,
        params: renderer.params,
    })
}

/// Render the count query; order and pagination do not apply
pub fn render_count(schema: &Schema, query: &ResolvedQuery) -> Result<SqlStatement> {
    let mut renderer = Renderer::new(schema, query.model);
    let mut sql = format!("SELECT COUNT(*) FROM {}", quote_ident(query.model.table));
    sql.push_str(&renderer.where_sql(&query.filter)?);
    Ok(SqlStatement {
        sql,
        params: renderer.params,
    })
}
