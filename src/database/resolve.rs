//! Resolution of a [`QueryBuilder`] against a model definition.
//!
//! Resolution is the single compile step between the builder and a store: names
//! become field references, values are coerced to field kinds and associations
//! used by includes or sort keys are looked up. Stores only ever see the result.

use super::schema::{Association, Field, FieldKind, ModelDefinition, Schema};
use crate::error::{LogbookError, Result};
use crate::query_builder::{
    Condition, Include, LogicalOperator, Pagination, Predicate, QueryBuilder, SortDirection,
    WhereClause,
};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery {
    pub model: &'static ModelDefinition,
    /// Projected fields, in model order unless an explicit selection was given
    pub select: Vec<&'static Field>,
    /// Clauses combined with AND
    pub filter: Vec<ResolvedClause>,
    pub order: Vec<ResolvedOrder>,
    pub pagination: Option<Pagination>,
    pub includes: Vec<ResolvedInclude>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedClause {
    pub conditions: Vec<ResolvedCondition>,
    pub operator: LogicalOperator,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedCondition {
    Field {
        field: &'static Field,
        predicate: Predicate,
        negated: bool,
    },
    Literal {
        expression: String,
        params: Vec<(String, Value)>,
    },
    Group(ResolvedClause),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderKey {
    Field(&'static Field),
    Association {
        association: &'static Association,
        target: &'static ModelDefinition,
        field: &'static Field,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOrder {
    pub key: OrderKey,
    pub direction: SortDirection,
}

/// A validated include; loading it is the repository's job
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInclude {
    pub association: &'static Association,
    pub target: &'static ModelDefinition,
    pub include: Include,
}

impl Schema {
    /// Resolve `query` against the model called `model`
    pub fn resolve(&self, model: &str, query: &QueryBuilder) -> Result<ResolvedQuery> {
        let model = self.model(model)?;

        let select = match query.selected_fields() {
            Some(fields) => fields
                .iter()
                .map(|f| model.require_field(f))
                .collect::<Result<Vec<_>>>()?,
            None => model.fields.iter().collect(),
        };

        let filter = query
            .where_clauses()
            .iter()
            .map(|clause| resolve_clause(model, clause))
            .collect::<Result<Vec<_>>>()?;

        let order = query
            .order()
            .iter()
            .map(|order| {
                let key = match order.through.as_deref() {
                    None => OrderKey::Field(model.require_field(&order.field)?),
                    Some(name) => {
                        let association = model
                            .association(name)
                            .ok_or_else(|| LogbookError::unknown_association(model.name, name))?;
                        let target = self.model(association.target)?;
                        OrderKey::Association {
                            association,
                            target,
                            field: target.require_field(&order.field)?,
                        }
                    }
                };
                Ok(ResolvedOrder {
                    key,
                    direction: order.direction,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let includes = query
            .includes()
            .iter()
            .map(|include| self.resolve_include(model, include))
            .collect::<Result<Vec<_>>>()?;

        Ok(ResolvedQuery {
            model,
            select,
            filter,
            order,
            pagination: query.pagination(),
            includes,
        })
    }

    fn resolve_include(
        &self,
        model: &'static ModelDefinition,
        include: &Include,
    ) -> Result<ResolvedInclude> {
        let association = model
            .association(&include.association)
            .ok_or_else(|| LogbookError::unknown_association(model.name, &include.association))?;
        let target = self.model(association.target)?;

        if let Some(attributes) = &include.attributes {
            for attribute in attributes {
                target.require_field(attribute)?;
            }
        }
        for condition in &include.conditions {
            resolve_condition(target, condition)?;
        }

        Ok(ResolvedInclude {
            association,
            target,
            include: include.clone(),
        })
    }
}

fn resolve_clause(model: &'static ModelDefinition, clause: &WhereClause) -> Result<ResolvedClause> {
    Ok(ResolvedClause {
        conditions: clause
            .conditions
            .iter()
            .map(|c| resolve_condition(model, c))
            .collect::<Result<Vec<_>>>()?,
        operator: clause.operator,
    })
}

fn resolve_condition(
    model: &'static ModelDefinition,
    condition: &Condition,
) -> Result<ResolvedCondition> {
    match condition {
        Condition::Field {
            field,
            predicate,
            negated,
        } => {
            let field = model.require_field(field)?;
            Ok(ResolvedCondition::Field {
                field,
                predicate: coerce_predicate(field, predicate)?,
                negated: *negated,
            })
        }
        Condition::Literal { expression, params } => Ok(ResolvedCondition::Literal {
            expression: expression.clone(),
            params: params.clone(),
        }),
        Condition::Group(clause) => Ok(ResolvedCondition::Group(resolve_clause(model, clause)?)),
    }
}

fn coerce_predicate(field: &'static Field, predicate: &Predicate) -> Result<Predicate> {
    if predicate.is_textual() && field.kind != FieldKind::Text {
        return Err(LogbookError::ValidationError(format!(
            "text matching is not supported on {:?} field '{}'",
            field.kind, field.name
        )));
    }

    let coerce = |v: &Value| field.kind.coerce(v);
    let coerce_all = |values: &[Value]| values.iter().map(coerce).collect::<Result<Vec<_>>>();

    Ok(match predicate {
        Predicate::Is(v) => Predicate::Is(coerce(v)?),
        Predicate::OneOf(values) => Predicate::OneOf(coerce_all(values)?),
        Predicate::AllOf(values) => Predicate::AllOf(coerce_all(values)?),
        Predicate::Between(lo, hi) => Predicate::Between(coerce(lo)?, coerce(hi)?),
        Predicate::Compare(comparison, v) => Predicate::Compare(*comparison, coerce(v)?),
        Predicate::Substring(_)
        | Predicate::StartsWith(_)
        | Predicate::EndsWith(_)
        | Predicate::IsNull => predicate.clone(),
    })
}
