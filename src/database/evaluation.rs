//! In-process evaluation of resolved predicates.
//!
//! Mirrors SQL three-valued logic: `None` stands for UNKNOWN, produced by any
//! comparison against a NULL field. A row is kept only when its filter
//! evaluates to `Some(true)`.

use super::executor::Record;
use super::resolve::{ResolvedClause, ResolvedCondition};
use crate::error::{LogbookError, Result};
use crate::query_builder::{Comparison, LogicalOperator, Predicate};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// Evaluates an opaque literal expression for one record
pub type LiteralMatcher = Arc<dyn Fn(&Record, &[(String, Value)]) -> bool + Send + Sync>;

/// Total order over JSON scalars of the same kind; `None` for mixed kinds or NULL
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn equals(a: &Value, b: &Value) -> bool {
    compare_values(a, b) == Some(Ordering::Equal)
}

/// Evaluate one field predicate against a field value
pub fn evaluate_predicate(value: &Value, predicate: &Predicate, negated: bool) -> Option<bool> {
    if let Predicate::IsNull = predicate {
        return Some(value.is_null() != negated);
    }
    if value.is_null() {
        return None;
    }

    let outcome = match predicate {
        Predicate::Is(expected) => equals(value, expected),
        Predicate::OneOf(values) => values.iter().any(|v| equals(value, v)),
        // Negation distributes over each equality of the conjunction
        Predicate::AllOf(values) => {
            return Some(values.iter().all(|v| equals(value, v) != negated));
        }
        Predicate::Between(lo, hi) => {
            matches!(
                compare_values(value, lo),
                Some(Ordering::Greater | Ordering::Equal)
            ) && matches!(
                compare_values(value, hi),
                Some(Ordering::Less | Ordering::Equal)
            )
        }
        Predicate::Substring(text) => value
            .as_str()
            .map(|s| s.to_lowercase().contains(&text.to_lowercase()))
            .unwrap_or(false),
        Predicate::StartsWith(text) => value.as_str().map(|s| s.starts_with(text.as_str())).unwrap_or(false),
        Predicate::EndsWith(text) => value.as_str().map(|s| s.ends_with(text.as_str())).unwrap_or(false),
        Predicate::Compare(comparison, bound) => match compare_values(value, bound) {
            Some(ordering) => match comparison {
                Comparison::LowerThan => ordering == Ordering::Less,
                Comparison::LowerThanOrEqual => ordering != Ordering::Greater,
                Comparison::GreaterThan => ordering == Ordering::Greater,
                Comparison::GreaterThanOrEqual => ordering != Ordering::Less,
            },
            None => return None,
        },
        Predicate::IsNull => unreachable!("handled above"),
    };

    Some(outcome != negated)
}

pub fn evaluate_condition(
    record: &Record,
    condition: &ResolvedCondition,
    literals: &HashMap<String, LiteralMatcher>,
) -> Result<Option<bool>> {
    match condition {
        ResolvedCondition::Field {
            field,
            predicate,
            negated,
        } => {
            let value = record.get(field.name).unwrap_or(&Value::Null);
            Ok(evaluate_predicate(value, predicate, *negated))
        }
        ResolvedCondition::Literal { expression, params } => {
            let matcher = literals.get(expression).ok_or_else(|| {
                LogbookError::DatabaseError(format!(
                    "no evaluator registered for literal expression '{expression}'"
                ))
            })?;
            Ok(Some(matcher(record, params)))
        }
        ResolvedCondition::Group(clause) => evaluate_clause(record, clause, literals),
    }
}

pub fn evaluate_clause(
    record: &Record,
    clause: &ResolvedClause,
    literals: &HashMap<String, LiteralMatcher>,
) -> Result<Option<bool>> {
    let mut outcome = Some(clause.operator == LogicalOperator::And);
    for condition in &clause.conditions {
        let value = evaluate_condition(record, condition, literals)?;
        outcome = match clause.operator {
            LogicalOperator::And => match (outcome, value) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
            LogicalOperator::Or => match (outcome, value) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
        };
    }
    Ok(outcome)
}

/// Whether `record` passes every clause of a filter
pub fn matches_filter(
    record: &Record,
    filter: &[ResolvedClause],
    literals: &HashMap<String, LiteralMatcher>,
) -> Result<bool> {
    for clause in filter {
        if evaluate_clause(record, clause, literals)? != Some(true) {
            return Ok(false);
        }
    }
    Ok(true)
}
