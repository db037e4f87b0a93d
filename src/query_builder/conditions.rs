use serde_json::Value;

/// Ordering comparison against a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LowerThan,
    LowerThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl Comparison {
    pub fn to_sql(&self) -> &'static str {
        match self {
            Comparison::LowerThan => "<",
            Comparison::LowerThanOrEqual => "<=",
            Comparison::GreaterThan => ">",
            Comparison::GreaterThanOrEqual => ">=",
        }
    }
}

/// A predicate applied to a single field value
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Is(Value),
    OneOf(Vec<Value>),
    /// Conjunction of equalities; negation applies to each equality
    AllOf(Vec<Value>),
    /// Inclusive on both ends
    Between(Value, Value),
    /// Case-insensitive contains
    Substring(String),
    StartsWith(String),
    EndsWith(String),
    Compare(Comparison, Value),
    IsNull,
}

impl Predicate {
    /// Whether the predicate only makes sense on text fields
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Predicate::Substring(_) | Predicate::StartsWith(_) | Predicate::EndsWith(_)
        )
    }
}

/// Represents the different kinds of conditions a query can carry
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Field {
        field: String,
        predicate: Predicate,
        negated: bool,
    },
    /// Opaque expression executed verbatim by the store, with named `:param` placeholders
    Literal {
        expression: String,
        params: Vec<(String, Value)>,
    },
    Group(WhereClause),
}

impl Condition {
    pub fn field(field: &str, predicate: Predicate) -> Self {
        Condition::Field {
            field: field.to_string(),
            predicate,
            negated: false,
        }
    }

    pub fn is(field: &str, value: impl Into<Value>) -> Self {
        Self::field(field, Predicate::Is(value.into()))
    }

    pub fn one_of<I, V>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::field(
            field,
            Predicate::OneOf(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn compare(field: &str, comparison: Comparison, value: impl Into<Value>) -> Self {
        Self::field(field, Predicate::Compare(comparison, value.into()))
    }

    pub fn is_null(field: &str) -> Self {
        Self::field(field, Predicate::IsNull)
    }

    /// All of the given conditions must hold
    pub fn all(conditions: Vec<Condition>) -> Self {
        Condition::Group(WhereClause::and(conditions))
    }

    /// At least one of the given conditions must hold
    pub fn any(conditions: Vec<Condition>) -> Self {
        Condition::Group(WhereClause::or(conditions))
    }
}

/// Represents a WHERE clause that can contain multiple conditions
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub conditions: Vec<Condition>,
    pub operator: LogicalOperator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn to_sql(&self) -> &'static str {
        match self {
            LogicalOperator::And => " AND ",
            LogicalOperator::Or => " OR ",
        }
    }
}

impl WhereClause {
    /// Create a WHERE clause with a single condition
    pub fn single(condition: Condition) -> Self {
        Self {
            conditions: vec![condition],
            operator: LogicalOperator::And,
        }
    }

    /// Combine multiple conditions with AND
    pub fn and(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::And,
        }
    }

    /// Combine multiple conditions with OR
    pub fn or(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::Or,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_constructors() {
        let any = Condition::any(vec![Condition::is_null("end"), Condition::is("end", 5)]);
        match any {
            Condition::Group(clause) => {
                assert_eq!(clause.operator, LogicalOperator::Or);
                assert_eq!(clause.conditions.len(), 2);
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn test_textual_predicates() {
        assert!(Predicate::Substring("x".into()).is_textual());
        assert!(!Predicate::Is(Value::from(1)).is_textual());
    }
}
