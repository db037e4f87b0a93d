use super::conditions::{Comparison, Condition, Predicate, WhereClause};
use super::joins::Include;
use super::ordering::{OrderBy, SortDirection};
use super::Pagination;
use serde_json::Value;

/// Main query builder
///
/// Accumulates conditions, includes, sort keys and pagination into an inert
/// representation. Nothing is executed here: a repository resolves the builder
/// against a model definition and hands the result to a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    select_fields: Option<Vec<String>>,
    includes: Vec<Include>,
    where_clauses: Vec<WhereClause>,
    order_by: Vec<OrderBy>,
    pagination: Option<Pagination>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set specific fields to select
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select_fields = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Start a predicate on `field`
    pub fn where_field(self, field: &str) -> FieldPredicate {
        FieldPredicate {
            builder: self,
            field: field.to_string(),
            negated: false,
        }
    }

    /// Add a WHERE clause
    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clauses.push(clause);
        self
    }

    /// Add a single condition
    pub fn where_condition(self, condition: Condition) -> Self {
        self.where_clause(WhereClause::single(condition))
    }

    /// Add a disjunction: at least one of the conditions must hold
    pub fn where_any(self, conditions: Vec<Condition>) -> Self {
        self.where_clause(WhereClause::or(conditions))
    }

    /// Add an opaque predicate; values are always bound through `params`
    pub fn literal_where<I, K>(self, expression: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.where_condition(Condition::Literal {
            expression: expression.to_string(),
            params: params.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }

    /// Load an association alongside the primary rows
    pub fn include(mut self, include: impl Into<Include>) -> Self {
        self.includes.push(include.into());
        self
    }

    /// Add a sort key; earlier keys take precedence
    pub fn order_by(mut self, field: &str, direction: SortDirection, through: Option<&str>) -> Self {
        self.order_by.push(OrderBy {
            field: field.to_string(),
            direction,
            through: through.map(str::to_string),
        });
        self
    }

    /// Add ORDER BY ASC
    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, SortDirection::Asc, None)
    }

    /// Add ORDER BY DESC
    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, SortDirection::Desc, None)
    }

    /// Add LIMIT clause
    pub fn limit(mut self, limit: u32) -> Self {
        if let Some(ref mut pagination) = self.pagination {
            pagination.limit = Some(limit);
        } else {
            self.pagination = Some(Pagination::limit_only(limit));
        }
        self
    }

    /// Add OFFSET clause
    pub fn offset(mut self, offset: u32) -> Self {
        if let Some(ref mut pagination) = self.pagination {
            pagination.offset = Some(offset);
        } else {
            self.pagination = Some(Pagination::offset_only(offset));
        }
        self
    }

    pub fn selected_fields(&self) -> Option<&[String]> {
        self.select_fields.as_deref()
    }

    pub fn where_clauses(&self) -> &[WhereClause] {
        &self.where_clauses
    }

    pub fn includes(&self) -> &[Include] {
        &self.includes
    }

    pub fn order(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }
}

/// Predicate builder scoped to one field
///
/// `not()` negates the next combinator only. Every combinator hands the
/// builder back so calls keep chaining.
#[derive(Debug, Clone)]
pub struct FieldPredicate {
    builder: QueryBuilder,
    field: String,
    negated: bool,
}

impl FieldPredicate {
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn is(self, value: impl Into<Value>) -> QueryBuilder {
        self.push(Predicate::Is(value.into()))
    }

    pub fn one_of<I, V>(self, values: I) -> QueryBuilder
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push(Predicate::OneOf(values.into_iter().map(Into::into).collect()))
    }

    pub fn all_of<I, V>(self, values: I) -> QueryBuilder
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push(Predicate::AllOf(values.into_iter().map(Into::into).collect()))
    }

    pub fn between(self, lo: impl Into<Value>, hi: impl Into<Value>) -> QueryBuilder {
        self.push(Predicate::Between(lo.into(), hi.into()))
    }

    pub fn substring(self, text: &str) -> QueryBuilder {
        self.push(Predicate::Substring(text.to_string()))
    }

    pub fn starts_with(self, text: &str) -> QueryBuilder {
        self.push(Predicate::StartsWith(text.to_string()))
    }

    pub fn ends_with(self, text: &str) -> QueryBuilder {
        self.push(Predicate::EndsWith(text.to_string()))
    }

    pub fn lower_than(self, value: impl Into<Value>) -> QueryBuilder {
        self.push(Predicate::Compare(Comparison::LowerThan, value.into()))
    }

    pub fn lower_than_or_equal(self, value: impl Into<Value>) -> QueryBuilder {
        self.push(Predicate::Compare(Comparison::LowerThanOrEqual, value.into()))
    }

    pub fn greater_than(self, value: impl Into<Value>) -> QueryBuilder {
        self.push(Predicate::Compare(Comparison::GreaterThan, value.into()))
    }

    pub fn greater_than_or_equal(self, value: impl Into<Value>) -> QueryBuilder {
        self.push(Predicate::Compare(Comparison::GreaterThanOrEqual, value.into()))
    }

    pub fn is_null(self) -> QueryBuilder {
        self.push(Predicate::IsNull)
    }

    fn push(self, predicate: Predicate) -> QueryBuilder {
        let condition = Condition::Field {
            field: self.field,
            predicate,
            negated: self.negated,
        };
        self.builder.where_condition(condition)
    }
}
