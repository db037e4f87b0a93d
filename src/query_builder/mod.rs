//! # Query Builder System
//!
//! Declarative query construction that never touches storage directly.
//!
//! ## Overview
//!
//! A [`QueryBuilder`] accumulates predicates, includes, sort keys and pagination
//! into an intermediate representation. Repositories resolve it against a model
//! definition (see [`crate::database::schema`]) which validates every field and
//! association name, and a store then executes the resolved query.
//!
//! ## Key Components
//!
//! - [`builder`] - The fluent builder and its field-scoped predicate builder
//! - [`conditions`] - Predicates, conditions and WHERE clauses
//! - [`joins`] - Association includes and SQL JOIN rendering
//! - [`ordering`] - Sort keys, optionally through an association
//! - [`pagination`] - LIMIT/OFFSET windows
//!
//! ## Example Usage
//!
//! ```rust
//! use logbook_core::query_builder::{QueryBuilder, SortDirection};
//!
//! let query = QueryBuilder::new()
//!     .include("tags")
//!     .where_field("title").substring("beam dump")
//!     .where_field("id").not().between(1, 3)
//!     .order_by("text", SortDirection::Asc, Some("tags"))
//!     .limit(25);
//! assert_eq!(query.where_clauses().len(), 2);
//! ```

pub mod builder;
pub mod conditions;
pub mod joins;
pub mod ordering;
pub mod pagination;

pub use builder::{FieldPredicate, QueryBuilder};
pub use conditions::{Comparison, Condition, LogicalOperator, Predicate, WhereClause};
pub use joins::{Include, Join};
pub use ordering::{OrderBy, SortDirection};
pub use pagination::Pagination;
