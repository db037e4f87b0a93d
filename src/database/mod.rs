//! # Database Layer
//!
//! Model definitions, query resolution and the storage adapters.
//!
//! ## Key Components
//!
//! - [`schema`] - Model definitions and the schema registry
//! - [`resolve`] - Compiles a [`QueryBuilder`](crate::query_builder::QueryBuilder) against a model
//! - [`executor`] - The `Store` / `Transaction` / `Executor` boundary
//! - [`memory`] - In-memory store with snapshot-per-transaction reads
//! - [`postgres`] - PostgreSQL store over a sqlx pool
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use logbook_core::config::LogbookConfig;
//! use logbook_core::database::{PgStore, Store};
//! use logbook_core::models::logbook_schema;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LogbookConfig::from_env()?;
//! let store = PgStore::connect(&config.database, Arc::new(logbook_schema())).await?;
//! let tx = store.begin().await?;
//! tx.commit().await?;
//! # Ok(())
//! # }
//! ```

pub mod evaluation;
pub mod executor;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod resolve;
pub mod schema;
pub mod sql;

pub use executor::{finish, Executor, Record, Store, Transaction};
pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PgStore;
pub use resolve::{OrderKey, ResolvedClause, ResolvedCondition, ResolvedInclude, ResolvedOrder, ResolvedQuery};
pub use schema::{Association, AssociationKind, Field, FieldKind, ModelDefinition, Schema};
pub use sql::{render_count, render_select, SqlParam, SqlStatement};
