#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Logbook Core
//!
//! Query construction, multi-dimensional log filtering and fill statistics
//! for the electronic logbook.
//!
//! ## Overview
//!
//! Callers describe what they want with a [`QueryBuilder`]: predicates,
//! includes, sort keys and a page window. The builder is resolved against the
//! logbook [`Schema`](database::Schema), which validates every name and
//! coerces every value, and the result runs inside a transaction opened on a
//! [`Store`](database::Store). Two stores ship: PostgreSQL through sqlx and an
//! in-memory store with snapshot reads.
//!
//! On top of that sit two consumers:
//!
//! - [`logs::GetAllLogsUseCase`] lists logs with scalar filters, AND/OR
//!   association filters over tags, runs, fills and environments, sorting,
//!   pagination and reply counts.
//! - [`services::StatisticsService`] computes per-fill efficiency figures for
//!   a time window.
//!
//! ## Module Organization
//!
//! - [`query_builder`] - Fluent, inert query representation
//! - [`database`] - Schema, resolution and the storage adapters
//! - [`models`] - Logbook model definitions and entities
//! - [`repositories`] - Typed reads with include loading
//! - [`services`] - Filter resolution and fill statistics
//! - [`logs`] - The log listing use case
//! - [`config`] - Layered configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logbook_core::config::LogbookConfig;
//! use logbook_core::database::PgStore;
//! use logbook_core::logs::{GetAllLogsDto, GetAllLogsUseCase};
//! use logbook_core::models::logbook_schema;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! logbook_core::logging::init_structured_logging();
//! let config = LogbookConfig::from_env()?;
//! let store = PgStore::connect(&config.database, Arc::new(logbook_schema())).await?;
//!
//! let use_case = GetAllLogsUseCase::new(Arc::new(store), config.pagination.clone());
//! let result = use_case.execute(GetAllLogsDto::default()).await?;
//! println!("{} logs", result.count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit and integration tests against the in-memory store
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod logs;
pub mod models;
pub mod query_builder;
pub mod repositories;
pub mod services;

pub use config::{DatabaseConfig, LogbookConfig, PaginationConfig};
pub use error::{LogbookError, Result};
pub use query_builder::{Condition, Include, QueryBuilder, SortDirection};
