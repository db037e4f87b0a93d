//! # Services
//!
//! Reusable query logic shared by the use cases.

pub mod filter_resolver;
pub mod statistics;

pub use filter_resolver::{AssociationFilter, FilterDimension, FilterOperation, FilterResolver};
pub use statistics::{FillStatistics, FillStatisticsWindow, StatisticsService};
