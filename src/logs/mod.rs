//! # Log Listing
//!
//! The `GetAllLogs` use case and its request/response shapes.

pub mod adapter;
pub mod dto;
pub mod get_all_logs;

pub use adapter::{to_entity, LogEntity};
pub use dto::{CreatedRange, GetAllLogsDto, LogFilter, LogQuery, LogSort, PageRequest};
pub use get_all_logs::{
    content_search_matches, GetAllLogsResult, GetAllLogsUseCase, CONTENT_SEARCH_EXPRESSION,
    CONTENT_SEARCH_PARAM,
};
