//! Shared fixtures for the integration tests

#![allow(dead_code)]

pub mod counting;
pub mod fixtures;
pub mod strategies;

pub use counting::*;
pub use fixtures::*;
