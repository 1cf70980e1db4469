//! Application layer for taskflow.
//!
//! This crate owns the task and category stores, seed loading, configuration,
//! and the service façade shared by front ends.

pub mod category_store;
pub mod config;
pub mod error;
pub mod filter_util;
pub mod fixture;
pub mod service;
pub mod table;
pub mod task_patch;
pub mod task_store;

// Re-exports for convenience
pub use category_store::CategoryStore;
pub use config::{Defaults, FixtureConfig, ProjectConfig};
pub use error::{StoreError, StoreResult};
pub use filter_util::{
    FilterBuildError, TaskQueryBuilder, parse_due_date, parse_priority, parse_priority_filter,
};
pub use fixture::{Fixture, FixtureError};
pub use service::TaskflowService;
pub use task_patch::{CategoryLink, CategoryPatch, DueDatePatch, TaskPatch};
pub use task_store::TaskStore;
