//! Error types for store operations.

use taskflow_core::{CategoryId, TaskId};
use thiserror::Error;

/// Errors raised by [`TaskStore`](crate::TaskStore) and
/// [`CategoryStore`](crate::CategoryStore) mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The targeted task does not exist.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// The targeted category does not exist.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),
}

impl StoreError {
    /// Whether the error reports a missing entity.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound(_) | Self::CategoryNotFound(_))
    }
}

/// Result alias for store mutations.
pub type StoreResult<T> = Result<T, StoreError>;
