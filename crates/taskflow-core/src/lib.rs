//! Domain types, queries and statistics for taskflow.

/// Injectable time source.
pub mod clock;
/// Identifier types.
pub mod id;
/// Task priority levels.
pub mod priority;
/// Status/priority filtering and single-key sorting.
pub mod query;
/// Aggregate counts over task snapshots.
pub mod stats;
/// Case-insensitive text search.
pub mod text_matcher;
/// Timestamp parsing and serde helpers.
pub mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use id::{CategoryId, TaskId};
pub use priority::Priority;
pub use query::{SortKey, SortOrder, StatusFilter, TaskQuery, apply_filters, is_overdue};
pub use stats::{CompletedStats, TaskStats, completed_stats, task_stats};
pub use text_matcher::TextMatcher;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Color assigned to categories created without an explicit one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6366F1";

/// A unit of work with optional schedule, priority and completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier, immutable once assigned.
    pub id: TaskId,
    /// Short summary. Callers keep it non-empty; the store does not check.
    pub title: String,
    /// Free-form details.
    #[serde(default)]
    pub description: String,
    /// Optional category reference. Not checked against the category store.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Urgency.
    #[serde(default)]
    pub priority: Priority,
    /// Deadline; `None` means no deadline.
    #[serde(default, with = "timestamp::option")]
    pub due_date: Option<OffsetDateTime>,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
    /// Creation instant, immutable.
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
    /// Instant of the most recent transition to completed.
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<OffsetDateTime>,
}

impl Task {
    /// Materialize a new task from creation fields.
    #[must_use]
    pub fn from_new(id: TaskId, fields: NewTask, now: OffsetDateTime) -> Self {
        let NewTask {
            title,
            description,
            category_id,
            priority,
            due_date,
        } = fields;
        Self {
            id,
            title,
            description: description.unwrap_or_default(),
            category_id,
            priority: priority.unwrap_or_default(),
            due_date,
            completed: false,
            created_at: now,
            completed_at: None,
        }
    }

    /// Set the completion flag, keeping `completed_at` in step.
    pub fn set_completed(&mut self, completed: bool, now: OffsetDateTime) {
        if completed && !self.completed {
            self.completed_at = Some(now);
        } else if !completed {
            self.completed_at = None;
        }
        self.completed = completed;
    }

    /// Whether the task is unfinished and past its deadline.
    #[must_use]
    pub fn is_overdue(&self, now: OffsetDateTime) -> bool {
        is_overdue(self, now)
    }

    /// Whether the task references the given category.
    #[must_use]
    pub fn in_category(&self, category: &CategoryId) -> bool {
        self.category_id.as_ref() == Some(category)
    }
}

/// Fields accepted when creating a task. Omitted fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Description; defaults to empty.
    pub description: Option<String>,
    /// Category reference.
    pub category_id: Option<CategoryId>,
    /// Priority; defaults to [`Priority::Medium`].
    pub priority: Option<Priority>,
    /// Deadline.
    pub due_date: Option<OffsetDateTime>,
}

impl NewTask {
    /// Start a creation payload with only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the category reference.
    #[must_use]
    pub fn category(mut self, category: CategoryId) -> Self {
        self.category_id = Some(category);
        self
    }

    /// Set the priority.
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the deadline.
    #[must_use]
    pub const fn due(mut self, due_date: OffsetDateTime) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// A named, colored grouping that tasks may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Display color, usually a hex string.
    pub color: String,
    /// Cached number of referencing tasks. Not kept current by the store.
    #[serde(default)]
    pub task_count: u32,
}

/// Fields accepted when creating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: String,
}

impl NewCategory {
    /// Build a payload with the given name and the default color.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: DEFAULT_CATEGORY_COLOR.to_owned(),
        }
    }

    /// Override the color.
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}
