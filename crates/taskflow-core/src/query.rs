use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::datetime;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::{Priority, Task};

/// Stand-in deadline for tasks without one, so they sort after every real
/// deadline in ascending order.
pub const FAR_FUTURE: OffsetDateTime = datetime!(2999-12-31 00:00 UTC);

/// Completion-state filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Keep every task.
    #[default]
    All,
    /// Keep unfinished tasks.
    Pending,
    /// Keep finished tasks.
    Completed,
    /// Keep unfinished tasks whose deadline has passed.
    Overdue,
}

impl StatusFilter {
    /// Whether `task` passes this filter at `now`.
    #[must_use]
    pub fn matches(self, task: &Task, now: OffsetDateTime) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
            Self::Overdue => is_overdue(task, now),
        }
    }

    /// Heading used when listing tasks under this filter.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::All => "All Tasks",
            Self::Pending => "Pending Tasks",
            Self::Completed => "Completed Tasks",
            Self::Overdue => "Overdue Tasks",
        }
    }
}

/// Field used to order query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    /// Deadline; tasks without one sort last when ascending.
    #[default]
    #[serde(rename = "dueDate")]
    DueDate,
    /// Priority rank. Ascending puts high priority first.
    #[serde(rename = "priority")]
    Priority,
    /// Creation instant.
    #[serde(rename = "created")]
    Created,
    /// Title text.
    #[serde(rename = "title")]
    Title,
}

impl SortKey {
    /// Base comparison for this key, before the sort order is applied.
    #[must_use]
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::DueDate => a
                .due_date
                .unwrap_or(FAR_FUTURE)
                .cmp(&b.due_date.unwrap_or(FAR_FUTURE)),
            // rank(b) - rank(a): the "ascending" order lists high priority first.
            Self::Priority => b.priority.rank().cmp(&a.priority.rank()),
            Self::Created => a.created_at.cmp(&b.created_at),
            Self::Title => compare_titles(&a.title, &b.title),
        }
    }

    /// Token used in configuration files and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DueDate => "dueDate",
            Self::Priority => "priority",
            Self::Created => "created",
            Self::Title => "title",
        }
    }
}

/// Direction applied on top of a [`SortKey`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Keep the key's base comparison.
    #[default]
    Asc,
    /// Negate the key's base comparison.
    Desc,
}

impl SortOrder {
    /// Apply the direction to a base comparison.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Filter and sort specification for [`apply_filters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    /// Completion-state filter.
    #[serde(default)]
    pub status: StatusFilter,
    /// Exact priority filter; `None` keeps every priority.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Sort key.
    #[serde(default)]
    pub sort_by: SortKey,
    /// Sort direction.
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl TaskQuery {
    /// Whether `task` passes every filter clause at `now`.
    #[must_use]
    pub fn matches(&self, task: &Task, now: OffsetDateTime) -> bool {
        self.status.matches(task, now) && self.priority.is_none_or(|p| task.priority == p)
    }

    /// Compare two tasks according to the sort key and direction.
    #[must_use]
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        self.sort_order.apply(self.sort_by.compare(a, b))
    }
}

/// Whether `task` is unfinished, has a deadline, and the deadline is strictly before `now`.
#[must_use]
pub fn is_overdue(task: &Task, now: OffsetDateTime) -> bool {
    !task.completed && task.due_date.is_some_and(|due| due < now)
}

/// Narrow and order a task snapshot.
///
/// Filters are combined with logical AND. The sort is stable: tasks that
/// compare equal keep their input order.
#[must_use]
pub fn apply_filters<'a, I>(tasks: I, query: &TaskQuery, now: OffsetDateTime) -> Vec<Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut filtered: Vec<Task> = tasks
        .into_iter()
        .filter(|task| query.matches(task, now))
        .cloned()
        .collect();
    filtered.sort_by(|a, b| query.compare(a, b));
    filtered
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    TitleKey::new(a)
        .cmp(&TitleKey::new(b))
        .then_with(|| a.cmp(b))
}

/// Collation key for titles: base letters first, then accents, then case
/// with lowercase ahead of uppercase.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TitleKey {
    base: String,
    accented: String,
    uppercase: Vec<bool>,
}

impl TitleKey {
    fn new(title: &str) -> Self {
        let mut key = Self {
            base: String::with_capacity(title.len()),
            accented: String::with_capacity(title.len()),
            uppercase: Vec::with_capacity(title.len()),
        };
        for ch in title.nfd() {
            key.accented.extend(ch.to_lowercase());
            if is_combining_mark(ch) {
                continue;
            }
            key.base.extend(ch.to_lowercase());
            key.uppercase.push(ch.is_uppercase());
        }
        key
    }
}

/// Error returned for query tokens that do not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {token}")]
pub struct ParseQueryTokenError {
    /// Which kind of token was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub token: String,
}

fn normalize(token: &str) -> String {
    token.trim().to_ascii_lowercase().replace(['-', '_', ' '], "")
}

impl FromStr for StatusFilter {
    type Err = ParseQueryTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "all" | "" => Ok(Self::All),
            "pending" | "open" => Ok(Self::Pending),
            "completed" | "done" => Ok(Self::Completed),
            "overdue" => Ok(Self::Overdue),
            _ => Err(ParseQueryTokenError {
                kind: "status",
                token: s.to_owned(),
            }),
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseQueryTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "duedate" | "due" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "created" | "createdat" => Ok(Self::Created),
            "title" => Ok(Self::Title),
            _ => Err(ParseQueryTokenError {
                kind: "sort key",
                token: s.to_owned(),
            }),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseQueryTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(ParseQueryTokenError {
                kind: "sort order",
                token: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
