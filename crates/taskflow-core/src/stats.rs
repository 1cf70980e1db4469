use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, Time};

use crate::{Task, is_overdue};

/// Counts over the whole task collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// Number of tasks.
    pub total: usize,
    /// Number of finished tasks.
    pub completed: usize,
    /// `total - completed`.
    pub pending: usize,
    /// Unfinished tasks past their deadline.
    pub overdue: usize,
    /// Percentage of finished tasks, rounded; `0` for an empty collection.
    pub completion_rate: u8,
}

/// Counts over a collection already narrowed to finished tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedStats {
    /// Number of finished tasks.
    pub total_completed: usize,
    /// Finished since the start of the current day.
    pub completed_today: usize,
    /// Finished since seven days before the start of the current day.
    pub completed_this_week: usize,
    /// Always `100`: every task in scope is finished.
    pub completion_rate: u8,
}

/// Reduce a snapshot to global counts at `now`.
#[must_use]
pub fn task_stats<'a, I>(tasks: I, now: OffsetDateTime) -> TaskStats
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut stats = TaskStats::default();
    for task in tasks {
        stats.total += 1;
        if task.completed {
            stats.completed += 1;
        } else if is_overdue(task, now) {
            stats.overdue += 1;
        }
    }
    stats.pending = stats.total - stats.completed;
    stats.completion_rate = completion_rate(stats.completed, stats.total);
    stats
}

/// Reduce a snapshot of finished tasks to completion-window counts at `now`.
///
/// A task's window instant is its `completed_at`, or `created_at` for
/// records that never recorded a completion instant. The day boundary is
/// midnight in `now`'s offset.
#[must_use]
pub fn completed_stats<'a, I>(tasks: I, now: OffsetDateTime) -> CompletedStats
where
    I: IntoIterator<Item = &'a Task>,
{
    let today = now.replace_time(Time::MIDNIGHT);
    let week_ago = today - Duration::days(7);

    let mut stats = CompletedStats {
        completion_rate: 100,
        ..CompletedStats::default()
    };
    for task in tasks {
        let finished = task.completed_at.unwrap_or(task.created_at);
        stats.total_completed += 1;
        if finished >= today {
            stats.completed_today += 1;
        }
        if finished >= week_ago {
            stats.completed_this_week += 1;
        }
    }
    stats
}

/// `round(completed / total * 100)`, with halves rounded up.
fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rate = (completed * 200 + total) / (total * 2);
    u8::try_from(rate).unwrap_or(100)
}
