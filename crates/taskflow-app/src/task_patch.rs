use taskflow_core::{Category, CategoryId, Priority, Task};
use time::OffsetDateTime;

/// Patch for a task's category reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryLink {
    /// Point the task at a category.
    Set {
        /// Target category (not checked for existence).
        category: CategoryId,
    },
    /// Remove the category reference.
    Clear,
}

/// Patch for a task's deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueDatePatch {
    /// Set a new deadline.
    Set {
        /// Deadline instant.
        due_date: OffsetDateTime,
    },
    /// Remove the deadline.
    Clear,
}

/// Partial task update. `id` and `created_at` cannot be expressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Overwrite the title.
    pub title: Option<String>,
    /// Overwrite the description.
    pub description: Option<String>,
    /// Change the category reference.
    pub category: Option<CategoryLink>,
    /// Overwrite the priority.
    pub priority: Option<Priority>,
    /// Change the deadline.
    pub due_date: Option<DueDatePatch>,
    /// Overwrite the completion flag.
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Returns true when the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }

    /// Merge the patch into `task`. `now` stamps a transition to completed.
    pub fn apply_to(self, task: &mut Task, now: OffsetDateTime) {
        let Self {
            title,
            description,
            category,
            priority,
            due_date,
            completed,
        } = self;

        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = description {
            task.description = description;
        }
        match category {
            Some(CategoryLink::Set { category }) => task.category_id = Some(category),
            Some(CategoryLink::Clear) => task.category_id = None,
            None => {}
        }
        if let Some(priority) = priority {
            task.priority = priority;
        }
        match due_date {
            Some(DueDatePatch::Set { due_date }) => task.due_date = Some(due_date),
            Some(DueDatePatch::Clear) => task.due_date = None,
            None => {}
        }
        if let Some(completed) = completed {
            task.set_completed(completed, now);
        }
    }
}

/// Partial category update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    /// Overwrite the name.
    pub name: Option<String>,
    /// Overwrite the color.
    pub color: Option<String>,
    /// Overwrite the cached task count.
    pub task_count: Option<u32>,
}

impl CategoryPatch {
    /// Returns true when the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.task_count.is_none()
    }

    /// Merge the patch into `category`.
    pub fn apply_to(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(color) = self.color {
            category.color = color;
        }
        if let Some(count) = self.task_count {
            category.task_count = count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskflow_core::{NewTask, TaskId};
    use time::macros::datetime;

    fn sample() -> Task {
        Task::from_new(
            TaskId::from("t1"),
            NewTask::titled("Title")
                .description("body")
                .category(CategoryId::from("work"))
                .due(datetime!(2024-02-01 00:00 UTC)),
            datetime!(2024-01-01 00:00 UTC),
        )
    }

    #[test]
    fn empty_patch_leaves_task_untouched() {
        let mut task = sample();
        let before = task.clone();
        let patch = TaskPatch::default();
        assert!(patch.is_empty());
        patch.apply_to(&mut task, datetime!(2024-03-01 00:00 UTC));
        assert_eq!(task, before);
    }

    #[test]
    fn patch_clears_optional_fields() {
        let mut task = sample();
        TaskPatch {
            category: Some(CategoryLink::Clear),
            due_date: Some(DueDatePatch::Clear),
            ..TaskPatch::default()
        }
        .apply_to(&mut task, datetime!(2024-03-01 00:00 UTC));

        assert_eq!(task.category_id, None);
        assert_eq!(task.due_date, None);
        assert_eq!(task.description, "body");
    }

    #[test]
    fn patch_overwrites_scalars_and_keeps_identity() {
        let mut task = sample();
        let now = datetime!(2024-03-01 00:00 UTC);
        TaskPatch {
            title: Some("Renamed".into()),
            priority: Some(Priority::High),
            completed: Some(true),
            ..TaskPatch::default()
        }
        .apply_to(&mut task, now);

        assert_eq!(task.id.as_str(), "t1");
        assert_eq!(task.created_at, datetime!(2024-01-01 00:00 UTC));
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.priority, Priority::High);
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(now));
    }

    #[test]
    fn category_patch_merges_fields() {
        let mut category = Category {
            id: CategoryId::from("c1"),
            name: "Work".into(),
            color: "#000000".into(),
            task_count: 0,
        };
        CategoryPatch {
            color: Some("#10B981".into()),
            ..CategoryPatch::default()
        }
        .apply_to(&mut category);

        assert_eq!(category.name, "Work");
        assert_eq!(category.color, "#10B981");
    }
}
