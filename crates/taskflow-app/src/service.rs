//! Façade combining both stores with the query engine and statistics.

use std::collections::HashMap;

use taskflow_core::{
    Category, CategoryId, CompletedStats, Task, TaskId, TaskQuery, apply_filters, completed_stats,
};
use tracing::info;

use crate::category_store::CategoryStore;
use crate::error::StoreResult;
use crate::task_store::TaskStore;

/// Entry point used by front ends. Owns one [`TaskStore`] and one
/// [`CategoryStore`]; the two are locked independently and never together.
#[derive(Debug, Default)]
pub struct TaskflowService {
    tasks: TaskStore,
    categories: CategoryStore,
}

impl TaskflowService {
    /// Wrap existing stores.
    #[must_use]
    pub const fn new(tasks: TaskStore, categories: CategoryStore) -> Self {
        Self { tasks, categories }
    }

    /// Borrow the task store.
    #[must_use]
    pub const fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    /// Borrow the category store.
    #[must_use]
    pub const fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    /// Snapshot every task and run it through `query`.
    pub async fn list_tasks(&self, query: &TaskQuery) -> Vec<Task> {
        let snapshot = self.tasks.get_all().await;
        apply_filters(&snapshot, query, self.tasks.now())
    }

    /// Like [`list_tasks`](Self::list_tasks), limited to one category.
    pub async fn list_tasks_in(&self, category: &CategoryId, query: &TaskQuery) -> Vec<Task> {
        let snapshot = self.tasks.get_by_category(category).await;
        apply_filters(&snapshot, query, self.tasks.now())
    }

    /// Completion-window counts over the finished tasks.
    pub async fn completed_stats(&self) -> CompletedStats {
        let completed = self.tasks.get_completed().await;
        completed_stats(&completed, self.tasks.now())
    }

    /// Every category with `task_count` recomputed from the live tasks.
    /// The cached counts in the store are not touched.
    pub async fn categories_with_counts(&self) -> Vec<Category> {
        let counts = count_by_category(&self.tasks.get_all().await);
        self.categories
            .get_all()
            .await
            .into_iter()
            .map(|mut category| {
                category.task_count = counts.get(&category.id).copied().unwrap_or(0);
                category
            })
            .collect()
    }

    /// Push live counts into the category store's cached field.
    pub async fn refresh_task_counts(&self) -> Vec<Category> {
        let counts = count_by_category(&self.tasks.get_all().await);
        let mut refreshed = Vec::new();
        for category in self.categories.get_all().await {
            let count = counts.get(&category.id).copied().unwrap_or(0);
            // A concurrent delete may have removed the category since the snapshot.
            if let Some(updated) = self.categories.update_task_count(&category.id, count).await {
                refreshed.push(updated);
            }
        }
        refreshed
    }

    /// Resolve a task's category. Missing references resolve to `None`.
    pub async fn category_of(&self, task: &Task) -> Option<Category> {
        match &task.category_id {
            Some(id) => self.categories.get_by_id(id).await,
            None => None,
        }
    }

    /// Delete a category, leaving referencing tasks in place with a dangling
    /// reference. Returns how many tasks still point at the removed id.
    ///
    /// # Errors
    /// Returns [`StoreError::CategoryNotFound`](crate::StoreError::CategoryNotFound)
    /// when `id` is unknown.
    pub async fn delete_category(&self, id: &CategoryId) -> StoreResult<usize> {
        self.categories.delete(id).await?;
        let orphaned = self.tasks.get_by_category(id).await.len();
        if orphaned > 0 {
            info!(category = %id, orphaned, "category deleted with referencing tasks");
        }
        Ok(orphaned)
    }

    /// Delete every finished task. Returns the number removed.
    pub async fn clear_completed(&self) -> usize {
        let ids: Vec<TaskId> = self
            .tasks
            .get_completed()
            .await
            .into_iter()
            .map(|task| task.id)
            .collect();
        if ids.is_empty() {
            return 0;
        }
        self.tasks.bulk_delete(&ids).await
    }
}

fn count_by_category(tasks: &[Task]) -> HashMap<CategoryId, u32> {
    let mut counts: HashMap<CategoryId, u32> = HashMap::new();
    for id in tasks.iter().filter_map(|task| task.category_id.as_ref()) {
        *counts.entry(id.clone()).or_default() += 1;
    }
    counts
}
