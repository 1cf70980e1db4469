//! Authoritative in-memory task collection.

use std::sync::Arc;

use taskflow_core::text_matcher;
use taskflow_core::{
    CategoryId, Clock, NewTask, SystemClock, Task, TaskId, TaskStats, task_stats,
};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::table::Table;
use crate::task_patch::TaskPatch;

/// Owns every task. Each operation runs under one lock, so mutations never
/// observe each other half-applied, and every read returns owned copies.
#[derive(Debug)]
pub struct TaskStore {
    table: Mutex<Table<Task>>,
    clock: Arc<dyn Clock>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl TaskStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::seeded(Vec::new(), clock)
    }

    /// Create a store holding `tasks`. Records repeating an earlier id are skipped.
    #[must_use]
    pub fn seeded<I>(tasks: I, clock: Arc<dyn Clock>) -> Self
    where
        I: IntoIterator<Item = Task>,
    {
        let (table, skipped) = Table::seeded(tasks);
        for id in &skipped {
            warn!(task = %id, "skipping seed task with duplicate id");
        }
        Self {
            table: Mutex::new(table),
            clock,
        }
    }

    /// Current instant according to the store's clock.
    #[must_use]
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    /// Number of stored tasks.
    pub async fn len(&self) -> usize {
        self.table.lock().await.len()
    }

    /// Returns true when the store holds no tasks.
    pub async fn is_empty(&self) -> bool {
        self.table.lock().await.is_empty()
    }

    /// Every task, in insertion order.
    pub async fn get_all(&self) -> Vec<Task> {
        self.table.lock().await.iter().cloned().collect()
    }

    /// A single task, or `None` if the id is unknown.
    pub async fn get_by_id(&self, id: &TaskId) -> Option<Task> {
        self.table.lock().await.get(id).cloned()
    }

    /// Tasks referencing `category`.
    pub async fn get_by_category(&self, category: &CategoryId) -> Vec<Task> {
        self.collect_where(|task| task.in_category(category)).await
    }

    /// Unfinished tasks.
    pub async fn get_pending(&self) -> Vec<Task> {
        self.collect_where(|task| !task.completed).await
    }

    /// Finished tasks.
    pub async fn get_completed(&self) -> Vec<Task> {
        self.collect_where(|task| task.completed).await
    }

    /// Store a new task built from `fields` and return it.
    pub async fn create(&self, fields: NewTask) -> Task {
        let mut table = self.table.lock().await;
        let mut id = TaskId::new();
        while table.contains(&id) {
            id = TaskId::new();
        }
        let task = Task::from_new(id, fields, self.clock.now());
        table.insert(task.clone());
        drop(table);

        debug!(task = %task.id, "task created");
        task
    }

    /// Merge `patch` into an existing task.
    ///
    /// # Errors
    /// Returns [`StoreError::TaskNotFound`] when `id` is unknown; nothing is written.
    pub async fn update(&self, id: &TaskId, patch: TaskPatch) -> StoreResult<Task> {
        let now = self.clock.now();
        let mut table = self.table.lock().await;
        let task = table
            .get_mut(id)
            .ok_or_else(|| StoreError::TaskNotFound(id.clone()))?;
        patch.apply_to(task, now);
        let updated = task.clone();
        drop(table);

        debug!(task = %id, "task updated");
        Ok(updated)
    }

    /// Flip the completion flag.
    ///
    /// # Errors
    /// Returns [`StoreError::TaskNotFound`] when `id` is unknown.
    pub async fn toggle_complete(&self, id: &TaskId) -> StoreResult<Task> {
        let now = self.clock.now();
        let mut table = self.table.lock().await;
        let task = table
            .get_mut(id)
            .ok_or_else(|| StoreError::TaskNotFound(id.clone()))?;
        let completed = !task.completed;
        task.set_completed(completed, now);
        let toggled = task.clone();
        drop(table);

        debug!(task = %id, completed, "task completion toggled");
        Ok(toggled)
    }

    /// Remove a task.
    ///
    /// # Errors
    /// Returns [`StoreError::TaskNotFound`] when `id` is unknown.
    pub async fn delete(&self, id: &TaskId) -> StoreResult<()> {
        let removed = self.table.lock().await.remove(id);
        if removed.is_none() {
            return Err(StoreError::TaskNotFound(id.clone()));
        }
        debug!(task = %id, "task deleted");
        Ok(())
    }

    /// Remove every task whose id is listed. Unknown ids are ignored.
    /// Returns the number of tasks removed.
    pub async fn bulk_delete(&self, ids: &[TaskId]) -> usize {
        let removed = self.table.lock().await.remove_all(ids);
        debug!(requested = ids.len(), removed, "tasks bulk deleted");
        removed
    }

    /// Tasks whose title or description contains `query`, ignoring case.
    /// The empty query returns every task.
    pub async fn search(&self, query: &str) -> Vec<Task> {
        let table = self.table.lock().await;
        text_matcher::search(table.iter(), query)
    }

    /// Global counts at the current instant.
    pub async fn get_stats(&self) -> TaskStats {
        let now = self.clock.now();
        let table = self.table.lock().await;
        task_stats(table.iter(), now)
    }

    async fn collect_where<F>(&self, keep: F) -> Vec<Task>
    where
        F: Fn(&Task) -> bool,
    {
        self.table
            .lock()
            .await
            .iter()
            .filter(|task| keep(task))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use taskflow_core::{FixedClock, Priority};
    use time::Duration;
    use time::macros::datetime;

    fn store_at(now: OffsetDateTime) -> (TaskStore, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(now));
        (TaskStore::new(clock.clone()), clock)
    }

    #[tokio::test]
    async fn create_then_get_returns_defaulted_record() {
        let now = datetime!(2024-05-01 08:00 UTC);
        let (store, _) = store_at(now);

        let created = store.create(NewTask::titled("Buy milk")).await;
        let fetched = store.get_by_id(&created.id).await.expect("task must exist");

        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Buy milk");
        assert_eq!(fetched.description, "");
        assert_eq!(fetched.priority, Priority::Medium);
        assert!(!fetched.completed);
        assert_eq!(fetched.created_at, now);
    }

    #[tokio::test]
    async fn create_then_get_keeps_every_supplied_field() {
        let now = datetime!(2024-05-01 08:00 UTC);
        let (store, _) = store_at(now);
        let due = datetime!(2024-05-10 17:30 +02:00);

        let created = store
            .create(
                NewTask::titled("File taxes")
                    .description("Gather receipts first")
                    .category(CategoryId::from("finance"))
                    .priority(Priority::High)
                    .due(due),
            )
            .await;
        let fetched = store.get_by_id(&created.id).await.expect("task must exist");

        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "File taxes");
        assert_eq!(fetched.description, "Gather receipts first");
        assert_eq!(fetched.category_id, Some(CategoryId::from("finance")));
        assert_eq!(fetched.priority, Priority::High);
        assert_eq!(fetched.due_date, Some(due));
        assert!(!fetched.completed);
        assert_eq!(fetched.completed_at, None);
        assert_eq!(fetched.created_at, now);
    }

    #[tokio::test]
    async fn get_by_id_returns_none_for_unknown_ids() {
        let store = TaskStore::default();
        assert!(store.get_by_id(&TaskId::from("missing")).await.is_none());
    }

    #[tokio::test]
    async fn rapid_creation_yields_unique_ids() {
        let store = TaskStore::default();
        let mut ids = std::collections::HashSet::new();
        for idx in 0..200 {
            let task = store.create(NewTask::titled(format!("t{idx}"))).await;
            ids.insert(task.id);
        }
        assert_eq!(ids.len(), 200);
        assert_eq!(store.len().await, 200);
    }

    #[tokio::test]
    async fn get_all_preserves_insertion_order() {
        let store = TaskStore::default();
        let a = store.create(NewTask::titled("a")).await;
        let b = store.create(NewTask::titled("b")).await;
        let c = store.create(NewTask::titled("c")).await;

        let ids: Vec<TaskId> = store.get_all().await.into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[tokio::test]
    async fn returned_tasks_are_copies() {
        let store = TaskStore::default();
        let created = store.create(NewTask::titled("original")).await;

        let mut copy = store.get_by_id(&created.id).await.expect("task must exist");
        copy.title = "mutated locally".into();

        let stored = store.get_by_id(&created.id).await.expect("task must exist");
        assert_eq!(stored.title, "original");
    }

    #[tokio::test]
    async fn update_rejects_unknown_ids_without_writing() {
        let store = TaskStore::default();
        store.create(NewTask::titled("keep")).await;
        let before = store.get_all().await;

        let err = store
            .update(
                &TaskId::from("missing"),
                TaskPatch {
                    title: Some("x".into()),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::TaskNotFound(TaskId::from("missing")));
        assert_eq!(store.get_all().await, before);
    }

    #[tokio::test]
    async fn toggle_complete_is_an_involution() {
        let (store, clock) = store_at(datetime!(2024-05-01 08:00 UTC));
        let task = store.create(NewTask::titled("flip")).await;

        clock.advance(Duration::hours(1));
        let once = store.toggle_complete(&task.id).await.expect("toggle");
        assert!(once.completed);
        assert_eq!(once.completed_at, Some(datetime!(2024-05-01 09:00 UTC)));

        let twice = store.toggle_complete(&task.id).await.expect("toggle");
        assert!(!twice.completed);
        assert_eq!(twice.completed_at, None);
        assert_eq!(twice.created_at, task.created_at);
    }

    #[tokio::test]
    async fn delete_twice_fails_the_second_time() {
        let store = TaskStore::default();
        let task = store.create(NewTask::titled("bye")).await;

        store.delete(&task.id).await.expect("first delete");
        let err = store.delete(&task.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn bulk_delete_ignores_unknown_ids() {
        let store = TaskStore::default();
        let a = store.create(NewTask::titled("a")).await;
        let b = store.create(NewTask::titled("b")).await;
        let c = store.create(NewTask::titled("c")).await;

        let removed = store
            .bulk_delete(&[a.id, b.id, TaskId::from("nonexistent")])
            .await;

        assert_eq!(removed, 2);
        let remaining: Vec<TaskId> = store.get_all().await.into_iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![c.id]);
    }

    #[tokio::test]
    async fn filtered_lookups_split_by_state_and_category() {
        let store = TaskStore::default();
        let work = CategoryId::from("work");
        let a = store
            .create(NewTask::titled("a").category(work.clone()))
            .await;
        let b = store.create(NewTask::titled("b")).await;
        store.toggle_complete(&b.id).await.expect("toggle");

        let pending: Vec<TaskId> = store.get_pending().await.into_iter().map(|t| t.id).collect();
        let completed: Vec<TaskId> = store.get_completed().await.into_iter().map(|t| t.id).collect();
        let in_work: Vec<TaskId> = store
            .get_by_category(&work)
            .await
            .into_iter()
            .map(|t| t.id)
            .collect();

        assert_eq!(pending, vec![a.id.clone()]);
        assert_eq!(completed, vec![b.id]);
        assert_eq!(in_work, vec![a.id]);
        assert!(store.get_by_category(&CategoryId::from("home")).await.is_empty());
    }

    #[tokio::test]
    async fn search_matches_title_or_description() {
        let store = TaskStore::default();
        store
            .create(NewTask::titled("Groceries").description("Buy MILK and eggs"))
            .await;
        store.create(NewTask::titled("Pay rent")).await;

        assert_eq!(store.search("").await.len(), 2);
        assert_eq!(store.search("milk").await.len(), 1);
        assert_eq!(store.search("RENT").await.len(), 1);
        assert!(store.search("dentist").await.is_empty());
    }

    #[tokio::test]
    async fn stats_follow_completion_and_deadlines() {
        let (store, _) = store_at(datetime!(2024-05-01 08:00 UTC));
        let milk = store.create(NewTask::titled("Buy milk")).await;

        let stats = store.get_stats().await;
        assert_eq!(
            (stats.total, stats.completed, stats.pending, stats.overdue, stats.completion_rate),
            (1, 0, 1, 0, 0)
        );

        store.toggle_complete(&milk.id).await.expect("toggle");
        let stats = store.get_stats().await;
        assert_eq!(
            (stats.total, stats.completed, stats.pending, stats.completion_rate),
            (1, 1, 0, 100)
        );

        let rent = store
            .create(NewTask::titled("Pay rent").due(datetime!(2020-01-01 00:00 UTC)))
            .await;
        assert_eq!(store.get_stats().await.overdue, 1);

        store.toggle_complete(&rent.id).await.expect("toggle");
        let stats = store.get_stats().await;
        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.total, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_never_collide() {
        let store = Arc::new(TaskStore::default());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    for idx in 0..50 {
                        store
                            .create(NewTask::titled(format!("w{worker}-{idx}")))
                            .await;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.await.expect("worker must finish");
        }

        let tasks = store.get_all().await;
        let unique: std::collections::HashSet<&TaskId> = tasks.iter().map(|t| &t.id).collect();
        assert_eq!(tasks.len(), 400);
        assert_eq!(unique.len(), 400);
    }
}
