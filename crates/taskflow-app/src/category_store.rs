//! In-memory category collection.

use taskflow_core::{Category, CategoryId, NewCategory};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::table::Table;
use crate::task_patch::CategoryPatch;

/// Owns every category. Same locking and copy-out rules as
/// [`TaskStore`](crate::TaskStore).
///
/// `task_count` is a cache the store never recomputes; see
/// [`TaskflowService::categories_with_counts`](crate::TaskflowService::categories_with_counts)
/// for live counts.
#[derive(Debug, Default)]
pub struct CategoryStore {
    table: Mutex<Table<Category>>,
}

impl CategoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `categories`. Records repeating an earlier id are skipped.
    #[must_use]
    pub fn seeded<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        let (table, skipped) = Table::seeded(categories);
        for id in &skipped {
            warn!(category = %id, "skipping seed category with duplicate id");
        }
        Self {
            table: Mutex::new(table),
        }
    }

    /// Number of stored categories.
    pub async fn len(&self) -> usize {
        self.table.lock().await.len()
    }

    /// Returns true when the store holds no categories.
    pub async fn is_empty(&self) -> bool {
        self.table.lock().await.is_empty()
    }

    /// Every category, in insertion order.
    pub async fn get_all(&self) -> Vec<Category> {
        self.table.lock().await.iter().cloned().collect()
    }

    /// A single category, or `None` if the id is unknown.
    pub async fn get_by_id(&self, id: &CategoryId) -> Option<Category> {
        self.table.lock().await.get(id).cloned()
    }

    /// Store a new category with a zero task count.
    pub async fn create(&self, fields: NewCategory) -> Category {
        let NewCategory { name, color } = fields;
        let mut table = self.table.lock().await;
        let mut id = CategoryId::new();
        while table.contains(&id) {
            id = CategoryId::new();
        }
        let category = Category {
            id,
            name,
            color,
            task_count: 0,
        };
        table.insert(category.clone());
        drop(table);

        debug!(category = %category.id, "category created");
        category
    }

    /// Merge `patch` into an existing category.
    ///
    /// # Errors
    /// Returns [`StoreError::CategoryNotFound`] when `id` is unknown; nothing is written.
    pub async fn update(&self, id: &CategoryId, patch: CategoryPatch) -> StoreResult<Category> {
        let mut table = self.table.lock().await;
        let category = table
            .get_mut(id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.clone()))?;
        patch.apply_to(category);
        let updated = category.clone();
        drop(table);

        debug!(category = %id, "category updated");
        Ok(updated)
    }

    /// Remove a category. Tasks referencing it are left alone.
    ///
    /// # Errors
    /// Returns [`StoreError::CategoryNotFound`] when `id` is unknown.
    pub async fn delete(&self, id: &CategoryId) -> StoreResult<()> {
        let removed = self.table.lock().await.remove(id);
        if removed.is_none() {
            return Err(StoreError::CategoryNotFound(id.clone()));
        }
        debug!(category = %id, "category deleted");
        Ok(())
    }

    /// Overwrite the cached task count. Returns `None` for unknown ids.
    pub async fn update_task_count(&self, id: &CategoryId, count: u32) -> Option<Category> {
        let mut table = self.table.lock().await;
        let category = table.get_mut(id)?;
        category.task_count = count;
        Some(category.clone())
    }
}
