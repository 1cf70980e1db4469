//! Insertion-ordered record storage with an id index, shared by both stores.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

use taskflow_core::{Category, CategoryId, Task, TaskId};

/// Entity with a stable identifier.
pub trait Record: Clone {
    /// Identifier type.
    type Id: Clone + Eq + Hash + Display;

    /// Borrow the identifier.
    fn id(&self) -> &Self::Id;
}

impl Record for Task {
    type Id = TaskId;

    fn id(&self) -> &TaskId {
        &self.id
    }
}

impl Record for Category {
    type Id = CategoryId;

    fn id(&self) -> &CategoryId {
        &self.id
    }
}

/// Records in insertion order plus a mapping from id to position.
#[derive(Debug)]
pub struct Table<R: Record> {
    rows: Vec<R>,
    index: HashMap<R::Id, usize>,
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<R: Record> Table<R> {
    /// Build a table from seed records. Records whose id repeats an earlier
    /// one are dropped and their ids returned.
    pub fn seeded<I>(records: I) -> (Self, Vec<R::Id>)
    where
        I: IntoIterator<Item = R>,
    {
        let mut table = Self::default();
        let mut skipped = Vec::new();
        for record in records {
            let id = record.id().clone();
            if !table.insert(record) {
                skipped.push(id);
            }
        }
        (table, skipped)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when no records are stored.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a record with `id` exists.
    pub fn contains(&self, id: &R::Id) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate over records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.iter()
    }

    /// Look up a record.
    pub fn get(&self, id: &R::Id) -> Option<&R> {
        self.index.get(id).and_then(|&idx| self.rows.get(idx))
    }

    /// Look up a record for in-place mutation. The id must not be changed.
    pub fn get_mut(&mut self, id: &R::Id) -> Option<&mut R> {
        self.index.get(id).and_then(|&idx| self.rows.get_mut(idx))
    }

    /// Append a record. Returns false (and stores nothing) if the id is taken.
    pub fn insert(&mut self, record: R) -> bool {
        if self.contains(record.id()) {
            return false;
        }
        self.index.insert(record.id().clone(), self.rows.len());
        self.rows.push(record);
        true
    }

    /// Remove a record, preserving the order of the others.
    pub fn remove(&mut self, id: &R::Id) -> Option<R> {
        let idx = self.index.remove(id)?;
        let removed = self.rows.remove(idx);
        self.rebuild_index();
        Some(removed)
    }

    /// Remove every record whose id is in `ids`; unknown ids are ignored.
    /// Returns the number of records removed.
    pub fn remove_all(&mut self, ids: &[R::Id]) -> usize {
        let targets: HashSet<&R::Id> = ids.iter().collect();
        let before = self.rows.len();
        self.rows.retain(|record| !targets.contains(record.id()));
        let removed = before - self.rows.len();
        if removed > 0 {
            self.rebuild_index();
        }
        removed
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (idx, record) in self.rows.iter().enumerate() {
            self.index.insert(record.id().clone(), idx);
        }
    }
}
