//! Seed data loading.
//!
//! A fixture is a JSON document `{ "tasks": [...], "categories": [...] }`;
//! both keys are optional. Stores never read fixtures themselves.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use taskflow_core::{Category, Clock, Task};
use thiserror::Error;
use tracing::info;

use crate::category_store::CategoryStore;
use crate::service::TaskflowService;
use crate::task_store::TaskStore;

const BUILTIN_SEED: &str = include_str!("../fixtures/seed.json");

/// Errors raised while loading a fixture file.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The file could not be read.
    #[error("failed to read fixture {path}: {source}")]
    Io {
        /// Fixture path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid fixture document.
    #[error("failed to parse fixture {path}: {source}")]
    Parse {
        /// Fixture path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Seed records for both stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    /// Seed tasks.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Seed categories.
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Fixture {
    /// Read and parse a fixture file.
    ///
    /// # Errors
    /// Returns [`FixtureError`] when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let fixture = Self::from_json(&contents).map_err(|source| FixtureError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            tasks = fixture.tasks.len(),
            categories = fixture.categories.len(),
            "fixture loaded"
        );
        Ok(fixture)
    }

    /// Parse a fixture document.
    ///
    /// # Errors
    /// Returns the JSON error when the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The sample data bundled with the crate.
    ///
    /// # Errors
    /// Returns the JSON error if the bundled document is malformed.
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(BUILTIN_SEED)
    }

    /// Seed fresh stores and wrap them in a service.
    #[must_use]
    pub fn into_service(self, clock: Arc<dyn Clock>) -> TaskflowService {
        TaskflowService::new(
            TaskStore::seeded(self.tasks, clock),
            CategoryStore::seeded(self.categories),
        )
    }
}
