use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use taskflow_core::{Priority, SortKey, SortOrder, TaskQuery};
use tracing::info;

const CONFIG_DIR: &str = ".taskflow";
const CONFIG_FILE: &str = "config.toml";

/// Top-level project configuration loaded from `.taskflow/config.toml`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Defaults applied by front ends.
    #[serde(default)]
    pub defaults: Defaults,
    /// Seed data location.
    #[serde(default)]
    pub fixture: FixtureConfig,
}

impl ProjectConfig {
    /// Load `.taskflow/config.toml` under `workdir`, or defaults when absent.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(workdir: impl AsRef<Path>) -> Result<Self> {
        let config_path = workdir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(config_path)
    }

    /// Load configuration from an explicit file path.
    ///
    /// A relative fixture path is resolved against the file's directory.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config = Self::from_toml(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if let (Some(fixture), Some(base)) = (config.fixture.path.as_mut(), path.parent()) {
            if fixture.is_relative() {
                *fixture = base.join(&*fixture);
            }
        }
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    /// Returns an error for malformed TOML or unknown enum tokens.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// `[defaults]` block, mirroring the user settings of the task list.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub struct Defaults {
    /// Priority given to new tasks when the user picks none.
    #[serde(default)]
    pub priority: Priority,
    /// Sort key for listings.
    #[serde(default)]
    pub sort_by: SortKey,
    /// Sort direction for listings.
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Defaults {
    /// Unfiltered query using the configured ordering.
    #[must_use]
    pub fn query(&self) -> TaskQuery {
        TaskQuery {
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            ..TaskQuery::default()
        }
    }
}

/// `[fixture]` block.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct FixtureConfig {
    /// Seed file; the bundled sample data is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskflow_core::StatusFilter;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let config = ProjectConfig::load(temp.path())?;
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.defaults.query(), TaskQuery::default());
        Ok(())
    }

    #[test]
    fn loads_defaults_and_resolves_fixture_path() -> Result<()> {
        let temp = TempDir::new()?;
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir)?;
        fs::write(
            dir.join(CONFIG_FILE),
            r#"
[defaults]
priority = "high"
sort_by = "title"
sort_order = "desc"

[fixture]
path = "seed.json"
"#,
        )?;

        let config = ProjectConfig::load(temp.path())?;
        assert_eq!(config.defaults.priority, Priority::High);
        let query = config.defaults.query();
        assert_eq!(query.sort_by, SortKey::Title);
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert_eq!(query.status, StatusFilter::All);
        assert_eq!(config.fixture.path, Some(dir.join("seed.json")));
        Ok(())
    }

    #[test]
    fn rejects_unknown_tokens_with_path_context() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("broken.toml");
        fs::write(&path, "[defaults]\npriority = \"urgent\"\n")?;

        let err = ProjectConfig::from_file(&path)
            .err()
            .unwrap_or_else(|| panic!("unknown priority must be rejected"));
        assert!(format!("{err:#}").contains("broken.toml"));
        Ok(())
    }

    #[test]
    fn absolute_fixture_paths_are_kept() -> Result<()> {
        let config = ProjectConfig::from_toml("[fixture]\npath = \"/srv/seed.json\"\n")?;
        assert_eq!(config.fixture.path, Some(PathBuf::from("/srv/seed.json")));
        Ok(())
    }
}
