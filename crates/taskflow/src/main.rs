//! CLI entry point for taskflow.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use taskflow_app::{Fixture, ProjectConfig};
use taskflow_core::SystemClock;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;

/// Personal task tracking over an in-memory store seeded from a fixture.
#[derive(Parser, Debug)]
#[command(
    name = "taskflow",
    version,
    about = "taskflow: filter, sort and summarize tasks seeded from a JSON fixture"
)]
struct Cli {
    /// Configuration file (defaults to .taskflow/config.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed fixture; overrides the configured one. Bundled sample data otherwise.
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tasks, filtered and sorted.
    #[command(alias = "ls")]
    List {
        /// all | pending | completed | overdue
        #[arg(long)]
        status: Option<String>,
        /// low | medium | high | any
        #[arg(long)]
        priority: Option<String>,
        /// dueDate | priority | created | title
        #[arg(long = "sort-by")]
        sort_by: Option<String>,
        /// asc | desc
        #[arg(long)]
        order: Option<String>,
        /// Only tasks referencing this category id.
        #[arg(long)]
        category: Option<String>,
    },

    /// Show a single task.
    Show { id: String },

    /// Create a task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// RFC 3339 timestamp or YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
    },

    /// Change fields of an existing task.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "clear_category")]
        category: Option<String>,
        #[arg(long)]
        clear_category: bool,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        #[arg(long)]
        clear_due: bool,
    },

    /// Flip a task between pending and completed.
    Toggle { id: String },

    /// Delete one task, or several at once (unknown ids are ignored then).
    Rm {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Case-insensitive search over titles and descriptions.
    Search {
        #[arg(default_value = "")]
        query: String,
    },

    /// Totals, pending, overdue and completion rate.
    Stats,

    /// Completed tasks with today / this-week counts.
    Completed,

    /// Delete every completed task.
    ClearCompleted,

    /// List categories with live task counts.
    Categories,

    /// Create a category.
    CategoryAdd {
        #[arg(long)]
        name: String,
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category; referencing tasks keep a dangling reference.
    CategoryRm { id: String },
}

fn main() -> Result<()> {
    let Cli {
        config,
        fixture,
        json,
        cmd,
    } = Cli::parse();

    install_tracing(json);

    let config = match config {
        Some(path) => ProjectConfig::from_file(path)?,
        None => ProjectConfig::load(".")?,
    };
    let fixture = match fixture.or_else(|| config.fixture.path.clone()) {
        Some(path) => Fixture::load(path)?,
        None => Fixture::builtin().context("bundled sample data is malformed")?,
    };
    let service = fixture.into_service(Arc::new(SystemClock));
    let output = if json {
        commands::Output::Json
    } else {
        commands::Output::Text
    };

    tokio::runtime::Runtime::new()?
        .block_on(commands::run(cmd, &service, &config.defaults, output))
}

const fn default_level(json: bool) -> tracing::Level {
    if json {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    }
}

/// `RUST_LOG` directives when set, otherwise the default level.
fn log_filter(json: bool, rust_log: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level(json).into())
        .parse_lossy(rust_log)
}

fn install_tracing(json: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    // Logs go to stderr so stdout stays parseable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(json, &rust_log))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
