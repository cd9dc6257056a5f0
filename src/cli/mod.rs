//! Command-line interface for taskbox
//!
//! This module defines the CLI structure using clap derive macros. Running
//! without a subcommand opens the terminal UI; the other subcommands work on
//! the same stored list without a terminal.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::storage::{self, FileStore, StorageAdapter};
use crate::task::{LoadOutcome, TaskStore};

mod task;

/// taskbox - a small persistent task list
///
/// Add, edit, complete and delete short text items. The list is kept in a
/// per-user data directory and survives restarts.
#[derive(Parser, Debug)]
#[command(name = "taskbox")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "TASKBOX_DIR")]
    pub dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive task list (default)
    Ui,

    /// Add a task
    Add {
        /// Task text; words are joined with spaces
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// List tasks with their positions
    #[command(alias = "ls")]
    List,

    /// Replace the text of a task
    Edit {
        /// 1-based position from `taskbox list`
        position: usize,

        /// New text; words are joined with spaces
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Flip a task between open and completed
    #[command(alias = "done")]
    Toggle {
        /// 1-based position from `taskbox list`
        position: usize,
    },

    /// Delete a task
    Rm {
        /// 1-based position from `taskbox list`
        position: usize,
    },

    /// Show where tasks are stored
    Path,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let dir = self.dir;
        let json = self.json;
        let quiet = self.quiet;
        match self.command.unwrap_or(Commands::Ui) {
            Commands::Ui => task::run_ui(dir),
            Commands::Add { text } => task::run_add(task::AddOptions {
                text,
                dir,
                json,
                quiet,
            }),
            Commands::List => task::run_list(task::ListOptions { dir, json, quiet }),
            Commands::Edit { position, text } => task::run_edit(task::EditOptions {
                position,
                text,
                dir,
                json,
                quiet,
            }),
            Commands::Toggle { position } => task::run_toggle(task::PositionOptions {
                position,
                dir,
                json,
                quiet,
            }),
            Commands::Rm { position } => task::run_rm(task::PositionOptions {
                position,
                dir,
                json,
                quiet,
            }),
            Commands::Path => task::run_path(task::PathOptions { dir, json, quiet }),
        }
    }
}

/// An opened task list and where it came from
pub(crate) struct StoreContext {
    pub config: Config,
    pub blob_path: PathBuf,
    pub store: TaskStore,
    pub load: LoadOutcome,
}

pub(crate) fn open_store(dir: Option<PathBuf>) -> Result<StoreContext> {
    let dir = storage::resolve_data_dir(dir)?;
    let config = Config::load_from_dir(&dir);
    let backend = FileStore::new(&dir);
    let blob_path = backend.blob_path(&config.storage.key);
    let (store, load) = TaskStore::open(StorageAdapter::new(backend, config.storage.key.clone()));
    tracing::debug!(dir = %dir.display(), ?load, "task store opened");
    Ok(StoreContext {
        config,
        blob_path,
        store,
        load,
    })
}
