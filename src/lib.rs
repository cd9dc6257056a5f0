//! taskbox - a persistent terminal task list
//!
//! This library provides the core of the taskbox CLI: an ordered list of
//! short text tasks that is mirrored to a local key-value store after every
//! change, plus the terminal UI that edits it.
//!
//! # Core Concepts
//!
//! - **Task record**: text plus a completion flag, with a session-local id
//! - **Task store**: the in-memory list; the source of truth while running
//! - **Persistence blob**: the JSON array the store writes to storage
//! - **Edit session**: a row temporarily replaced by an editable buffer
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes
//! - `output`: Human and JSON output for CLI commands
//! - `storage`: Key-value backends and the storage adapter
//! - `task`: Task records and the task store
//! - `ui`: Terminal UI (ratatui)

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod storage;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
