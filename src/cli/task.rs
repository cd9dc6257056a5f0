//! taskbox command implementations.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{open_store, StoreContext};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::{self, FileStore};
use crate::task::{serialize_tasks, LoadOutcome, TaskCounts, TaskId, TaskRecord, TaskStore};

const NOT_SAVED_WARNING: &str = "changes could not be saved; see RUST_LOG=warn for details";

pub struct AddOptions {
    pub text: Vec<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub position: usize,
    pub text: Vec<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for commands that take a single position
pub struct PositionOptions {
    pub position: usize,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct PathOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone, Serialize)]
struct TaskView {
    position: usize,
    text: String,
    completed: bool,
}

impl TaskView {
    fn new(position: usize, task: &TaskRecord) -> Self {
        Self {
            position,
            text: task.text.clone(),
            completed: task.completed,
        }
    }

    fn line(&self) -> String {
        let mark = if self.completed { "x" } else { " " };
        format!("{}. [{mark}] {}", self.position, self.text)
    }
}

#[derive(Serialize)]
struct TaskListOutput {
    total: usize,
    counts: TaskCounts,
    tasks: Vec<TaskView>,
    #[serde(skip_serializing_if = "is_zero")]
    skipped: usize,
}

#[derive(Serialize)]
struct TaskEditOutput {
    task: TaskView,
    changed: bool,
}

#[derive(Serialize)]
struct TaskPathOutput {
    data_dir: PathBuf,
    key: String,
    blob_path: PathBuf,
    config_path: PathBuf,
    config_exists: bool,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

pub fn run_ui(dir: Option<PathBuf>) -> Result<()> {
    let ctx = open_store(dir)?;
    if matches!(ctx.load, LoadOutcome::Corrupt | LoadOutcome::Unreadable) {
        tracing::warn!(path = %ctx.blob_path.display(), load = ?ctx.load, "stored tasks not loaded; starting empty");
    }
    crate::ui::task_list::run(ctx.store, ctx.config.ui)
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = open_store(options.dir)?;
    ensure_writable(&ctx)?;
    let text = options.text.join(" ");
    let id = ctx.store.add(&text)?;
    let (position, task) = lookup(&ctx.store, id)?;
    let output = TaskView::new(position, task);

    let mut human = HumanOutput::new("Task added");
    human.push_detail(output.line());
    push_load_warnings(&mut human, &ctx);
    push_save_warning(&mut human, &ctx.store);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &output,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = open_store(options.dir)?;
    let tasks: Vec<TaskView> = ctx
        .store
        .tasks()
        .iter()
        .enumerate()
        .map(|(index, task)| TaskView::new(index + 1, task))
        .collect();
    let counts = ctx.store.counts();
    let skipped = match ctx.load {
        LoadOutcome::Loaded { skipped, .. } => skipped,
        _ => 0,
    };

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", tasks.len().to_string());
    human.push_summary("Open", counts.open.to_string());
    human.push_summary("Completed", counts.completed.to_string());
    for task in &tasks {
        human.push_detail(task.line());
    }
    push_load_warnings(&mut human, &ctx);

    let output = TaskListOutput {
        total: tasks.len(),
        counts,
        tasks,
        skipped,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list",
        &output,
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let mut ctx = open_store(options.dir)?;
    ensure_writable(&ctx)?;
    let id = resolve_position(&ctx.store, options.position)?;
    let text = options.text.join(" ");
    let changed = ctx.store.edit(id, &text);
    let (position, task) = lookup(&ctx.store, id)?;
    let output = TaskEditOutput {
        task: TaskView::new(position, task),
        changed,
    };

    let header = if changed {
        "Task edited"
    } else {
        "Task unchanged"
    };
    let mut human = HumanOutput::new(header);
    human.push_detail(output.task.line());
    if changed {
        push_save_warning(&mut human, &ctx.store);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "edit",
        &output,
        Some(&human),
    )
}

pub fn run_toggle(options: PositionOptions) -> Result<()> {
    let mut ctx = open_store(options.dir)?;
    ensure_writable(&ctx)?;
    let id = resolve_position(&ctx.store, options.position)?;
    let completed = ctx
        .store
        .toggle_complete(id)
        .ok_or(Error::TaskNotFound(options.position))?;
    let (position, task) = lookup(&ctx.store, id)?;
    let output = TaskView::new(position, task);

    let header = if completed {
        "Task completed"
    } else {
        "Task reopened"
    };
    let mut human = HumanOutput::new(header);
    human.push_detail(output.line());
    push_save_warning(&mut human, &ctx.store);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "toggle",
        &output,
        Some(&human),
    )
}

pub fn run_rm(options: PositionOptions) -> Result<()> {
    let mut ctx = open_store(options.dir)?;
    ensure_writable(&ctx)?;
    let id = resolve_position(&ctx.store, options.position)?;
    let removed = ctx
        .store
        .delete(id)
        .ok_or(Error::TaskNotFound(options.position))?;
    let output = TaskView::new(options.position, &removed);

    let mut human = HumanOutput::new("Task deleted");
    human.push_detail(output.line());
    human.push_summary("Remaining", ctx.store.len().to_string());
    push_save_warning(&mut human, &ctx.store);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "rm",
        &output,
        Some(&human),
    )
}

pub fn run_path(options: PathOptions) -> Result<()> {
    let dir = storage::resolve_data_dir(options.dir)?;
    let config = Config::load_from_dir(&dir);
    let config_path = Config::path_in(&dir);
    let output = TaskPathOutput {
        blob_path: FileStore::new(&dir).blob_path(&config.storage.key),
        key: config.storage.key,
        config_exists: config_path.exists(),
        config_path,
        data_dir: dir,
    };

    let mut human = HumanOutput::new(output.data_dir.display().to_string());
    human.push_summary("Key", output.key.clone());
    human.push_summary("Tasks file", output.blob_path.display().to_string());
    let config_state = if output.config_exists {
        output.config_path.display().to_string()
    } else {
        format!("{} (not present, using defaults)", output.config_path.display())
    };
    human.push_summary("Config", config_state);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "path",
        &output,
        Some(&human),
    )
}

fn resolve_position(store: &TaskStore, position: usize) -> Result<TaskId> {
    if position == 0 {
        return Err(Error::InvalidArgument(
            "positions start at 1 (see `taskbox list`)".to_string(),
        ));
    }
    store
        .id_at(position - 1)
        .ok_or(Error::TaskNotFound(position))
}

fn lookup(store: &TaskStore, id: TaskId) -> Result<(usize, &TaskRecord)> {
    let index = store
        .position(id)
        .ok_or_else(|| Error::OperationFailed(format!("task {id} vanished")))?;
    Ok((index + 1, &store.tasks()[index]))
}

/// Mutations would replace a blob that could not be read
fn ensure_writable(ctx: &StoreContext) -> Result<()> {
    if ctx.load == LoadOutcome::Unreadable {
        return Err(Error::OperationFailed(format!(
            "{} could not be read; refusing to overwrite it",
            ctx.blob_path.display()
        )));
    }
    Ok(())
}

fn push_load_warnings(human: &mut HumanOutput, ctx: &StoreContext) {
    match ctx.load {
        LoadOutcome::Unreadable => human.push_warning(format!(
            "{} could not be read; starting empty",
            ctx.blob_path.display()
        )),
        LoadOutcome::Corrupt => human.push_warning(format!(
            "{} is not a task list; starting empty",
            ctx.blob_path.display()
        )),
        LoadOutcome::Loaded { skipped, .. } if skipped > 0 => {
            human.push_warning(format!("skipped {skipped} malformed stored task(s)"))
        }
        _ => {}
    }
}

/// Warn when storage does not hold what the last mutation wrote
fn push_save_warning(human: &mut HumanOutput, store: &TaskStore) {
    let expected = serialize_tasks(store.tasks()).ok();
    if expected.is_none() || expected != store.storage().read_raw().ok().flatten() {
        human.push_warning(NOT_SAVED_WARNING);
    }
}
