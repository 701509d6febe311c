//! Command-line interface over the task repository.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use tasksync_core::storage::{RepositoryError, RepositoryResult, TaskDataSource};
use tasksync_core::task::{Task, TaskFilter, TaskStatistics};

use crate::storage::TasksRepository;

/// tasksync - a to-do list with a cached local/remote task repository
#[derive(Debug, Parser)]
#[command(name = "tasksync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the SQLite database backing the local store
    #[arg(long, env = "TASKSYNC_SQLITE_PATH")]
    pub db: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Which tasks to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    #[default]
    All,
    Active,
    Completed,
}

impl From<FilterArg> for TaskFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => TaskFilter::All,
            FilterArg::Active => TaskFilter::Active,
            FilterArg::Completed => TaskFilter::Completed,
        }
    }
}

/// Available commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List tasks
    List {
        #[arg(long, value_enum, default_value = "all")]
        filter: FilterArg,
        /// Refresh from the remote even if the cache is clean
        #[arg(long)]
        force: bool,
    },
    /// Show a single task
    Get {
        id: String,
        #[arg(long)]
        force: bool,
    },
    /// Add a new task
    Add {
        title: String,
        #[arg(long, short, default_value = "")]
        description: String,
    },
    /// Change the title or description of a task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Mark a task as completed
    Complete { id: String },
    /// Mark a task as active
    Activate { id: String },
    /// Delete all completed tasks
    ClearCompleted,
    /// Delete a task
    Delete { id: String },
    /// Delete every task
    DeleteAll,
    /// Show active/completed counts
    Stats {
        #[arg(long)]
        force: bool,
    },
}

/// Runs a command against the repository and returns the text to print.
pub async fn run<R, L>(
    repository: &TasksRepository<R, L>,
    command: Command,
    format: OutputFormat,
) -> RepositoryResult<String>
where
    R: TaskDataSource,
    L: TaskDataSource,
{
    let output = match command {
        Command::List { filter, force } => {
            let tasks = repository.get_tasks_filtered(filter.into(), force).await?;
            render(tasks.as_slice(), format, format_tasks)
        }
        Command::Get { id, force } => match repository.get_task(&id, force).await? {
            Some(task) => render(&task, format, format_task),
            None => format!("Task not found: {id}"),
        },
        Command::Add { title, description } => {
            let task = Task::new(title, description);
            repository.save_task(&task).await?;
            render(&task, format, |t| format!("Added:\n{}", format_task(t)))
        }
        Command::Edit {
            id,
            title,
            description,
        } => {
            let current = repository
                .get_task(&id, false)
                .await?
                .ok_or_else(|| RepositoryError::NotFound { id: id.clone() })?;
            let edited = Task::new(
                title.unwrap_or_else(|| current.title().to_string()),
                description.unwrap_or_else(|| current.description().to_string()),
            )
            .with_id(current.id())
            .with_completed(current.is_completed());
            repository.save_task(&edited).await?;
            render(&edited, format, |t| format!("Updated:\n{}", format_task(t)))
        }
        Command::Complete { id } => {
            let task = repository.complete_task_by_id(&id).await?;
            render(&task, format, |t| format!("Completed:\n{}", format_task(t)))
        }
        Command::Activate { id } => {
            let task = repository.activate_task_by_id(&id).await?;
            render(&task, format, |t| format!("Activated:\n{}", format_task(t)))
        }
        Command::ClearCompleted => {
            repository.clear_completed_tasks().await?;
            "Completed tasks cleared".to_string()
        }
        Command::Delete { id } => {
            repository.delete_task(&id).await?;
            format!("Deleted task {id}")
        }
        Command::DeleteAll => {
            repository.delete_all_tasks().await?;
            "All tasks deleted".to_string()
        }
        Command::Stats { force } => {
            let stats = repository.statistics(force).await?;
            render(&stats, format, format_statistics)
        }
    };
    Ok(output)
}

fn render<T, F>(value: &T, format: OutputFormat, pretty: F) -> String
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).unwrap_or_default(),
        OutputFormat::Pretty => pretty(value),
    }
}

/// One line per task: checkbox, list title, id.
pub fn format_task(task: &Task) -> String {
    let check = if task.is_completed() { "x" } else { " " };
    format!("[{check}] {} ({})", task.title_for_list(), task.id())
}

pub fn format_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks".to_string();
    }
    tasks.iter().map(format_task).collect::<Vec<_>>().join("\n")
}

pub fn format_statistics(stats: &TaskStatistics) -> String {
    if stats.is_empty() {
        return "No tasks".to_string();
    }
    format!(
        "Active tasks: {} ({:.1}%)\nCompleted tasks: {} ({:.1}%)",
        stats.active,
        stats.active_percent(),
        stats.completed,
        stats.completed_percent()
    )
}
