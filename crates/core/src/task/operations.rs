use serde::{Deserialize, Serialize};

use super::error::TaskError;
use super::types::Task;

/// Which tasks a list view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    /// Returns true if the task passes this filter.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => task.is_active(),
            TaskFilter::Completed => task.is_completed(),
        }
    }
}

/// Filters tasks by completion state, preserving input order.
pub fn filter_tasks(tasks: &[Task], filter: TaskFilter) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

/// Counts of active and completed tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatistics {
    pub active: usize,
    pub completed: usize,
}

impl TaskStatistics {
    pub fn total(&self) -> usize {
        self.active + self.completed
    }

    /// Returns true if there are no tasks at all.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Percentage of active tasks, 0.0 when there are no tasks.
    pub fn active_percent(&self) -> f64 {
        percent(self.active, self.total())
    }

    /// Percentage of completed tasks, 0.0 when there are no tasks.
    pub fn completed_percent(&self) -> f64 {
        percent(self.completed, self.total())
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

/// Computes active/completed counts for a task list.
pub fn compute_statistics(tasks: &[Task]) -> TaskStatistics {
    let completed = tasks.iter().filter(|task| task.is_completed()).count();
    TaskStatistics {
        active: tasks.len() - completed,
        completed,
    }
}

/// Validates a task before it is saved.
pub fn validate_task(task: &Task) -> Result<(), TaskError> {
    if task.is_empty() {
        return Err(TaskError::Empty);
    }
    Ok(())
}
