//! Change notifications published by the task repository.
//!
//! Consumers subscribe to these instead of polling; the repository itself
//! never depends on who is listening.

use serde::{Deserialize, Serialize};

use crate::storage::SourceKind;
use crate::task::Task;

/// A change to the task collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// The cache was (re)loaded from a data source.
    TasksLoaded { count: usize, source: SourceKind },
    TaskSaved { task: Task },
    TaskCompleted { task: Task },
    TaskActivated { task: Task },
    TaskDeleted { id: String },
    /// Completed tasks were removed; `removed` counts cache entries dropped.
    CompletedTasksCleared { removed: usize },
    AllTasksDeleted,
}

impl TaskEvent {
    pub fn tasks_loaded(count: usize, source: SourceKind) -> Self {
        TaskEvent::TasksLoaded { count, source }
    }

    pub fn task_saved(task: Task) -> Self {
        TaskEvent::TaskSaved { task }
    }

    pub fn task_completed(task: Task) -> Self {
        TaskEvent::TaskCompleted { task }
    }

    pub fn task_activated(task: Task) -> Self {
        TaskEvent::TaskActivated { task }
    }

    pub fn task_deleted(id: impl Into<String>) -> Self {
        TaskEvent::TaskDeleted { id: id.into() }
    }

    pub fn completed_tasks_cleared(removed: usize) -> Self {
        TaskEvent::CompletedTasksCleared { removed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = TaskEvent::task_deleted("abc");

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json, serde_json::json!({"type": "task_deleted", "id": "abc"}));
    }

    #[test]
    fn test_tasks_loaded_serializes_source() {
        let event = TaskEvent::tasks_loaded(2, SourceKind::Remote);

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"type": "tasks_loaded", "count": 2, "source": "remote"})
        );
    }

    #[test]
    fn test_event_roundtrip_with_task() {
        let task = Task::new("Title", "Description").with_id("1");
        let event = TaskEvent::task_completed(task.with_completed(true));

        let json = serde_json::to_string(&event).unwrap();
        let parsed: TaskEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, event);
    }
}
