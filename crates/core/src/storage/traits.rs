use async_trait::async_trait;

use crate::task::Task;

use super::Result;

/// A backing store for tasks.
///
/// Implemented by both the durable local store and the remote store. Every
/// operation either succeeds or returns a [`DataSourceError`]; an
/// unreachable store answers with [`DataSourceError::Unavailable`] rather
/// than an empty result.
///
/// [`DataSourceError`]: super::DataSourceError
/// [`DataSourceError::Unavailable`]: super::DataSourceError::Unavailable
#[async_trait]
pub trait TaskDataSource: Send + Sync {
    /// Gets every stored task.
    async fn get_tasks(&self) -> Result<Vec<Task>>;

    /// Gets a task by its ID. `Ok(None)` means the store answered and the
    /// task is absent.
    async fn get_task(&self, id: &str) -> Result<Option<Task>>;

    /// Inserts or overwrites a task by ID.
    async fn save_task(&self, task: &Task) -> Result<()>;

    /// Marks a stored task as completed. Fails with `NotFound` if absent.
    async fn complete_task_by_id(&self, id: &str) -> Result<()>;

    /// Marks a stored task as active. Fails with `NotFound` if absent.
    async fn activate_task_by_id(&self, id: &str) -> Result<()>;

    /// Deletes every completed task.
    async fn clear_completed_tasks(&self) -> Result<()>;

    /// Deletes every task.
    async fn delete_all_tasks(&self) -> Result<()>;

    /// Deletes a task by its ID. Deleting an absent task succeeds.
    async fn delete_task(&self, id: &str) -> Result<()>;

    /// Stores `task` as completed.
    async fn complete_task(&self, task: &Task) -> Result<()> {
        self.save_task(&task.clone().with_completed(true)).await
    }

    /// Stores `task` as active.
    async fn activate_task(&self, task: &Task) -> Result<()> {
        self.save_task(&task.clone().with_completed(false)).await
    }

    /// Replaces the whole store contents with `tasks`.
    ///
    /// The default clears the store and saves each task in turn; backends
    /// that support transactions should override it.
    async fn replace_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.delete_all_tasks().await?;
        for task in tasks {
            self.save_task(task).await?;
        }
        Ok(())
    }
}
