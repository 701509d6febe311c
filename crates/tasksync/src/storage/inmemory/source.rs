//! In-memory data source implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tasksync_core::storage::{DataSourceError, Result, SourceKind, TaskDataSource};
use tasksync_core::task::Task;

/// In-memory task store.
///
/// `None` in the inner map means the store is unavailable: every call then
/// fails with [`DataSourceError::Unavailable`]. Clones share the same
/// storage, so a test can keep a handle to flip availability or inspect the
/// contents while the repository owns another.
#[derive(Debug, Clone)]
pub struct InMemoryDataSource {
    kind: SourceKind,
    tasks: Arc<RwLock<Option<HashMap<String, Task>>>>,
    latency: Duration,
    calls: Arc<AtomicUsize>,
}

impl InMemoryDataSource {
    /// Creates an empty, available store.
    pub fn new(kind: SourceKind) -> Self {
        Self::from_state(kind, Some(HashMap::new()))
    }

    /// Creates an available store holding `tasks`.
    pub fn with_tasks(kind: SourceKind, tasks: impl IntoIterator<Item = Task>) -> Self {
        Self::from_state(kind, Some(index_by_id(tasks)))
    }

    /// Creates a store that answers every call with `Unavailable`.
    pub fn unavailable(kind: SourceKind) -> Self {
        Self::from_state(kind, None)
    }

    fn from_state(kind: SourceKind, tasks: Option<HashMap<String, Task>>) -> Self {
        Self {
            kind,
            tasks: Arc::new(RwLock::new(tasks)),
            latency: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Delays every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Replaces the contents and makes the store available.
    pub async fn set_tasks(&self, tasks: impl IntoIterator<Item = Task>) {
        *self.tasks.write().await = Some(index_by_id(tasks));
    }

    /// Unsets the contents so that every call fails.
    pub async fn set_unavailable(&self) {
        *self.tasks.write().await = None;
    }

    /// Returns the stored tasks sorted by id, or `None` when unavailable.
    ///
    /// Does not count as a call.
    pub async fn snapshot(&self) -> Option<Vec<Task>> {
        self.tasks.read().await.as_ref().map(|tasks| {
            let mut tasks: Vec<Task> = tasks.values().cloned().collect();
            tasks.sort_by(|a, b| a.id().cmp(b.id()));
            tasks
        })
    }

    /// Number of data source calls served (or refused) so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn begin_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn unavailable_error(&self) -> DataSourceError {
        DataSourceError::Unavailable(self.kind)
    }

    async fn set_completed(&self, id: &str, completed: bool) -> Result<()> {
        self.begin_call().await;
        let mut guard = self.tasks.write().await;
        let tasks = guard.as_mut().ok_or_else(|| self.unavailable_error())?;
        let task = tasks.remove(id).ok_or_else(|| DataSourceError::NotFound {
            id: id.to_string(),
        })?;
        tasks.insert(id.to_string(), task.with_completed(completed));
        Ok(())
    }
}

fn index_by_id(tasks: impl IntoIterator<Item = Task>) -> HashMap<String, Task> {
    tasks
        .into_iter()
        .map(|task| (task.id().to_string(), task))
        .collect()
}

#[async_trait]
impl TaskDataSource for InMemoryDataSource {
    async fn get_tasks(&self) -> Result<Vec<Task>> {
        self.begin_call().await;
        let guard = self.tasks.read().await;
        let tasks = guard.as_ref().ok_or_else(|| self.unavailable_error())?;
        Ok(tasks.values().cloned().collect())
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        self.begin_call().await;
        let guard = self.tasks.read().await;
        let tasks = guard.as_ref().ok_or_else(|| self.unavailable_error())?;
        Ok(tasks.get(id).cloned())
    }

    async fn save_task(&self, task: &Task) -> Result<()> {
        self.begin_call().await;
        let mut guard = self.tasks.write().await;
        let tasks = guard.as_mut().ok_or_else(|| self.unavailable_error())?;
        tasks.insert(task.id().to_string(), task.clone());
        Ok(())
    }

    async fn complete_task_by_id(&self, id: &str) -> Result<()> {
        self.set_completed(id, true).await
    }

    async fn activate_task_by_id(&self, id: &str) -> Result<()> {
        self.set_completed(id, false).await
    }

    async fn clear_completed_tasks(&self) -> Result<()> {
        self.begin_call().await;
        let mut guard = self.tasks.write().await;
        let tasks = guard.as_mut().ok_or_else(|| self.unavailable_error())?;
        tasks.retain(|_, task| task.is_active());
        Ok(())
    }

    async fn delete_all_tasks(&self) -> Result<()> {
        self.begin_call().await;
        let mut guard = self.tasks.write().await;
        let tasks = guard.as_mut().ok_or_else(|| self.unavailable_error())?;
        tasks.clear();
        Ok(())
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        self.begin_call().await;
        let mut guard = self.tasks.write().await;
        let tasks = guard.as_mut().ok_or_else(|| self.unavailable_error())?;
        tasks.remove(id);
        Ok(())
    }

    async fn replace_tasks(&self, new_tasks: &[Task]) -> Result<()> {
        self.begin_call().await;
        let mut guard = self.tasks.write().await;
        let tasks = guard.as_mut().ok_or_else(|| self.unavailable_error())?;
        *tasks = index_by_id(new_tasks.iter().cloned());
        Ok(())
    }
}
