//! Task repository backed by a remote source, a local source and a memory
//! cache.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex, RwLock};

use tasksync_core::events::TaskEvent;
use tasksync_core::storage::{
    DataSourceError, RepositoryError, RepositoryResult, SourceKind, TaskDataSource,
};
use tasksync_core::task::{
    compute_statistics, filter_tasks, validate_task, Task, TaskFilter, TaskStatistics,
};

use super::state::CacheState;

/// Channel capacity for task change notifications.
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Task repository with a memory cache over a remote and a local source.
///
/// All writes to either store go through this type so the cache stays
/// consistent with them. The cache is guarded by an async `RwLock` that is
/// never held across a data source call, and each call applies its cache
/// mutation in one step after its I/O completes: dropping a pending future
/// leaves the cache as it was.
///
/// Every call that reaches a data source first takes the I/O gate and holds
/// it until its cache mutation is applied. A refresh therefore never
/// mirrors a remote snapshot taken before a concurrent write. Cache hits
/// skip the gate.
///
/// # Type Parameters
///
/// * `R` - The remote data source
/// * `L` - The local data source
pub struct TasksRepository<R, L>
where
    R: TaskDataSource,
    L: TaskDataSource,
{
    remote: Arc<R>,
    local: Arc<L>,
    cache: RwLock<CacheState>,
    io_gate: Mutex<()>,
    events: broadcast::Sender<TaskEvent>,
}

impl<R, L> TasksRepository<R, L>
where
    R: TaskDataSource,
    L: TaskDataSource,
{
    /// Creates a repository with an uninitialized, dirty cache.
    pub fn new(remote: Arc<R>, local: Arc<L>) -> Self {
        Self::with_event_capacity(remote, local, DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a repository whose event channel buffers `capacity` events
    /// per lagging subscriber.
    pub fn with_event_capacity(remote: Arc<R>, local: Arc<L>, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            remote,
            local,
            cache: RwLock::new(CacheState::default()),
            io_gate: Mutex::new(()),
            events,
        }
    }

    /// Subscribes to task change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.events.subscribe()
    }

    /// Returns true if the next plain read will consult the remote.
    pub async fn is_cache_dirty(&self) -> bool {
        self.cache.read().await.is_dirty()
    }

    /// Returns true once any read or write has populated the cache.
    pub async fn is_cache_initialized(&self) -> bool {
        self.cache.read().await.is_initialized()
    }

    /// Number of tasks currently held in the cache.
    pub async fn cached_task_count(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Gets all tasks.
    ///
    /// A clean cache is returned without I/O. Otherwise, or when
    /// `force_update` is set, the remote is queried: on success the cache and
    /// the local store are replaced with its result and the cache becomes
    /// clean; on failure the local store answers and the cache stays dirty.
    /// Fails with [`RepositoryError::AggregateUnavailable`] when neither
    /// source answers.
    ///
    /// The result is sorted by task id.
    pub async fn get_tasks(&self, force_update: bool) -> RepositoryResult<Vec<Task>> {
        if !force_update {
            if let Some(tasks) = self.fresh_tasks().await {
                return Ok(tasks);
            }
        }

        let _gate = self.io_gate.lock().await;
        if !force_update {
            // A refresh that completed while waiting on the gate answers this call.
            if let Some(tasks) = self.fresh_tasks().await {
                return Ok(tasks);
            }
        }

        tracing::trace!(force_update, "Cache miss for tasks, querying remote");
        match self.remote.get_tasks().await {
            Ok(tasks) => {
                self.local
                    .replace_tasks(&tasks)
                    .await
                    .map_err(|e| RepositoryError::from_source(SourceKind::Local, e))?;

                let snapshot = self.cache.write().await.replace_from_remote(tasks);
                tracing::debug!(count = snapshot.len(), "Tasks refreshed from remote");
                self.publish(TaskEvent::tasks_loaded(snapshot.len(), SourceKind::Remote));
                Ok(snapshot)
            }
            Err(remote_err) => {
                tracing::warn!(error = %remote_err, "Remote unavailable, falling back to local tasks");
                let tasks = self.local.get_tasks().await.map_err(|local_err| {
                    tracing::warn!(error = %local_err, "Local tasks unavailable");
                    RepositoryError::AggregateUnavailable
                })?;

                let snapshot = self.cache.write().await.replace_from_local(tasks);
                tracing::debug!(count = snapshot.len(), "Tasks loaded from local");
                self.publish(TaskEvent::tasks_loaded(snapshot.len(), SourceKind::Local));
                Ok(snapshot)
            }
        }
    }

    async fn fresh_tasks(&self) -> Option<Vec<Task>> {
        let tasks = self.cache.read().await.fresh_snapshot()?;
        tracing::trace!(count = tasks.len(), "Cache hit for tasks");
        Some(tasks)
    }

    /// Gets all tasks passing `filter`.
    pub async fn get_tasks_filtered(
        &self,
        filter: TaskFilter,
        force_update: bool,
    ) -> RepositoryResult<Vec<Task>> {
        let tasks = self.get_tasks(force_update).await?;
        Ok(filter_tasks(&tasks, filter).into_iter().cloned().collect())
    }

    /// Active/completed counts over all tasks.
    pub async fn statistics(&self, force_update: bool) -> RepositoryResult<TaskStatistics> {
        let tasks = self.get_tasks(force_update).await?;
        Ok(compute_statistics(&tasks))
    }

    /// Gets a task by id. `Ok(None)` means no source that answered has it.
    ///
    /// Without `force_update` the lookup order is cache, local, remote. With
    /// it, the remote is asked first and the local store is consulted only if
    /// the remote cannot answer. A task found in a source is written to the
    /// cache (and to the local store when it came from the remote). A forced
    /// lookup the remote answers with `None` removes the task locally too.
    pub async fn get_task(&self, id: &str, force_update: bool) -> RepositoryResult<Option<Task>> {
        if force_update {
            let _gate = self.io_gate.lock().await;
            return self.get_task_forced(id).await;
        }

        if let Some(task) = self.cached_task(id).await {
            return Ok(Some(task));
        }

        let _gate = self.io_gate.lock().await;
        if let Some(task) = self.cached_task(id).await {
            return Ok(Some(task));
        }

        tracing::trace!(task_id = %id, "Cache miss for task");
        let local_err = match self.local.get_task(id).await {
            Ok(Some(task)) => {
                self.cache.write().await.upsert(task.clone());
                return Ok(Some(task));
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(task_id = %id, error = %err, "Local lookup failed");
                Some(err)
            }
        };

        match self.remote.get_task(id).await {
            Ok(Some(task)) => self.store_remote_task(task).await.map(Some),
            Ok(None) => Ok(None),
            Err(remote_err) => {
                tracing::warn!(task_id = %id, error = %remote_err, "Remote lookup failed");
                match local_err {
                    Some(_) => Err(RepositoryError::AggregateUnavailable),
                    None => Err(RepositoryError::from_source(SourceKind::Remote, remote_err)),
                }
            }
        }
    }

    async fn cached_task(&self, id: &str) -> Option<Task> {
        let task = self.cache.read().await.get(id)?;
        tracing::trace!(task_id = %id, "Cache hit for task");
        Some(task)
    }

    async fn get_task_forced(&self, id: &str) -> RepositoryResult<Option<Task>> {
        match self.remote.get_task(id).await {
            Ok(Some(task)) => self.store_remote_task(task).await.map(Some),
            Ok(None) => {
                // The remote is authoritative: local and cached copies are stale.
                self.local
                    .delete_task(id)
                    .await
                    .map_err(|e| local_write_error(e, id))?;
                self.cache.write().await.remove(id);
                Ok(None)
            }
            Err(remote_err) => {
                tracing::warn!(
                    task_id = %id,
                    error = %remote_err,
                    "Remote unavailable, falling back to local task"
                );
                match self.local.get_task(id).await {
                    Ok(Some(task)) => {
                        self.cache.write().await.upsert(task.clone());
                        Ok(Some(task))
                    }
                    Ok(None) => Ok(None),
                    Err(local_err) => {
                        tracing::warn!(task_id = %id, error = %local_err, "Local lookup failed");
                        Err(RepositoryError::AggregateUnavailable)
                    }
                }
            }
        }
    }

    async fn store_remote_task(&self, task: Task) -> RepositoryResult<Task> {
        self.local
            .save_task(&task)
            .await
            .map_err(|e| RepositoryError::from_source(SourceKind::Local, e))?;
        self.cache.write().await.upsert(task.clone());
        Ok(task)
    }

    /// Saves a task to the remote and the local store, then caches it.
    ///
    /// Empty tasks are rejected before anything is written.
    pub async fn save_task(&self, task: &Task) -> RepositoryResult<()> {
        validate_task(task)?;
        let _gate = self.io_gate.lock().await;

        self.remote
            .save_task(task)
            .await
            .map_err(|e| remote_write_error(e, task.id()))?;
        self.local
            .save_task(task)
            .await
            .map_err(|e| local_write_error(e, task.id()))?;

        self.cache.write().await.upsert(task.clone());

        tracing::debug!(task_id = %task.id(), title = %task.title(), "Task saved");
        self.publish(TaskEvent::task_saved(task.clone()));
        Ok(())
    }

    /// Marks `task` completed in both stores and in the cache.
    pub async fn complete_task(&self, task: &Task) -> RepositoryResult<Task> {
        let completed = task.clone().with_completed(true);
        let _gate = self.io_gate.lock().await;

        self.remote
            .complete_task(task)
            .await
            .map_err(|e| remote_write_error(e, task.id()))?;
        self.local
            .complete_task(task)
            .await
            .map_err(|e| local_write_error(e, task.id()))?;

        self.cache.write().await.upsert(completed.clone());

        tracing::debug!(task_id = %task.id(), "Task completed");
        self.publish(TaskEvent::task_completed(completed.clone()));
        Ok(completed)
    }

    /// Resolves `id` like [`get_task`](Self::get_task) and completes it.
    pub async fn complete_task_by_id(&self, id: &str) -> RepositoryResult<Task> {
        let task = self.require_task(id).await?;
        self.complete_task(&task).await
    }

    /// Marks `task` active in both stores and in the cache.
    pub async fn activate_task(&self, task: &Task) -> RepositoryResult<Task> {
        let activated = task.clone().with_completed(false);
        let _gate = self.io_gate.lock().await;

        self.remote
            .activate_task(task)
            .await
            .map_err(|e| remote_write_error(e, task.id()))?;
        self.local
            .activate_task(task)
            .await
            .map_err(|e| local_write_error(e, task.id()))?;

        self.cache.write().await.upsert(activated.clone());

        tracing::debug!(task_id = %task.id(), "Task activated");
        self.publish(TaskEvent::task_activated(activated.clone()));
        Ok(activated)
    }

    /// Resolves `id` like [`get_task`](Self::get_task) and activates it.
    pub async fn activate_task_by_id(&self, id: &str) -> RepositoryResult<Task> {
        let task = self.require_task(id).await?;
        self.activate_task(&task).await
    }

    async fn require_task(&self, id: &str) -> RepositoryResult<Task> {
        self.get_task(id, false)
            .await?
            .ok_or_else(|| RepositoryError::NotFound { id: id.to_string() })
    }

    /// Deletes completed tasks from both stores and the cache.
    pub async fn clear_completed_tasks(&self) -> RepositoryResult<()> {
        let _gate = self.io_gate.lock().await;
        self.remote
            .clear_completed_tasks()
            .await
            .map_err(|e| RepositoryError::from_source(SourceKind::Remote, e))?;
        self.local
            .clear_completed_tasks()
            .await
            .map_err(|e| RepositoryError::from_source(SourceKind::Local, e))?;

        let removed = self.cache.write().await.remove_completed();

        tracing::debug!(removed, "Completed tasks cleared");
        self.publish(TaskEvent::completed_tasks_cleared(removed));
        Ok(())
    }

    /// Deletes every task from both stores and empties the cache.
    pub async fn delete_all_tasks(&self) -> RepositoryResult<()> {
        let _gate = self.io_gate.lock().await;
        self.remote
            .delete_all_tasks()
            .await
            .map_err(|e| RepositoryError::from_source(SourceKind::Remote, e))?;
        self.local
            .delete_all_tasks()
            .await
            .map_err(|e| RepositoryError::from_source(SourceKind::Local, e))?;

        self.cache.write().await.clear();

        tracing::debug!("All tasks deleted");
        self.publish(TaskEvent::AllTasksDeleted);
        Ok(())
    }

    /// Deletes a task from both stores and the cache.
    pub async fn delete_task(&self, id: &str) -> RepositoryResult<()> {
        let _gate = self.io_gate.lock().await;
        self.remote
            .delete_task(id)
            .await
            .map_err(|e| remote_write_error(e, id))?;
        self.local
            .delete_task(id)
            .await
            .map_err(|e| local_write_error(e, id))?;

        self.cache.write().await.remove(id);

        tracing::debug!(task_id = %id, "Task deleted");
        self.publish(TaskEvent::task_deleted(id));
        Ok(())
    }

    /// Marks the cache dirty so the next plain read goes to the remote.
    pub async fn refresh_tasks(&self) {
        self.cache.write().await.invalidate();
        tracing::trace!("Task cache invalidated");
    }

    fn publish(&self, event: TaskEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn remote_write_error(error: DataSourceError, id: &str) -> RepositoryError {
    tracing::warn!(task_id = %id, error = %error, "Remote write failed");
    RepositoryError::from_source(SourceKind::Remote, error)
}

fn local_write_error(error: DataSourceError, id: &str) -> RepositoryError {
    tracing::warn!(task_id = %id, error = %error, "Local write failed");
    RepositoryError::from_source(SourceKind::Local, error)
}
