//! Simulated remote for the command-line shell.
//!
//! Each process builds its remote from the durable local store, so a
//! one-shot run never mirrors an empty remote over what earlier runs saved.

use tasksync_core::storage::{RepositoryError, RepositoryResult, SourceKind, TaskDataSource};
use tasksync_core::task::sample_tasks;

use crate::config::Config;
use crate::storage::InMemoryDataSource;

/// Builds the in-memory remote from the contents of `local`.
///
/// An empty local store is seeded with the sample tasks when
/// `config.seed_remote` is set; the samples are written to `local` as well.
pub async fn simulated_remote<L>(local: &L, config: &Config) -> RepositoryResult<InMemoryDataSource>
where
    L: TaskDataSource,
{
    let mut tasks = local
        .get_tasks()
        .await
        .map_err(|e| RepositoryError::from_source(SourceKind::Local, e))?;

    if tasks.is_empty() && config.seed_remote {
        tasks = sample_tasks();
        local
            .replace_tasks(&tasks)
            .await
            .map_err(|e| RepositoryError::from_source(SourceKind::Local, e))?;
        tracing::info!(count = tasks.len(), "Seeded empty store with sample tasks");
    } else {
        tracing::debug!(count = tasks.len(), "Simulated remote loaded from local store");
    }

    Ok(InMemoryDataSource::with_tasks(SourceKind::Remote, tasks).with_latency(config.remote_latency()))
}
