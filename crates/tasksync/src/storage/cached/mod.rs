//! Cached task repository.
//!
//! Mediates between a remote and a local data source and keeps an in-memory
//! cache of the task collection:
//!
//! - **Reads**: serve from the cache while it is clean; otherwise refresh from
//!   the remote, mirror the result into the local store, and fall back to the
//!   local store when the remote cannot answer
//! - **Writes**: write through to the remote and the local store, then update
//!   the cache in place and publish a [`TaskEvent`]
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! let remote = Arc::new(InMemoryDataSource::with_tasks(SourceKind::Remote, sample_tasks()));
//! let local = Arc::new(SqliteDataSource::new("tasksync.db").await?);
//!
//! let repository = TasksRepository::new(remote, local);
//! let tasks = repository.get_tasks(false).await?;
//! ```
//!
//! [`TaskEvent`]: tasksync_core::events::TaskEvent

mod repository;
mod state;

pub use repository::{TasksRepository, DEFAULT_EVENT_CAPACITY};
