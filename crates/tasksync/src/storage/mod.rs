//! Storage backends and the cached task repository.
//!
//! The data sources implement `tasksync_core::storage::TaskDataSource`;
//! [`TasksRepository`] composes a remote and a local source behind a memory
//! cache.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): durable local store using `rusqlite` and `tokio-rusqlite`
//!
//! Without `sqlite`, the in-memory source stands in for the local store.

pub mod cached;
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use cached::TasksRepository;
pub use inmemory::InMemoryDataSource;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDataSource;
