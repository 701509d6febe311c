//! In-memory data source.
//!
//! Stores tasks in a HashMap wrapped in `Arc<RwLock<_>>`. The map can be
//! unset to simulate an unreachable store, and every call can be delayed to
//! simulate network latency, which makes this the simulated remote source
//! as well as the test double for the repository.
//!
//! # Example
//!
//! ```rust,ignore
//! use tasksync::storage::inmemory::InMemoryDataSource;
//! use tasksync_core::storage::SourceKind;
//!
//! let remote = InMemoryDataSource::with_tasks(SourceKind::Remote, sample_tasks())
//!     .with_latency(Duration::from_millis(500));
//! ```

mod source;

pub use source::InMemoryDataSource;
