//! tasksync - task repository with a memory cache over local and remote
//! data sources.

pub mod cli;
pub mod config;
pub mod remote;
pub mod storage;

pub use config::Config;
pub use storage::{InMemoryDataSource, TasksRepository};
