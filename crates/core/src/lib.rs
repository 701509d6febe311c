//! tasksync_core - functional core for the tasksync task repository.
//!
//! Pure domain types and contracts with no I/O: the [`task::Task`] value
//! object, the [`storage::TaskDataSource`] contract every backing store
//! implements, and the [`events::TaskEvent`] notifications published by the
//! repository.

pub mod events;
pub mod storage;
pub mod task;
