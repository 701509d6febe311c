mod error;
mod mock_data;
mod operations;
mod types;

pub use error::TaskError;
pub use mock_data::sample_tasks;
pub use operations::{compute_statistics, filter_tasks, validate_task, TaskFilter, TaskStatistics};
pub use types::Task;
