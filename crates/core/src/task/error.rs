use thiserror::Error;

/// Errors that can occur when validating a task.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task must have a title or a description")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_display() {
        assert_eq!(
            TaskError::Empty.to_string(),
            "Task must have a title or a description"
        );
    }
}
