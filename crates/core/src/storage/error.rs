use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task::TaskError;

/// Identifies which backing store an error or event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Local,
    Remote,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Local => f.write_str("local"),
            SourceKind::Remote => f.write_str("remote"),
        }
    }
}

/// Errors returned by a single data source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    #[error("{0} data source unavailable")]
    Unavailable(SourceKind),
    #[error("Task not found: {id}")]
    NotFound { id: String },
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for data source operations.
pub type Result<T> = std::result::Result<T, DataSourceError>;

/// Errors surfaced by the task repository.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Task not found: {id}")]
    NotFound { id: String },
    #[error("{0} data source unavailable")]
    SourceUnavailable(SourceKind),
    #[error("No data available: remote and local data sources both failed")]
    AggregateUnavailable,
    #[error("Invalid task: {0}")]
    InvalidTask(#[from] TaskError),
    #[error("{kind} data source failed: {error}")]
    Source {
        kind: SourceKind,
        error: DataSourceError,
    },
}

impl RepositoryError {
    /// Lifts a data source error into the repository taxonomy, tagging it
    /// with the source it came from.
    pub fn from_source(kind: SourceKind, error: DataSourceError) -> Self {
        match error {
            DataSourceError::Unavailable(_) => RepositoryError::SourceUnavailable(kind),
            DataSourceError::NotFound { id } => RepositoryError::NotFound { id },
            error => RepositoryError::Source { kind, error },
        }
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::Local.to_string(), "local");
        assert_eq!(SourceKind::Remote.to_string(), "remote");
    }

    #[test]
    fn test_data_source_unavailable_display() {
        let error = DataSourceError::Unavailable(SourceKind::Remote);
        assert_eq!(error.to_string(), "remote data source unavailable");
    }

    #[test]
    fn test_data_source_not_found_display() {
        let error = DataSourceError::NotFound {
            id: "abc-123".to_string(),
        };
        assert_eq!(error.to_string(), "Task not found: abc-123");
    }

    #[test]
    fn test_data_source_query_failed_display() {
        let error = DataSourceError::QueryFailed("disk I/O error".to_string());
        assert_eq!(error.to_string(), "Query failed: disk I/O error");
    }

    #[test]
    fn test_aggregate_unavailable_display() {
        assert_eq!(
            RepositoryError::AggregateUnavailable.to_string(),
            "No data available: remote and local data sources both failed"
        );
    }

    #[test]
    fn test_invalid_task_from_task_error() {
        let error: RepositoryError = TaskError::Empty.into();
        assert_eq!(
            error.to_string(),
            "Invalid task: Task must have a title or a description"
        );
    }

    #[test]
    fn test_from_source_maps_unavailable_to_queried_source() {
        let error = RepositoryError::from_source(
            SourceKind::Local,
            DataSourceError::Unavailable(SourceKind::Local),
        );
        assert_eq!(error, RepositoryError::SourceUnavailable(SourceKind::Local));
    }

    #[test]
    fn test_from_source_keeps_not_found_id() {
        let error = RepositoryError::from_source(
            SourceKind::Remote,
            DataSourceError::NotFound {
                id: "t-1".to_string(),
            },
        );
        assert_eq!(
            error,
            RepositoryError::NotFound {
                id: "t-1".to_string()
            }
        );
    }

    #[test]
    fn test_from_source_wraps_other_errors() {
        let error = RepositoryError::from_source(
            SourceKind::Local,
            DataSourceError::QueryFailed("locked".to_string()),
        );
        assert_eq!(error.to_string(), "local data source failed: Query failed: locked");
    }
}
