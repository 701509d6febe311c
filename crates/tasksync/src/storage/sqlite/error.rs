//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `DataSourceError`
//! from `tasksync_core::storage`. A store that cannot be reached maps to
//! `Unavailable`, so the repository can fall back to another source.

use tasksync_core::storage::{DataSourceError, SourceKind};

/// Maps a rusqlite error to a DataSourceError.
///
/// - `CannotOpen`, `NotADatabase` → `DataSourceError::Unavailable`
/// - `QueryReturnedNoRows` → `DataSourceError::NotFound` (when an id is known)
/// - Column conversion failures → `DataSourceError::Serialization`
/// - All other errors → `DataSourceError::QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, id: Option<&str>) -> DataSourceError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if matches!(
                sqlite_err.code,
                rusqlite::ErrorCode::CannotOpen | rusqlite::ErrorCode::NotADatabase
            ) =>
        {
            DataSourceError::Unavailable(SourceKind::Local)
        }

        rusqlite::Error::QueryReturnedNoRows => match id {
            Some(id) => DataSourceError::NotFound { id: id.to_string() },
            None => DataSourceError::QueryFailed(err.to_string()),
        },

        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => {
            DataSourceError::Serialization(err.to_string())
        }

        _ => DataSourceError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a DataSourceError.
///
/// This is the main entry point for error mapping in async code.
pub fn map_tokio_rusqlite_error(err: tokio_rusqlite::Error) -> DataSourceError {
    map_error(err, None)
}

/// Maps a tokio_rusqlite error for an operation on a known task id.
pub fn map_tokio_rusqlite_error_with_id(err: tokio_rusqlite::Error, id: &str) -> DataSourceError {
    map_error(err, Some(id))
}

fn map_error(err: tokio_rusqlite::Error, id: Option<&str>) -> DataSourceError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => map_rusqlite_error(rusqlite_err, id),
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            DataSourceError::Unavailable(SourceKind::Local)
        }
        _ => DataSourceError::QueryFailed(err.to_string()),
    }
}
