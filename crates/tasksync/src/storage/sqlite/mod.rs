//! SQLite storage backend for the local data source.
//!
//! Uses `rusqlite` for synchronous operations and `tokio-rusqlite` to run
//! them on a dedicated thread without blocking the async runtime.

mod conversions;
mod error;
mod schema;
mod source;

pub use source::SqliteDataSource;
