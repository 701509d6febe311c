mod error;
mod traits;

pub use error::{DataSourceError, RepositoryError, RepositoryResult, Result, SourceKind};
pub use traits::TaskDataSource;
