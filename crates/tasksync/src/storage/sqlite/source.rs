//! SQLite data source implementation.

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use tasksync_core::storage::{DataSourceError, Result, SourceKind, TaskDataSource};
use tasksync_core::task::Task;

use super::conversions::row_to_task;
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-backed local task store.
pub struct SqliteDataSource {
    conn: Connection,
}

impl SqliteDataSource {
    /// Opens (or creates) a file-based database.
    ///
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|_| DataSourceError::Unavailable(SourceKind::Local))?;

        Self::init_schema(&conn).await?;

        tracing::debug!(path, "Opened SQLite task store");
        Ok(Self { conn })
    }

    /// Creates a data source with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|_| DataSourceError::Unavailable(SourceKind::Local))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(map_tokio_rusqlite_error)
    }

    async fn set_completed(&self, id: &str, completed: bool) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_TASK_COMPLETED,
                        rusqlite::params![id_str, completed],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id))
    }

    async fn execute(&self, sql: &'static str) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(sql, []).map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}

#[async_trait]
impl TaskDataSource for SqliteDataSource {
    async fn get_tasks(&self) -> Result<Vec<Task>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_TASKS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_task).map_err(wrap_err)?;

                let mut tasks = Vec::new();
                for row_result in rows {
                    tasks.push(row_result.map_err(wrap_err)?);
                }
                Ok(tasks)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_TASK_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_task) {
                    Ok(task) => Ok(Some(task)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id))
    }

    async fn save_task(&self, task: &Task) -> Result<()> {
        let id = task.id().to_string();
        let title = task.title().to_string();
        let description = task.description().to_string();
        let completed = task.is_completed();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_TASK,
                    rusqlite::params![id, title, description, completed],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, task.id()))
    }

    async fn complete_task_by_id(&self, id: &str) -> Result<()> {
        self.set_completed(id, true).await
    }

    async fn activate_task_by_id(&self, id: &str) -> Result<()> {
        self.set_completed(id, false).await
    }

    async fn clear_completed_tasks(&self) -> Result<()> {
        self.execute(schema::DELETE_COMPLETED_TASKS).await
    }

    async fn delete_all_tasks(&self) -> Result<()> {
        self.execute(schema::DELETE_ALL_TASKS).await
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(schema::DELETE_TASK, [&id_str])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id))
    }

    /// Clears the table and inserts `tasks` inside one transaction, so the
    /// store never holds a half-mirrored state.
    async fn replace_tasks(&self, tasks: &[Task]) -> Result<()> {
        let rows: Vec<(String, String, String, bool)> = tasks
            .iter()
            .map(|task| {
                (
                    task.id().to_string(),
                    task.title().to_string(),
                    task.description().to_string(),
                    task.is_completed(),
                )
            })
            .collect();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(schema::DELETE_ALL_TASKS, []).map_err(wrap_err)?;
                {
                    let mut stmt = tx.prepare(schema::UPSERT_TASK).map_err(wrap_err)?;
                    for (id, title, description, completed) in &rows {
                        stmt.execute(rusqlite::params![id, title, description, completed])
                            .map_err(wrap_err)?;
                    }
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str) -> Task {
        Task::new(format!("Title {id}"), format!("Description {id}")).with_id(id)
    }

    async fn source() -> SqliteDataSource {
        SqliteDataSource::new_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_save_and_get_task() {
        let source = source().await;
        let task = task("1");

        source.save_task(&task).await.unwrap();

        assert_eq!(source.get_task("1").await.unwrap(), Some(task));
    }

    #[tokio::test]
    async fn test_get_missing_task_is_none() {
        let source = source().await;

        assert_eq!(source.get_task("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_task() {
        let source = source().await;
        source.save_task(&task("1")).await.unwrap();
        let updated = Task::new("Updated", "").with_id("1").with_completed(true);

        source.save_task(&updated).await.unwrap();

        assert_eq!(source.get_tasks().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn test_get_tasks_sorted_by_id() {
        let source = source().await;
        source.save_task(&task("b")).await.unwrap();
        source.save_task(&task("a")).await.unwrap();

        let ids: Vec<String> = source
            .get_tasks()
            .await
            .unwrap()
            .iter()
            .map(|t| t.id().to_string())
            .collect();

        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_complete_and_activate_by_id() {
        let source = source().await;
        source.save_task(&task("1")).await.unwrap();

        source.complete_task_by_id("1").await.unwrap();
        assert!(source.get_task("1").await.unwrap().unwrap().is_completed());

        source.activate_task_by_id("1").await.unwrap();
        assert!(source.get_task("1").await.unwrap().unwrap().is_active());
    }

    #[tokio::test]
    async fn test_complete_missing_task_is_not_found() {
        let source = source().await;

        let result = source.complete_task_by_id("missing").await;

        assert_eq!(
            result,
            Err(DataSourceError::NotFound {
                id: "missing".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_clear_completed_tasks() {
        let source = source().await;
        source
            .save_task(&task("1").with_completed(true))
            .await
            .unwrap();
        source.save_task(&task("2")).await.unwrap();

        source.clear_completed_tasks().await.unwrap();

        assert_eq!(source.get_tasks().await.unwrap(), vec![task("2")]);
    }

    #[tokio::test]
    async fn test_delete_task_and_delete_all() {
        let source = source().await;
        source.save_task(&task("1")).await.unwrap();
        source.save_task(&task("2")).await.unwrap();

        source.delete_task("1").await.unwrap();
        source.delete_task("1").await.unwrap();
        assert_eq!(source.get_tasks().await.unwrap(), vec![task("2")]);

        source.delete_all_tasks().await.unwrap();
        assert!(source.get_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_tasks_mirrors_input() {
        let source = source().await;
        source.save_task(&task("stale")).await.unwrap();

        source.replace_tasks(&[task("1"), task("2")]).await.unwrap();

        assert_eq!(source.get_tasks().await.unwrap(), vec![task("1"), task("2")]);
    }

    #[tokio::test]
    async fn test_file_database_persists_across_connections() {
        let path = std::env::temp_dir().join(format!("tasksync-test-{}.db", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        {
            let source = SqliteDataSource::new(&path_str).await.unwrap();
            source.save_task(&task("1")).await.unwrap();
        }

        let reopened = SqliteDataSource::new(&path_str).await.unwrap();
        assert_eq!(reopened.get_tasks().await.unwrap(), vec![task("1")]);

        let _ = std::fs::remove_file(&path);
    }
}
