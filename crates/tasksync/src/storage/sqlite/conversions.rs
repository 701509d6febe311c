//! SQLite row conversion functions.

use rusqlite::Row;

use tasksync_core::task::Task;

/// Convert a SQLite row to a Task.
///
/// Expected columns: entryid, title, description, completed
pub fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let id: String = row.get(0)?;
    let title: String = row.get(1)?;
    let description: String = row.get(2)?;
    let completed: bool = row.get(3)?;

    Ok(Task::new(title, description)
        .with_id(id)
        .with_completed(completed))
}
