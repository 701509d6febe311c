//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create the tasks table.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    entryid TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(completed);
"#;

pub const SELECT_ALL_TASKS: &str = r#"
SELECT entryid, title, description, completed
FROM tasks
ORDER BY entryid
"#;

pub const SELECT_TASK_BY_ID: &str = r#"
SELECT entryid, title, description, completed
FROM tasks
WHERE entryid = ?1
"#;

pub const UPSERT_TASK: &str = r#"
INSERT INTO tasks (entryid, title, description, completed)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(entryid) DO UPDATE SET
    title = excluded.title,
    description = excluded.description,
    completed = excluded.completed
"#;

pub const UPDATE_TASK_COMPLETED: &str = r#"
UPDATE tasks
SET completed = ?2
WHERE entryid = ?1
"#;

pub const DELETE_COMPLETED_TASKS: &str = r#"
DELETE FROM tasks WHERE completed = 1
"#;

pub const DELETE_ALL_TASKS: &str = r#"
DELETE FROM tasks
"#;

pub const DELETE_TASK: &str = r#"
DELETE FROM tasks WHERE entryid = ?1
"#;
