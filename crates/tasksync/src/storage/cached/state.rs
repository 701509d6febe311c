//! Cache state held by the repository.
//!
//! Plain synchronous data: the repository applies each mutation inside a
//! single write-lock section, after all data source I/O for the call is done.

use std::collections::HashMap;

use tasksync_core::task::Task;

/// In-memory task cache plus its staleness flag.
///
/// `tasks == None` means the cache has never been loaded. `dirty` starts
/// true and is cleared only by a successful remote load.
#[derive(Debug)]
pub(super) struct CacheState {
    tasks: Option<HashMap<String, Task>>,
    dirty: bool,
}

impl Default for CacheState {
    fn default() -> Self {
        Self {
            tasks: None,
            dirty: true,
        }
    }
}

impl CacheState {
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_initialized(&self) -> bool {
        self.tasks.is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.as_ref().map_or(0, HashMap::len)
    }

    /// Returns the cached tasks if they can be served without I/O.
    pub fn fresh_snapshot(&self) -> Option<Vec<Task>> {
        if self.dirty {
            return None;
        }
        self.tasks.as_ref().map(sorted)
    }

    /// Returns the cached tasks sorted by id, empty when uninitialized.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.as_ref().map(sorted).unwrap_or_default()
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.tasks.as_ref().and_then(|tasks| tasks.get(id).cloned())
    }

    /// Replaces the cache with an authoritative remote result and marks it
    /// clean.
    pub fn replace_from_remote(&mut self, tasks: Vec<Task>) -> Vec<Task> {
        self.tasks = Some(index_by_id(tasks));
        self.dirty = false;
        self.snapshot()
    }

    /// Replaces the cache with a local fallback result. The cache stays
    /// dirty so the next plain read retries the remote.
    pub fn replace_from_local(&mut self, tasks: Vec<Task>) -> Vec<Task> {
        self.tasks = Some(index_by_id(tasks));
        self.dirty = true;
        self.snapshot()
    }

    /// Inserts or overwrites a task, initializing the map if needed.
    pub fn upsert(&mut self, task: Task) {
        self.tasks
            .get_or_insert_with(HashMap::new)
            .insert(task.id().to_string(), task);
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        self.tasks.as_mut().and_then(|tasks| tasks.remove(id))
    }

    /// Drops completed tasks, returning how many were removed.
    pub fn remove_completed(&mut self) -> usize {
        match self.tasks.as_mut() {
            Some(tasks) => {
                let before = tasks.len();
                tasks.retain(|_, task| task.is_active());
                before - tasks.len()
            }
            None => 0,
        }
    }

    /// Empties the cache without touching the dirty flag.
    pub fn clear(&mut self) {
        self.tasks = Some(HashMap::new());
    }

    pub fn invalidate(&mut self) {
        self.dirty = true;
    }
}

fn index_by_id(tasks: Vec<Task>) -> HashMap<String, Task> {
    tasks
        .into_iter()
        .map(|task| (task.id().to_string(), task))
        .collect()
}

fn sorted(tasks: &HashMap<String, Task>) -> Vec<Task> {
    let mut tasks: Vec<Task> = tasks.values().cloned().collect();
    tasks.sort_by(|a, b| a.id().cmp(b.id()));
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str) -> Task {
        Task::new(format!("Title {id}"), "").with_id(id)
    }

    #[test]
    fn test_starts_uninitialized_and_dirty() {
        let state = CacheState::default();

        assert!(!state.is_initialized());
        assert!(state.is_dirty());
        assert!(state.fresh_snapshot().is_none());
        assert!(state.snapshot().is_empty());
    }

    #[test]
    fn test_remote_load_marks_clean() {
        let mut state = CacheState::default();

        let snapshot = state.replace_from_remote(vec![task("b"), task("a")]);

        assert!(!state.is_dirty());
        assert_eq!(snapshot, vec![task("a"), task("b")]);
        assert_eq!(state.fresh_snapshot(), Some(snapshot));
    }

    #[test]
    fn test_local_load_stays_dirty() {
        let mut state = CacheState::default();

        let snapshot = state.replace_from_local(vec![task("a")]);

        assert!(state.is_dirty());
        assert!(state.is_initialized());
        assert_eq!(snapshot, vec![task("a")]);
        assert!(state.fresh_snapshot().is_none());
    }

    #[test]
    fn test_local_load_after_clean_marks_dirty() {
        let mut state = CacheState::default();
        state.replace_from_remote(vec![task("a")]);

        state.replace_from_local(vec![task("b")]);

        assert!(state.is_dirty());
    }

    #[test]
    fn test_upsert_initializes_without_cleaning() {
        let mut state = CacheState::default();

        state.upsert(task("a"));

        assert!(state.is_initialized());
        assert!(state.is_dirty());
        assert_eq!(state.get("a"), Some(task("a")));
    }

    #[test]
    fn test_upsert_overwrites() {
        let mut state = CacheState::default();
        state.replace_from_remote(vec![task("a")]);

        state.upsert(task("a").with_completed(true));

        assert!(state.get("a").unwrap().is_completed());
        assert_eq!(state.len(), 1);
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_remove_completed() {
        let mut state = CacheState::default();
        state.replace_from_remote(vec![task("a").with_completed(true), task("b")]);

        let removed = state.remove_completed();

        assert_eq!(removed, 1);
        assert_eq!(state.snapshot(), vec![task("b")]);
    }

    #[test]
    fn test_remove_on_uninitialized_is_noop() {
        let mut state = CacheState::default();

        assert_eq!(state.remove("a"), None);
        assert_eq!(state.remove_completed(), 0);
        assert!(!state.is_initialized());
    }

    #[test]
    fn test_clear_keeps_dirty_flag() {
        let mut state = CacheState::default();
        state.replace_from_remote(vec![task("a")]);

        state.clear();

        assert!(!state.is_dirty());
        assert_eq!(state.fresh_snapshot(), Some(vec![]));
    }

    #[test]
    fn test_invalidate() {
        let mut state = CacheState::default();
        state.replace_from_remote(vec![task("a")]);

        state.invalidate();

        assert!(state.is_dirty());
        assert_eq!(state.snapshot(), vec![task("a")]);
    }
}
