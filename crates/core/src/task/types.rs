use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do item.
///
/// Equality is structural over every field, so two tasks with the same id but
/// a different completion state are not equal. The id is assigned once, at
/// construction or deserialization, and has no setter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    #[serde(default = "generate_id")]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completed: bool,
}

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

impl Task {
    /// Creates a new active task with a freshly generated id.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            description: description.into(),
            completed: false,
        }
    }

    /// Creates a task with a specific id (useful for testing and for
    /// rehydrating rows from a store).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Returns a copy of this task with the given completion state.
    ///
    /// No other field changes.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }

    /// The text shown in a task list: the title, or the description when the
    /// title is empty.
    pub fn title_for_list(&self) -> &str {
        if self.title.is_empty() {
            &self.description
        } else {
            &self.title
        }
    }

    /// Returns true if both title and description are empty.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_active_with_generated_id() {
        let task = Task::new("Title", "Description");

        assert!(task.is_active());
        assert!(!task.is_completed());
        assert!(Uuid::parse_str(task.id()).is_ok());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Task::new("Same", "Same");
        let b = Task::new("Same", "Same");

        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn test_equality_is_structural() {
        let a = Task::new("Title", "Description").with_id("1");
        let b = Task::new("Title", "Description").with_id("1");
        let completed = b.clone().with_completed(true);

        assert_eq!(a, b);
        assert_ne!(a, completed);
    }

    #[test]
    fn test_with_completed_only_changes_completion() {
        let task = Task::new("Title", "Description").with_id("1");
        let completed = task.clone().with_completed(true);

        assert_eq!(completed.id(), task.id());
        assert_eq!(completed.title(), task.title());
        assert_eq!(completed.description(), task.description());
        assert!(completed.is_completed());
        assert_eq!(completed.with_completed(false), task);
    }

    #[test]
    fn test_title_for_list_prefers_title() {
        assert_eq!(Task::new("Title", "Description").title_for_list(), "Title");
        assert_eq!(Task::new("", "Description").title_for_list(), "Description");
    }

    #[test]
    fn test_is_empty() {
        assert!(Task::new("", "").is_empty());
        assert!(!Task::new("Title", "").is_empty());
        assert!(!Task::new("", "Description").is_empty());
    }

    #[test]
    fn test_deserialize_without_id_generates_one() {
        let task: Task = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();

        assert_eq!(task.title(), "Buy milk");
        assert_eq!(task.description(), "");
        assert!(task.is_active());
        assert!(!task.id().is_empty());
    }

    #[test]
    fn test_serialize_keeps_all_fields() {
        let task = Task::new("Title", "Description")
            .with_id("abc")
            .with_completed(true);

        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "abc",
                "title": "Title",
                "description": "Description",
                "completed": true
            })
        );
    }
}
