use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority. This is the default for new tasks.
    Medium,
    /// High priority.
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewTask {
    /// The title of the task. Required, non-empty.
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    /// An optional description; defaults to an empty string when absent.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// The priority of the task; defaults to medium when absent.
    pub priority: Option<TaskPriority>,
}

/// Partial-update payload for a task.
///
/// Every field is optional: a field present in the request overwrites the
/// stored value, an absent field is preserved unchanged. An empty body is
/// valid and only advances `updated_at`.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub priority: Option<TaskPriority>,

    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
    }
}

/// A task entity as stored and as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier, assigned sequentially by the store.
    pub id: i64,
    /// The owning user. `None` in the open profile, where the task is
    /// globally visible.
    pub owner_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Builds a fresh task from creation input, applying the documented
    /// defaults. The id is a placeholder until the store assigns one.
    pub fn new(input: NewTask, owner_id: Option<i64>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            owner_id,
            title: input.title,
            description: input.description.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update in place and stamps `updated_at`.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.updated_at = Utc::now();
    }
}

/// Derived per-owner counters, recomputed on every call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub high_priority: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_defaults() {
        let input = NewTask {
            title: "buy milk".to_string(),
            description: None,
            priority: None,
        };

        let task = Task::new(input, Some(1));
        assert_eq!(task.title, "buy milk");
        assert_eq!(task.description, "");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(!task.completed);
        assert_eq!(task.owner_id, Some(1));
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_new_task_validation() {
        let valid = NewTask {
            title: "Valid Task".to_string(),
            description: Some("Valid Description".to_string()),
            priority: Some(TaskPriority::High),
        };
        assert!(valid.validate().is_ok());

        let empty_title = NewTask {
            title: "".to_string(),
            description: None,
            priority: None,
        };
        assert!(empty_title.validate().is_err());

        let long_title = NewTask {
            title: "a".repeat(201),
            description: None,
            priority: None,
        };
        assert!(long_title.validate().is_err());
    }

    #[test]
    fn test_patch_overwrites_supplied_fields_only() {
        let mut task = Task::new(
            NewTask {
                title: "original".to_string(),
                description: Some("desc".to_string()),
                priority: Some(TaskPriority::Low),
            },
            None,
        );
        let before = task.updated_at;

        task.apply(TaskPatch {
            completed: Some(true),
            ..TaskPatch::default()
        });

        assert_eq!(task.title, "original");
        assert_eq!(task.description, "desc");
        assert_eq!(task.priority, TaskPriority::Low);
        assert!(task.completed);
        assert!(task.updated_at >= before);
    }

    #[test]
    fn test_empty_patch_only_advances_updated_at() {
        let mut task = Task::new(
            NewTask {
                title: "untouched".to_string(),
                description: None,
                priority: None,
            },
            Some(7),
        );
        let patch = TaskPatch::default();
        assert!(patch.is_empty());

        task.apply(patch);
        assert_eq!(task.title, "untouched");
        assert!(!task.completed);
    }

    #[test]
    fn test_patch_validation() {
        let ok = TaskPatch {
            title: Some("renamed".to_string()),
            ..TaskPatch::default()
        };
        assert!(ok.validate().is_ok());

        let empty_title = TaskPatch {
            title: Some("".to_string()),
            ..TaskPatch::default()
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_priority_serialization() {
        assert_eq!(
            serde_json::to_string(&TaskPriority::High).unwrap(),
            "\"high\""
        );
        let parsed: TaskPriority = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, TaskPriority::Medium);
    }
}
