//! Task record and partial updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Creation time in milliseconds since the epoch, as a decimal string.
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pomodoros_completed: u32,
}

impl Task {
    /// A fresh, incomplete task.
    pub fn new(id: String, text: String, created_at: DateTime<Utc>) -> Self {
        Task {
            id,
            text,
            completed: false,
            created_at,
            completed_at: None,
            pomodoros_completed: 0,
        }
    }
}

/// Fields that may be merged into an existing task. `None` leaves a field as is.
///
/// `completed_at` is doubly optional so a patch can clear it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub pomodoros_completed: Option<u32>,
}

impl TaskPatch {
    /// Patch that only replaces the text.
    pub fn text(text: impl Into<String>) -> Self {
        TaskPatch {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Merge into `task`, returning true if anything changed.
    pub fn apply_to(&self, task: &mut Task) -> bool {
        let before = task.clone();
        if let Some(text) = &self.text {
            task.text = text.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = completed_at;
        }
        if let Some(count) = self.pomodoros_completed {
            task.pomodoros_completed = count;
        }
        *task != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Task {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        Task::new("1772355600000".to_string(), "Write report".to_string(), at)
    }

    #[test]
    fn json_uses_camel_case_and_null_completion() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["text"], "Write report");
        assert_eq!(json["completed"], false);
        assert_eq!(json["pomodorosCompleted"], 0);
        assert!(json["completedAt"].is_null());
        assert!(json["createdAt"].as_str().unwrap().starts_with("2026-03-01T09:00:00"));
    }

    #[test]
    fn patch_can_clear_completion_time() {
        let mut task = sample();
        task.completed = true;
        task.completed_at = Some(task.created_at);
        let patch = TaskPatch {
            completed: Some(false),
            completed_at: Some(None),
            ..Default::default()
        };
        assert!(patch.apply_to(&mut task));
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut task = sample();
        assert!(!TaskPatch::default().apply_to(&mut task));
        assert_eq!(task, sample());
    }
}
