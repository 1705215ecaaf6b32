//! Ordered task collection and its reducer.
//!
//! Every mutation goes through [`TaskList::apply`] with a [`TaskAction`].
//! The transition is pure: it never touches storage, and it reports whether
//! the list changed so the caller can decide to persist a snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskPatch};

/// Intents accepted by the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Prepend a task; ignored when the text is blank.
    Add { text: String, now: DateTime<Utc> },
    /// Merge fields into the task with `id`.
    Update { id: String, patch: TaskPatch },
    Delete { id: String },
    /// Mark done. Already-completed tasks keep their original `completed_at`.
    Complete { id: String, now: DateTime<Utc> },
    /// Move within the active (incomplete) subset, indices in display order.
    Reorder { source: usize, destination: usize },
    IncrementPomodoro { id: String },
    /// Replace the whole list.
    Set(Vec<Task>),
}

/// The task list in display order. Persisted as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        TaskList { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by ID.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Incomplete tasks in display order.
    pub fn active(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.completed)
    }

    /// Completed tasks in display order.
    pub fn completed(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.completed)
    }

    /// Position of `id` within the active subset.
    pub fn active_index_of(&self, id: &str) -> Option<usize> {
        self.active().position(|t| t.id == id)
    }

    /// Generate an id from `now`, bumped past any existing id.
    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let candidate = millis.to_string();
            if self.get(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }

    /// Apply `action`, returning true if the list changed.
    pub fn apply(&mut self, action: TaskAction) -> bool {
        match action {
            TaskAction::Add { text, now } => {
                let text = text.trim();
                if text.is_empty() {
                    return false;
                }
                let id = self.next_id(now);
                self.tasks.insert(0, Task::new(id, text.to_string(), now));
                true
            }
            TaskAction::Update { id, patch } => match self.get_mut(&id) {
                Some(task) => patch.apply_to(task),
                None => false,
            },
            TaskAction::Delete { id } => {
                let before = self.tasks.len();
                self.tasks.retain(|t| t.id != id);
                self.tasks.len() != before
            }
            TaskAction::Complete { id, now } => match self.get_mut(&id) {
                Some(task) if !task.completed => {
                    task.completed = true;
                    task.completed_at = Some(now);
                    true
                }
                _ => false,
            },
            TaskAction::Reorder {
                source,
                destination,
            } => self.reorder_active(source, destination),
            TaskAction::IncrementPomodoro { id } => match self.get_mut(&id) {
                Some(task) => {
                    task.pomodoros_completed = task.pomodoros_completed.saturating_add(1);
                    true
                }
                None => false,
            },
            TaskAction::Set(tasks) => {
                let changed = self.tasks != tasks;
                self.tasks = tasks;
                changed
            }
        }
    }

    /// Move the active task at `source` to `destination` within the active
    /// subset. Completed tasks stay at their absolute positions.
    fn reorder_active(&mut self, source: usize, destination: usize) -> bool {
        let slots: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.completed)
            .map(|(i, _)| i)
            .collect();
        if source >= slots.len() || destination >= slots.len() || source == destination {
            return false;
        }

        let mut active: Vec<Task> = slots.iter().map(|&i| self.tasks[i].clone()).collect();
        let moved = active.remove(source);
        active.insert(destination, moved);

        for (slot, task) in slots.into_iter().zip(active) {
            self.tasks[slot] = task;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn list_of(texts: &[&str]) -> TaskList {
        let mut list = TaskList::default();
        // Add in reverse so the first text ends up first.
        for (i, text) in texts.iter().enumerate().rev() {
            list.apply(TaskAction::Add {
                text: text.to_string(),
                now: t0() + Duration::seconds(i as i64),
            });
        }
        list
    }

    fn texts(list: &TaskList) -> Vec<&str> {
        list.tasks().iter().map(|t| t.text.as_str()).collect()
    }

    fn id_at(list: &TaskList, index: usize) -> String {
        list.tasks()[index].id.clone()
    }

    #[test]
    fn add_prepends_fresh_task() {
        let mut list = list_of(&["old"]);
        assert!(list.apply(TaskAction::Add {
            text: "  new  ".to_string(),
            now: t0() + Duration::minutes(5),
        }));
        assert_eq!(list.len(), 2);
        let first = &list.tasks()[0];
        assert_eq!(first.text, "new");
        assert!(!first.completed);
        assert_eq!(first.pomodoros_completed, 0);
        assert_eq!(first.completed_at, None);
        assert_eq!(first.id, (t0() + Duration::minutes(5)).timestamp_millis().to_string());
    }

    #[test]
    fn blank_text_is_ignored() {
        let mut list = list_of(&["keep"]);
        for text in ["", "   ", "\t\n"] {
            assert!(!list.apply(TaskAction::Add {
                text: text.to_string(),
                now: t0(),
            }));
        }
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn ids_stay_unique_within_the_same_millisecond() {
        let mut list = TaskList::default();
        list.apply(TaskAction::Add { text: "a".into(), now: t0() });
        list.apply(TaskAction::Add { text: "b".into(), now: t0() });
        assert_ne!(id_at(&list, 0), id_at(&list, 1));
    }

    #[test]
    fn update_merges_and_ignores_unknown_ids() {
        let mut list = list_of(&["draft"]);
        let id = id_at(&list, 0);
        assert!(list.apply(TaskAction::Update {
            id: id.clone(),
            patch: TaskPatch::text("final"),
        }));
        assert_eq!(list.get(&id).unwrap().text, "final");

        let snapshot = list.clone();
        assert!(!list.apply(TaskAction::Update {
            id: "missing".into(),
            patch: TaskPatch::text("x"),
        }));
        assert_eq!(list, snapshot);
    }

    #[test]
    fn delete_removes_only_matching_task() {
        let mut list = list_of(&["a", "b", "c"]);
        let id = id_at(&list, 1);
        assert!(list.apply(TaskAction::Delete { id }));
        assert_eq!(texts(&list), vec!["a", "c"]);
        assert!(!list.apply(TaskAction::Delete { id: "missing".into() }));
    }

    #[test]
    fn complete_sets_timestamp_once() {
        let mut list = list_of(&["a"]);
        let id = id_at(&list, 0);
        let first = t0() + Duration::hours(1);
        assert!(list.apply(TaskAction::Complete { id: id.clone(), now: first }));
        let task = list.get(&id).unwrap();
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(first));

        assert!(!list.apply(TaskAction::Complete {
            id: id.clone(),
            now: first + Duration::hours(1),
        }));
        assert_eq!(list.get(&id).unwrap().completed_at, Some(first));
    }

    #[test]
    fn increment_pomodoro_counts_up() {
        let mut list = list_of(&["a"]);
        let id = id_at(&list, 0);
        list.apply(TaskAction::IncrementPomodoro { id: id.clone() });
        list.apply(TaskAction::IncrementPomodoro { id: id.clone() });
        assert_eq!(list.get(&id).unwrap().pomodoros_completed, 2);
        assert!(!list.apply(TaskAction::IncrementPomodoro { id: "missing".into() }));
    }

    #[test]
    fn reorder_uses_active_indices() {
        let mut list = list_of(&["a", "done", "b", "c"]);
        let done = id_at(&list, 1);
        list.apply(TaskAction::Complete { id: done, now: t0() });

        // Active order is a, b, c. Move c to the front.
        assert!(list.apply(TaskAction::Reorder { source: 2, destination: 0 }));
        assert_eq!(texts(&list), vec!["c", "done", "a", "b"]);
        let active: Vec<&str> = list.active().map(|t| t.text.as_str()).collect();
        assert_eq!(active, vec!["c", "a", "b"]);
    }

    #[test]
    fn reorder_out_of_range_is_noop() {
        let mut list = list_of(&["a", "b"]);
        let snapshot = list.clone();
        assert!(!list.apply(TaskAction::Reorder { source: 5, destination: 0 }));
        assert!(!list.apply(TaskAction::Reorder { source: 0, destination: 2 }));
        assert!(!list.apply(TaskAction::Reorder { source: 1, destination: 1 }));
        assert_eq!(list, snapshot);
    }

    #[test]
    fn set_replaces_the_whole_list() {
        let mut list = list_of(&["a", "b"]);
        let replacement = list_of(&["x", "y", "z"]).tasks().to_vec();
        assert!(list.apply(TaskAction::Set(replacement.clone())));
        assert_eq!(texts(&list), vec!["x", "y", "z"]);
        assert!(!list.apply(TaskAction::Set(replacement)));

        assert!(list.apply(TaskAction::Set(Vec::new())));
        assert!(list.is_empty());
    }

    #[test]
    fn serialises_as_plain_array() {
        let list = list_of(&["a"]);
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.is_array());
        let back: TaskList = serde_json::from_value(json).unwrap();
        assert_eq!(back, list);
    }

    proptest! {
        #[test]
        fn reorder_is_a_permutation(
            done in proptest::collection::vec(any::<bool>(), 0..12),
            source in 0usize..12,
            destination in 0usize..12,
        ) {
            let names: Vec<String> = (0..done.len()).map(|i| format!("task {i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let mut list = list_of(&refs);
            for (i, is_done) in done.iter().enumerate() {
                if *is_done {
                    let id = id_at(&list, i);
                    list.apply(TaskAction::Complete { id, now: t0() });
                }
            }
            let mut before: Vec<String> = list.tasks().iter().map(|t| t.id.clone()).collect();
            let completed_slots: Vec<(usize, String)> = list
                .tasks()
                .iter()
                .enumerate()
                .filter(|(_, t)| t.completed)
                .map(|(i, t)| (i, t.id.clone()))
                .collect();

            list.apply(TaskAction::Reorder { source, destination });

            let mut after: Vec<String> = list.tasks().iter().map(|t| t.id.clone()).collect();
            prop_assert_eq!(after.len(), before.len());
            for (i, id) in completed_slots {
                prop_assert_eq!(&list.tasks()[i].id, &id);
            }
            before.sort();
            after.sort();
            prop_assert_eq!(before, after);
        }
    }
}
