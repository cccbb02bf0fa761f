//! The task queue.
//!
//! Tasks are kept in insertion order. The earliest incomplete task is the
//! current task; the remaining incomplete tasks form the queue behind it.
//! Completed tasks stay in the list (and in storage) but are never shown.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::{BonusSource, Event};
use crate::score::ScoreTracker;
use crate::storage::{self, keys, SharedStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique and never reused; derived from the creation time.
    pub id: i64,
    pub name: String,
    pub completed: bool,
    /// Creation time, ms since epoch.
    pub timestamp: i64,
}

pub struct TaskQueue {
    store: SharedStore,
    tasks: Vec<Task>,
}

impl TaskQueue {
    pub fn load(store: SharedStore) -> Self {
        let tasks = storage::read_json(store.as_ref(), keys::TASKS).unwrap_or_default();
        Self { store, tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// The earliest incomplete task.
    pub fn current_task(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| !t.completed)
    }

    /// Incomplete tasks behind the current one, in insertion order.
    pub fn queued_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.completed).skip(1).collect()
    }

    /// Append a task created now.
    pub fn add(&mut self, name: &str) -> Result<Task, ValidationError> {
        self.add_at(name, Utc::now().timestamp_millis())
    }

    /// Append a task created at `now_ms`.
    ///
    /// The id is `now_ms` unless an existing id is already at or past it,
    /// in which case it is one past the largest id.
    pub fn add_at(&mut self, name: &str, now_ms: i64) -> Result<Task, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyTaskName);
        }
        let id = match self.tasks.iter().map(|t| t.id).max() {
            Some(max) if max >= now_ms => max + 1,
            _ => now_ms,
        };
        let task = Task {
            id,
            name: name.to_string(),
            completed: false,
            timestamp: now_ms,
        };
        self.tasks.push(task.clone());
        self.persist();
        tracing::debug!(id, name, "task added");
        Ok(task)
    }

    /// Mark a task done and score it.
    ///
    /// Unknown or already completed ids are ignored. With an intact flow
    /// streak the task also earns the flow bonus.
    pub fn complete(
        &mut self,
        id: i64,
        flow_streak_intact: bool,
        scores: &mut ScoreTracker,
    ) -> Vec<Event> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id && !t.completed) else {
            return Vec::new();
        };
        task.completed = true;
        let name = task.name.clone();
        self.persist();

        let points = scores.record_task_complete();
        let mut events = vec![Event::TaskCompleted { id, name, points }];
        if flow_streak_intact {
            events.push(scores.record_flow_bonus(BonusSource::TaskComplete));
        }
        events
    }

    /// Rename a task. Blank, unchanged, or unknown targets are ignored.
    pub fn rename(&mut self, id: i64, new_name: &str) -> Option<Event> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return None;
        }
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        if task.name == new_name {
            return None;
        }
        task.name = new_name.to_string();
        self.persist();
        Some(Event::TaskRenamed {
            id,
            name: new_name.to_string(),
        })
    }

    /// Remove a task whether or not it exists.
    pub fn delete(&mut self, id: i64) -> Event {
        self.tasks.retain(|t| t.id != id);
        self.persist();
        Event::TaskDeleted { id }
    }

    fn persist(&self) {
        match serde_json::to_string(&self.tasks) {
            Ok(json) => storage::write(self.store.as_ref(), keys::TASKS, &json),
            Err(e) => tracing::warn!(error = %e, "could not encode task list"),
        }
    }
}
