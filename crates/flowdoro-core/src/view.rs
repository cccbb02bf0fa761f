//! Presentation data.
//!
//! [`ViewModel`] is everything a front end needs to draw the timer, the
//! task list and the stats. Nothing in the core renders it.

use serde::Serialize;

use crate::session::{Mode, RunState};
use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub id: i64,
    pub name: String,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub mode: Mode,
    pub run_state: RunState,
    /// Remaining time as `MM:SS`.
    pub timer_text: String,
    pub status: &'static str,
    pub start_label: &'static str,
    pub break_label: &'static str,
    pub current_task: Option<TaskView>,
    pub queued_tasks: Vec<TaskView>,
    /// `"{focus} / {best}"`
    pub score_text: String,
    pub focus_score: u32,
    pub best_score: u32,
    pub tasks_complete: u32,
    pub flow_streak_intact: bool,
}

pub trait ViewRenderer {
    fn render(&mut self, view: &ViewModel);
}

/// Zero-padded `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn status_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Focus => "Time to focus",
        Mode::Break => "Time for a break",
    }
}

pub fn start_label(run_state: RunState) -> &'static str {
    match run_state {
        RunState::Idle => "Start",
        RunState::Running => "Pause",
        RunState::Paused => "Resume",
    }
}

pub fn break_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Focus => "Take Break",
        Mode::Break => "End Break",
    }
}
