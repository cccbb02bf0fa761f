use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::session::{CountdownId, Mode};
use crate::settings::Settings;

/// Where a flow bonus was earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusSource {
    /// A task was completed while the streak was intact.
    TaskComplete,
    /// A focus session ran to zero without a pause.
    SessionComplete,
}

/// Every state change in the system produces an Event.
/// Front ends turn them into notifications; the CLI also prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        time_left_secs: u32,
        countdown: CountdownId,
    },
    TimerPaused {
        mode: Mode,
        time_left_secs: u32,
        /// Penalty charged; zero during a break.
        penalty: u32,
    },
    TimerReset {
        mode: Mode,
        time_left_secs: u32,
    },
    BreakToggled {
        mode: Mode,
        time_left_secs: u32,
        countdown: CountdownId,
    },
    SessionCompleted {
        finished: Mode,
        next: Mode,
        time_left_secs: u32,
    },
    FlowBonus {
        points: u32,
        source: BonusSource,
    },
    TaskAdded {
        id: i64,
        name: String,
    },
    TaskCompleted {
        id: i64,
        name: String,
        points: u32,
    },
    TaskRenamed {
        id: i64,
        name: String,
    },
    TaskDeleted {
        id: i64,
    },
    SettingsSaved {
        settings: Settings,
    },
    DailyReset {
        previous_score: u32,
        best_score: u32,
        date: NaiveDate,
    },
}

impl Event {
    /// The notification text for this event, if it warrants one.
    pub fn message(&self) -> Option<String> {
        match self {
            Event::TimerPaused {
                mode: Mode::Focus,
                penalty,
                ..
            } => Some(format!("Timer paused! -{penalty} points")),
            Event::SessionCompleted {
                finished: Mode::Focus,
                ..
            } => Some("Pomodoro completed! Great work!".into()),
            Event::SessionCompleted {
                finished: Mode::Break,
                ..
            } => Some("Break completed! Ready to focus?".into()),
            Event::FlowBonus {
                points,
                source: BonusSource::SessionComplete,
            } => Some(format!("Flow state bonus! +{points} points")),
            Event::FlowBonus {
                points,
                source: BonusSource::TaskComplete,
            } => Some(format!("focus state bonus! +{points} points")),
            Event::TaskAdded { name, .. } => Some(format!("Task '{name}' added to queue!")),
            Event::TaskCompleted { name, .. } => Some(format!("Task \"{name}\" completed!")),
            Event::TaskRenamed { .. } => Some("Task name updated!".into()),
            Event::SettingsSaved { .. } => Some("Timer has been updated!".into()),
            Event::DailyReset { best_score, .. } => {
                Some(format!("New day started! Previous best: {best_score}"))
            }
            Event::TimerStarted { .. }
            | Event::TimerPaused { .. }
            | Event::TimerReset { .. }
            | Event::BreakToggled { .. }
            | Event::TaskDeleted { .. } => None,
        }
    }
}
