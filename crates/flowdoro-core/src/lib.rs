//! # Flowdoro Core Library
//!
//! Business logic for the Flowdoro focus timer: a focus/break session
//! cycle, a task queue, and a focus score that rewards unbroken sessions.
//! Front ends (the `flowdoro` CLI) drive it by calling operations on a
//! single [`Pomodoro`] value and rendering its [`ViewModel`].
//!
//! ## Architecture
//!
//! - **Session**: a tick-driven state machine; the caller invokes `tick()`
//!   once per second while a countdown is armed
//! - **Scoring**: write-through focus/best score with a daily rollover
//! - **Tasks**: insertion-ordered queue whose head is the current task
//! - **Storage**: a string key/value store (SQLite or in-memory) plus
//!   TOML configuration
//!
//! ## Key Components
//!
//! - [`Pomodoro`]: state holder exposing every user operation
//! - [`SessionStateMachine`]: focus/break countdown and flow streak
//! - [`ScoreTracker`]: focus score, best score, completed-task count
//! - [`TaskQueue`]: task CRUD and current-task selection
//! - [`KvStore`]: persistence seam

pub mod app;
pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod score;
pub mod session;
pub mod settings;
pub mod storage;
pub mod task;
pub mod view;

pub use app::{Pomodoro, PomodoroBuilder};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::{BonusSource, Event};
pub use notify::{LogSink, Notification, NotificationSink};
pub use score::{ScoreState, ScoreTracker, ScoringRules};
pub use session::{CountdownId, FlowRearm, Mode, RunState, SessionPolicy, SessionStateMachine};
pub use settings::{Settings, SettingsManager};
pub use storage::{Config, Database, KvStore, MemoryStore, SharedStore};
pub use task::{Task, TaskQueue};
pub use view::{TaskView, ViewModel, ViewRenderer};
