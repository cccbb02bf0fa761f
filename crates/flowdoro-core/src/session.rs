//! Focus/break session state machine.
//!
//! The machine does not own a clock. An external scheduler calls `tick()`
//! once per second while [`SessionStateMachine::countdown`] is `Some`.
//!
//! ## State Transitions
//!
//! ```text
//!            start                 tick to zero
//! Idle ──────────────> Running ───────────────────> Idle (other mode)
//!   ^                   |   ^
//!   |       reset       |   | start
//!   +------------------ |   |
//!                 pause v   |
//!                      Paused
//! ```
//!
//! `toggle_break()` switches mode from any state and always lands in
//! Running with a fresh countdown.

use serde::{Deserialize, Serialize};

use crate::events::{BonusSource, Event};
use crate::score::ScoreTracker;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Focus,
    Break,
}

impl Mode {
    pub fn other(self) -> Self {
        match self {
            Mode::Focus => Mode::Break,
            Mode::Break => Mode::Focus,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Not counting down and no progress since the last reset or completion.
    Idle,
    Running,
    /// Stopped mid-countdown.
    Paused,
}

/// Identifies one armed countdown. A new id is issued each time a
/// countdown is (re)started, so schedulers can tell a restart apart from a
/// continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountdownId(u64);

/// When the flow streak gets re-armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRearm {
    /// Only when a task is added to an empty queue.
    #[default]
    OnFirstTask,
    /// Also at the start of every focus or break session.
    EachSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub flow_rearm: FlowRearm,
    /// Saving settings resets the countdown even mid-session. When false,
    /// only an idle session picks up the new duration.
    pub reset_countdown_on_save: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            flow_rearm: FlowRearm::default(),
            reset_countdown_on_save: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    settings: Settings,
    flow_rearm: FlowRearm,
    mode: Mode,
    time_left: u32,
    run_state: RunState,
    flow_streak_intact: bool,
    countdown: Option<CountdownId>,
    issued: u64,
}

impl SessionStateMachine {
    /// Start in Focus, idle, with a full focus countdown.
    pub fn new(settings: Settings, flow_rearm: FlowRearm) -> Self {
        Self {
            settings,
            flow_rearm,
            mode: Mode::Focus,
            time_left: settings.focus_secs(),
            run_state: RunState::Idle,
            flow_streak_intact: true,
            countdown: None,
            issued: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn flow_streak_intact(&self) -> bool {
        self.flow_streak_intact
    }

    /// The active countdown, if any.
    pub fn countdown(&self) -> Option<CountdownId> {
        self.countdown
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Configured length of `mode` in seconds.
    pub fn duration_of(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Focus => self.settings.focus_secs(),
            Mode::Break => self.settings.break_secs(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down. Does nothing if already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        let countdown = self.arm();
        self.run_state = RunState::Running;
        tracing::debug!(mode = ?self.mode, time_left = self.time_left, "timer started");
        Some(Event::TimerStarted {
            mode: self.mode,
            time_left_secs: self.time_left,
            countdown,
        })
    }

    /// Stop counting down. Pausing a focus session breaks the flow streak
    /// and costs the pause penalty.
    pub fn pause(&mut self, scores: &mut ScoreTracker) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.cancel();
        self.run_state = RunState::Paused;

        let penalty = match self.mode {
            Mode::Focus => {
                self.flow_streak_intact = false;
                scores.apply_pause_penalty()
            }
            Mode::Break => 0,
        };
        tracing::debug!(mode = ?self.mode, penalty, "timer paused");
        Some(Event::TimerPaused {
            mode: self.mode,
            time_left_secs: self.time_left,
            penalty,
        })
    }

    /// Pause when running, start otherwise.
    pub fn toggle_timer(&mut self, scores: &mut ScoreTracker) -> Option<Event> {
        if self.is_running() {
            self.pause(scores)
        } else {
            self.start()
        }
    }

    /// Stop and refill the current mode's countdown. Score and streak are
    /// left alone.
    pub fn reset(&mut self) -> Event {
        self.cancel();
        self.run_state = RunState::Idle;
        self.time_left = self.duration_of(self.mode);
        Event::TimerReset {
            mode: self.mode,
            time_left_secs: self.time_left,
        }
    }

    /// Advance one second. Ticks that arrive while not running are stale
    /// and ignored.
    pub fn tick(&mut self, scores: &mut ScoreTracker) -> Vec<Event> {
        if !self.is_running() {
            return Vec::new();
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            return self.complete_session(scores);
        }
        Vec::new()
    }

    /// Finish the current session and flip to the other mode, idle.
    ///
    /// A focus session that finishes with the streak intact earns the flow
    /// bonus.
    pub fn complete_session(&mut self, scores: &mut ScoreTracker) -> Vec<Event> {
        self.cancel();
        self.run_state = RunState::Idle;

        let finished = self.mode;
        let mut events = Vec::new();
        if finished == Mode::Focus && self.flow_streak_intact {
            events.push(scores.record_flow_bonus(BonusSource::SessionComplete));
        }
        self.switch_mode();
        tracing::debug!(?finished, next = ?self.mode, "session completed");
        events.push(Event::SessionCompleted {
            finished,
            next: self.mode,
            time_left_secs: self.time_left,
        });
        events
    }

    /// Jump straight to the other mode and start it, cancelling any
    /// running countdown first. Always leaves the machine running.
    pub fn toggle_break(&mut self) -> Event {
        self.cancel();
        self.switch_mode();
        let countdown = self.arm();
        self.run_state = RunState::Running;
        Event::BreakToggled {
            mode: self.mode,
            time_left_secs: self.time_left,
            countdown,
        }
    }

    pub fn rearm_flow_streak(&mut self) {
        self.flow_streak_intact = true;
    }

    /// Adopt new durations. With `reset_countdown` the current countdown is
    /// refilled even mid-session; otherwise only an idle session is.
    pub fn apply_settings(&mut self, settings: Settings, reset_countdown: bool) {
        self.settings = settings;
        if reset_countdown || self.run_state == RunState::Idle {
            self.time_left = self.duration_of(self.mode);
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn switch_mode(&mut self) {
        self.mode = self.mode.other();
        self.time_left = self.duration_of(self.mode);
        if self.flow_rearm == FlowRearm::EachSession {
            self.flow_streak_intact = true;
        }
    }

    fn arm(&mut self) -> CountdownId {
        debug_assert!(self.countdown.is_none(), "countdown already armed");
        self.issued += 1;
        let id = CountdownId(self.issued);
        self.countdown = Some(id);
        id
    }

    fn cancel(&mut self) {
        self.countdown = None;
    }
}
