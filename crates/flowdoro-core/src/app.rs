//! The application state holder.
//!
//! [`Pomodoro`] is built once at startup and owns every component. Front
//! ends hold it by value and call its operations; each operation mutates
//! state, forwards notifications to the sink and returns the events it
//! produced. Rendering happens afterwards from [`Pomodoro::view`].

use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::error::ValidationError;
use crate::events::Event;
use crate::notify::{LogSink, Notification, NotificationSink};
use crate::score::{ScoreTracker, ScoringRules};
use crate::session::{SessionPolicy, SessionStateMachine};
use crate::settings::{Settings, SettingsManager};
use crate::storage::{Config, SharedStore};
use crate::task::{Task, TaskQueue};
use crate::view::{self, TaskView, ViewModel};

pub struct PomodoroBuilder {
    store: SharedStore,
    rules: ScoringRules,
    policy: SessionPolicy,
    notifications_enabled: bool,
    notice_duration: Duration,
    notifier: Box<dyn NotificationSink>,
    clock: Box<dyn Clock>,
}

impl PomodoroBuilder {
    /// Take scoring rules, policies and notification settings from `config`.
    pub fn config(mut self, config: &Config) -> Self {
        self.rules = config.scoring_rules();
        self.policy = config.session_policy();
        self.notifications_enabled = config.notifications.enabled;
        self.notice_duration = config.notification_duration();
        self
    }

    pub fn rules(mut self, rules: ScoringRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn policy(mut self, policy: SessionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn notifier(mut self, notifier: impl NotificationSink + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Load persisted state and run the daily reset check.
    pub fn build(self) -> Pomodoro {
        let today = self.clock.today();
        let settings = SettingsManager::load(self.store.clone());
        let scores = ScoreTracker::load(self.store.clone(), self.rules, today);
        let tasks = TaskQueue::load(self.store.clone());
        let session = SessionStateMachine::new(settings.current(), self.policy.flow_rearm);

        let mut app = Pomodoro {
            settings,
            scores,
            tasks,
            session,
            policy: self.policy,
            notifications_enabled: self.notifications_enabled,
            notice_duration: self.notice_duration,
            notifier: self.notifier,
            clock: self.clock,
        };
        app.check_daily_reset();
        app
    }
}

pub struct Pomodoro {
    settings: SettingsManager,
    scores: ScoreTracker,
    tasks: TaskQueue,
    session: SessionStateMachine,
    policy: SessionPolicy,
    notifications_enabled: bool,
    notice_duration: Duration,
    notifier: Box<dyn NotificationSink>,
    clock: Box<dyn Clock>,
}

impl Pomodoro {
    pub fn builder(store: SharedStore) -> PomodoroBuilder {
        PomodoroBuilder {
            store,
            rules: ScoringRules::default(),
            policy: SessionPolicy::default(),
            notifications_enabled: true,
            notice_duration: Duration::from_secs(3),
            notifier: Box::new(LogSink),
            clock: Box::new(SystemClock),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> &SessionStateMachine {
        &self.session
    }

    pub fn scores(&self) -> &ScoreTracker {
        &self.scores
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    pub fn settings(&self) -> Settings {
        self.settings.current()
    }

    pub fn view(&self) -> ViewModel {
        let state = self.scores.state();
        ViewModel {
            mode: self.session.mode(),
            run_state: self.session.run_state(),
            timer_text: view::format_clock(self.session.time_left()),
            status: view::status_label(self.session.mode()),
            start_label: view::start_label(self.session.run_state()),
            break_label: view::break_label(self.session.mode()),
            current_task: self.tasks.current_task().map(TaskView::from),
            queued_tasks: self
                .tasks
                .queued_tasks()
                .into_iter()
                .map(TaskView::from)
                .collect(),
            score_text: format!("{} / {}", state.focus_score, state.best_score),
            focus_score: state.focus_score,
            best_score: state.best_score,
            tasks_complete: state.tasks_complete,
            flow_streak_intact: self.session.flow_streak_intact(),
        }
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        let events = self.session.start().into_iter().collect();
        self.dispatch(events)
    }

    pub fn pause(&mut self) -> Vec<Event> {
        let events = self.session.pause(&mut self.scores).into_iter().collect();
        self.dispatch(events)
    }

    pub fn toggle_timer(&mut self) -> Vec<Event> {
        let events = self
            .session
            .toggle_timer(&mut self.scores)
            .into_iter()
            .collect();
        self.dispatch(events)
    }

    pub fn reset(&mut self) -> Vec<Event> {
        let event = self.session.reset();
        self.dispatch(vec![event])
    }

    pub fn tick(&mut self) -> Vec<Event> {
        let events = self.session.tick(&mut self.scores);
        self.dispatch(events)
    }

    pub fn complete_session(&mut self) -> Vec<Event> {
        let events = self.session.complete_session(&mut self.scores);
        self.dispatch(events)
    }

    pub fn toggle_break(&mut self) -> Vec<Event> {
        let event = self.session.toggle_break();
        self.dispatch(vec![event])
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Queue a new task. Adding to an empty queue re-arms the flow streak.
    pub fn add_task(&mut self, name: &str) -> Result<Task, ValidationError> {
        let had_current = self.tasks.current_task().is_some();
        let task = match self.tasks.add_at(name, self.clock.now_ms()) {
            Ok(task) => task,
            Err(e) => return Err(self.reject(e)),
        };
        if !had_current {
            self.session.rearm_flow_streak();
        }
        self.dispatch(vec![Event::TaskAdded {
            id: task.id,
            name: task.name.clone(),
        }]);
        Ok(task)
    }

    pub fn complete_task(&mut self, id: i64) -> Vec<Event> {
        let intact = self.session.flow_streak_intact();
        let events = self.tasks.complete(id, intact, &mut self.scores);
        self.dispatch(events)
    }

    /// Complete whatever task is current, if any.
    pub fn complete_current_task(&mut self) -> Vec<Event> {
        match self.tasks.current_task().map(|t| t.id) {
            Some(id) => self.complete_task(id),
            None => Vec::new(),
        }
    }

    pub fn rename_task(&mut self, id: i64, new_name: &str) -> Vec<Event> {
        let events = self.tasks.rename(id, new_name).into_iter().collect();
        self.dispatch(events)
    }

    pub fn delete_task(&mut self, id: i64) -> Vec<Event> {
        let event = self.tasks.delete(id);
        self.dispatch(vec![event])
    }

    // ── Settings & scoring ───────────────────────────────────────────

    /// Validate and store new durations, then resize the countdown
    /// according to [`SessionPolicy::reset_countdown_on_save`].
    pub fn save_settings(
        &mut self,
        focus_duration: i64,
        break_duration: i64,
    ) -> Result<Settings, ValidationError> {
        let settings = match self.settings.save(focus_duration, break_duration) {
            Ok(settings) => settings,
            Err(e) => return Err(self.reject(e)),
        };
        self.session
            .apply_settings(settings, self.policy.reset_countdown_on_save);
        self.dispatch(vec![Event::SettingsSaved { settings }]);
        Ok(settings)
    }

    pub fn check_daily_reset(&mut self) -> Option<Event> {
        let event = self.scores.check_daily_reset(self.clock.today())?;
        self.dispatch(vec![event]).pop()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn dispatch(&mut self, events: Vec<Event>) -> Vec<Event> {
        for event in &events {
            if let Some(message) = event.message() {
                self.send(message);
            }
        }
        events
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        tracing::debug!(error = ?err, "rejected input");
        self.send(err.to_string());
        err
    }

    fn send(&mut self, message: String) {
        if !self.notifications_enabled {
            return;
        }
        self.notifier.notify(Notification {
            message,
            duration: self.notice_duration,
        });
    }
}
