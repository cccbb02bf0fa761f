//! Focus score bookkeeping.
//!
//! The running focus score rises with completed tasks and unbroken focus
//! sessions and drops when a focus session is paused. Once per calendar
//! day the score is folded into the best score and zeroed.
//!
//! Every mutation is written through to the store before it returns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::events::{BonusSource, Event};
use crate::storage::{self, keys, SharedStore};

/// Point values used by [`ScoreTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    pub task_complete: u32,
    pub flow_bonus: u32,
    pub pause_penalty: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            task_complete: 20,
            flow_bonus: 30,
            pause_penalty: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreState {
    pub focus_score: u32,
    /// Highest `focus_score` seen at a daily boundary.
    pub best_score: u32,
    pub tasks_complete: u32,
    pub last_reset_date: NaiveDate,
}

pub struct ScoreTracker {
    store: SharedStore,
    rules: ScoringRules,
    state: ScoreState,
}

impl ScoreTracker {
    /// Load counters from the store. Missing numbers read as zero and a
    /// missing reset date reads as `today`.
    pub fn load(store: SharedStore, rules: ScoringRules, today: NaiveDate) -> Self {
        let s = store.as_ref();
        let state = ScoreState {
            focus_score: storage::read_parsed(s, keys::FOCUS_SCORE).unwrap_or(0),
            best_score: storage::read_parsed(s, keys::BEST_SCORE).unwrap_or(0),
            tasks_complete: storage::read_parsed(s, keys::TASKS_COMPLETE).unwrap_or(0),
            last_reset_date: storage::read_parsed(s, keys::LAST_RESET_DATE).unwrap_or(today),
        };
        Self {
            store,
            rules,
            state,
        }
    }

    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    pub fn focus_score(&self) -> u32 {
        self.state.focus_score
    }

    pub fn best_score(&self) -> u32 {
        self.state.best_score
    }

    pub fn tasks_complete(&self) -> u32 {
        self.state.tasks_complete
    }

    /// Roll the score over when `today` differs from the last reset date.
    ///
    /// Runs at most once per calendar day.
    pub fn check_daily_reset(&mut self, today: NaiveDate) -> Option<Event> {
        if self.state.last_reset_date == today {
            return None;
        }
        let previous_score = self.state.focus_score;
        self.state.best_score = self.state.best_score.max(previous_score);
        self.state.focus_score = 0;
        self.state.last_reset_date = today;

        storage::write(
            self.store.as_ref(),
            keys::LAST_RESET_DATE,
            &today.to_string(),
        );
        self.persist();
        tracing::info!(
            %today,
            previous_score,
            best_score = self.state.best_score,
            "daily score reset"
        );

        Some(Event::DailyReset {
            previous_score,
            best_score: self.state.best_score,
            date: today,
        })
    }

    pub fn add_points(&mut self, points: u32) {
        self.state.focus_score = self.state.focus_score.saturating_add(points);
        self.persist();
    }

    /// Subtract points, never going below zero.
    pub fn deduct_points(&mut self, points: u32) {
        self.state.focus_score = self.state.focus_score.saturating_sub(points);
        self.persist();
    }

    /// Count a finished task and award its points. Returns the points awarded.
    pub fn record_task_complete(&mut self) -> u32 {
        self.state.tasks_complete = self.state.tasks_complete.saturating_add(1);
        self.add_points(self.rules.task_complete);
        self.rules.task_complete
    }

    pub fn record_flow_bonus(&mut self, source: BonusSource) -> Event {
        self.add_points(self.rules.flow_bonus);
        tracing::debug!(?source, points = self.rules.flow_bonus, "flow bonus");
        Event::FlowBonus {
            points: self.rules.flow_bonus,
            source,
        }
    }

    /// Deduct the pause penalty and return it. The score floors at zero,
    /// so fewer points may actually be removed.
    pub fn apply_pause_penalty(&mut self) -> u32 {
        self.deduct_points(self.rules.pause_penalty);
        self.rules.pause_penalty
    }

    fn persist(&self) {
        let s = self.store.as_ref();
        storage::write(s, keys::FOCUS_SCORE, &self.state.focus_score.to_string());
        storage::write(s, keys::BEST_SCORE, &self.state.best_score.to_string());
        storage::write(
            s,
            keys::TASKS_COMPLETE,
            &self.state.tasks_complete.to_string(),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::storage::{KvStore, MemoryStore};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn seeded(focus: &str, best: &str, date: &str) -> Rc<MemoryStore> {
        let store = Rc::new(MemoryStore::new());
        store.set(keys::FOCUS_SCORE, focus).unwrap();
        store.set(keys::BEST_SCORE, best).unwrap();
        store.set(keys::LAST_RESET_DATE, date).unwrap();
        store
    }

    #[test]
    fn daily_reset_promotes_score_to_best() {
        let store = seeded("50", "40", "2026-10-15");
        let mut tracker = ScoreTracker::load(store.clone(), ScoringRules::default(), day(16));

        let ev = tracker.check_daily_reset(day(16)).unwrap();
        assert_eq!(ev.message().as_deref(), Some("New day started! Previous best: 50"));
        assert_eq!(tracker.best_score(), 50);
        assert_eq!(tracker.focus_score(), 0);
        assert_eq!(tracker.state().last_reset_date, day(16));
        assert_eq!(store.get(keys::FOCUS_SCORE).unwrap().as_deref(), Some("0"));
        assert_eq!(store.get(keys::BEST_SCORE).unwrap().as_deref(), Some("50"));
        assert_eq!(
            store.get(keys::LAST_RESET_DATE).unwrap().as_deref(),
            Some("2026-10-16")
        );
    }

    #[test]
    fn daily_reset_keeps_higher_best() {
        let store = seeded("10", "80", "2026-10-15");
        let mut tracker = ScoreTracker::load(store, ScoringRules::default(), day(16));
        tracker.check_daily_reset(day(16));
        assert_eq!(tracker.best_score(), 80);
        assert_eq!(tracker.focus_score(), 0);
    }

    #[test]
    fn daily_reset_is_idempotent() {
        let store = seeded("50", "40", "2026-10-15");
        let mut tracker = ScoreTracker::load(store, ScoringRules::default(), day(16));
        assert!(tracker.check_daily_reset(day(16)).is_some());
        tracker.add_points(5);
        let before = tracker.state().clone();
        assert!(tracker.check_daily_reset(day(16)).is_none());
        assert_eq!(tracker.state(), &before);
    }

    #[test]
    fn first_launch_never_resets() {
        let store = Rc::new(MemoryStore::new());
        let mut tracker = ScoreTracker::load(store, ScoringRules::default(), day(16));
        assert!(tracker.check_daily_reset(day(16)).is_none());
    }

    #[test]
    fn deduction_floors_at_zero() {
        let store = seeded("10", "0", "2026-10-16");
        let mut tracker = ScoreTracker::load(store.clone(), ScoringRules::default(), day(16));
        assert_eq!(tracker.apply_pause_penalty(), 15);
        assert_eq!(tracker.focus_score(), 0);
        assert_eq!(store.get(keys::FOCUS_SCORE).unwrap().as_deref(), Some("0"));
    }

    #[test]
    fn task_completion_writes_through() {
        let store = Rc::new(MemoryStore::new());
        let mut tracker = ScoreTracker::load(store.clone(), ScoringRules::default(), day(16));
        assert_eq!(tracker.record_task_complete(), 20);
        tracker.record_flow_bonus(BonusSource::TaskComplete);
        assert_eq!(tracker.focus_score(), 50);
        assert_eq!(tracker.tasks_complete(), 1);
        assert_eq!(store.get(keys::FOCUS_SCORE).unwrap().as_deref(), Some("50"));
        assert_eq!(store.get(keys::TASKS_COMPLETE).unwrap().as_deref(), Some("1"));
    }
}
