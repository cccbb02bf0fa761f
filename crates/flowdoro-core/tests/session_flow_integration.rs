//! Integration tests for the full focus workflow.
//!
//! Drives a `Pomodoro` through tasks, sessions and day boundaries against
//! both the in-memory store and a SQLite file, then reloads from storage.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use flowdoro_core::{
    Database, Event, FlowRearm, KvStore, ManualClock, MemoryStore, Mode, Notification, Pomodoro,
    RunState, SessionPolicy, SharedStore, ValidationError,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn build(store: SharedStore, clock: Rc<ManualClock>) -> (Pomodoro, Rc<RefCell<Vec<String>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let app = Pomodoro::builder(store)
        .clock(clock)
        .notifier(move |n: Notification| sink.borrow_mut().push(n.message))
        .build();
    (app, seen)
}

#[test]
fn test_full_focus_day() {
    let store: SharedStore = Rc::new(MemoryStore::new());
    let clock = Rc::new(ManualClock::new(day(16), 1_700_000_000_000));
    let (mut app, seen) = build(store.clone(), clock.clone());

    let task = app.add_task("Write report").unwrap();
    assert_eq!(app.tasks().current_task().map(|t| t.id), Some(task.id));
    assert!(app.tasks().queued_tasks().is_empty());

    // Uninterrupted focus session: +30
    app.start();
    let focus_secs = app.settings().focus_secs();
    let mut events = Vec::new();
    for _ in 0..focus_secs {
        events.extend(app.tick());
    }
    assert_eq!(app.session().mode(), Mode::Break);
    assert_eq!(app.session().time_left(), app.settings().break_secs());
    assert_eq!(app.scores().focus_score(), 30);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::SessionCompleted { finished: Mode::Focus, .. })));

    // Task done with the streak still intact: +20 +30
    app.complete_task(task.id);
    assert_eq!(app.scores().focus_score(), 80);
    assert_eq!(app.scores().tasks_complete(), 1);

    assert_eq!(
        *seen.borrow(),
        vec![
            "Task 'Write report' added to queue!",
            "Flow state bonus! +30 points",
            "Pomodoro completed! Great work!",
            "Task \"Write report\" completed!",
            "focus state bonus! +30 points",
        ]
    );

    // Next day: score rolls into best
    clock.set_today(day(17));
    let reset = app.check_daily_reset().unwrap();
    assert!(matches!(reset, Event::DailyReset { best_score: 80, .. }));
    assert_eq!(app.scores().focus_score(), 0);
    assert!(app.check_daily_reset().is_none());

    // Everything written through
    let (reloaded, _) = build(store, clock);
    assert_eq!(reloaded.scores().best_score(), 80);
    assert_eq!(reloaded.scores().tasks_complete(), 1);
    assert_eq!(reloaded.tasks().tasks(), app.tasks().tasks());
    assert!(reloaded.tasks().current_task().is_none());
}

#[test]
fn test_paused_focus_loses_bonus() {
    let store: SharedStore = Rc::new(MemoryStore::new());
    let clock = Rc::new(ManualClock::new(day(16), 1));
    let (mut app, _) = build(store, clock);

    let task = app.add_task("Refactor").unwrap();
    app.start();
    app.tick();
    app.pause();
    assert_eq!(app.session().run_state(), RunState::Paused);
    assert!(!app.session().flow_streak_intact());
    assert_eq!(app.scores().focus_score(), 0);

    app.start();
    while app.session().mode() == Mode::Focus {
        app.tick();
    }
    assert_eq!(app.scores().focus_score(), 0);

    app.complete_task(task.id);
    assert_eq!(app.scores().focus_score(), 20);
}

#[test]
fn test_scores_reload_from_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowdoro.db");
    let clock = Rc::new(ManualClock::new(day(16), 1));

    {
        let store: SharedStore = Rc::new(Database::open_at(&path).unwrap());
        let (mut app, _) = build(store, clock.clone());
        app.save_settings(45, 15).unwrap();
        let a = app.add_task("alpha").unwrap();
        app.add_task("beta").unwrap();
        app.add_task("gamma").unwrap();
        app.rename_task(a.id, "alpha prime");
        app.complete_task(a.id);
    }

    let store: SharedStore = Rc::new(Database::open_at(&path).unwrap());
    assert_eq!(store.get("focusScore").unwrap().as_deref(), Some("50"));

    let (app, _) = build(store, clock);
    assert_eq!(app.settings().focus_duration, 45);
    assert_eq!(app.session().time_left(), 45 * 60);
    assert_eq!(app.tasks().tasks()[0].name, "alpha prime");
    assert_eq!(app.tasks().current_task().unwrap().name, "beta");
    let queued: Vec<&str> = app
        .tasks()
        .queued_tasks()
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(queued, vec!["gamma"]);
}

#[test]
fn test_invalid_settings_leave_state_untouched() {
    let store = Rc::new(MemoryStore::new());
    let clock = Rc::new(ManualClock::new(day(16), 1));
    let (mut app, _) = build(store.clone(), clock);

    assert!(matches!(
        app.save_settings(0, 5),
        Err(ValidationError::NonPositiveDuration { .. })
    ));
    assert!(matches!(
        app.save_settings(25, 31),
        Err(ValidationError::DurationExceedsMaximum { .. })
    ));
    assert!(store.get("settings").unwrap().is_none());
    assert_eq!(app.session().time_left(), 25 * 60);
}

#[test]
fn test_keep_countdown_policy() {
    let store: SharedStore = Rc::new(MemoryStore::new());
    let app = Pomodoro::builder(store)
        .clock(ManualClock::new(day(16), 1))
        .policy(SessionPolicy {
            flow_rearm: FlowRearm::EachSession,
            reset_countdown_on_save: false,
        });
    let mut app = app.build();

    app.start();
    app.tick();
    app.save_settings(10, 2).unwrap();
    assert_eq!(app.session().time_left(), 25 * 60 - 1);

    app.reset();
    assert_eq!(app.session().time_left(), 10 * 60);
}

#[test]
fn test_toggle_break_from_paused_runs() {
    let store: SharedStore = Rc::new(MemoryStore::new());
    let (mut app, _) = build(store, Rc::new(ManualClock::new(day(16), 1)));

    app.start();
    let first = app.session().countdown();
    app.pause();
    assert!(app.session().countdown().is_none());

    app.toggle_break();
    assert!(app.session().is_running());
    assert_ne!(app.session().countdown(), first);
    assert_eq!(app.view().timer_text, "05:00");
}
