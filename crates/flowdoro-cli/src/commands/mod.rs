pub mod config;
pub mod run;
pub mod settings;
pub mod stats;
pub mod task;

use std::rc::Rc;

use flowdoro_core::error::Result;
use flowdoro_core::{Config, Database, Event, LogSink, NotificationSink, Pomodoro, SharedStore};

/// Build the app from the on-disk config and database.
pub fn open_app(notifier: impl NotificationSink + 'static) -> Result<Pomodoro> {
    let config = Config::load_or_default();
    let store: SharedStore = Rc::new(Database::open()?);
    Ok(Pomodoro::builder(store)
        .config(&config)
        .notifier(notifier)
        .build())
}

/// App for one-shot commands; notifications only reach the log.
pub fn open_quiet() -> Result<Pomodoro> {
    open_app(LogSink)
}

pub fn print_events(events: &[Event]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(events)?);
    Ok(())
}
