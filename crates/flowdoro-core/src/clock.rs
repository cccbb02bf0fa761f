use std::cell::Cell;

use chrono::{Local, NaiveDate, Utc};

/// Source of the calendar date (for daily resets) and of task timestamps.
pub trait Clock {
    /// Today's date in the user's local time zone.
    fn today(&self) -> NaiveDate;
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A hand-driven clock. Each `now_ms` call advances one millisecond.
#[derive(Debug)]
pub struct ManualClock {
    today: Cell<NaiveDate>,
    now_ms: Cell<i64>,
}

impl ManualClock {
    pub fn new(today: NaiveDate, now_ms: i64) -> Self {
        Self {
            today: Cell::new(today),
            now_ms: Cell::new(now_ms),
        }
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.today.set(today);
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }

    fn now_ms(&self) -> i64 {
        let now = self.now_ms.get();
        self.now_ms.set(now + 1);
        now
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}
