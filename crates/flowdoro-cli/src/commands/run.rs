//! Interactive timer loop.
//!
//! A one-second tokio interval drives `tick()` while a countdown is armed,
//! and stdin lines drive user actions. When the session's countdown id
//! changes the interval is rebuilt so a restarted countdown gets a full
//! first second.

use std::io::Write;
use std::time::Duration;

use flowdoro_core::error::Result;
use flowdoro_core::{CountdownId, Notification, Pomodoro, ViewModel, ViewRenderer};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use super::open_app;

const HELP: &str = "\
commands:
  s          start / pause
  r          reset
  b          take / end break
  c          complete current task
  a <name>   add task
  n <id> <name>  rename task
  d <id>     delete task
  q          quit";

/// Single-line status renderer.
#[derive(Default)]
struct TextRenderer;

impl ViewRenderer for TextRenderer {
    fn render(&mut self, view: &ViewModel) {
        let task = view
            .current_task
            .as_ref()
            .map(|t| format!("{} (#{})", t.name, t.id))
            .unwrap_or_else(|| "No task available".to_string());
        let queued = match view.queued_tasks.len() {
            0 => String::new(),
            n => format!(" +{n} queued"),
        };
        print!(
            "\r{}  {}  [{} | {}]  {}{}  score {}  done {}   ",
            view.status,
            view.timer_text,
            view.start_label,
            view.break_label,
            task,
            queued,
            view.score_text,
            view.tasks_complete,
        );
        let _ = std::io::stdout().flush();
    }
}

enum Flow {
    Continue,
    Quit,
}

/// One-second interval bound to a single countdown.
struct Ticker {
    armed: Option<CountdownId>,
    interval: Interval,
}

impl Ticker {
    fn new(armed: Option<CountdownId>) -> Self {
        Self {
            armed,
            interval: new_interval(),
        }
    }

    fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    async fn tick(&mut self) {
        self.interval.tick().await;
    }

    /// Track the session's current countdown. Returns true when the
    /// interval was rebuilt.
    fn follow(&mut self, current: Option<CountdownId>) -> bool {
        if current == self.armed {
            return false;
        }
        tracing::debug!(armed = ?self.armed, ?current, "countdown changed");
        self.armed = current;
        self.interval = new_interval();
        true
    }
}

fn new_interval() -> Interval {
    let period = Duration::from_secs(1);
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

pub fn run() -> Result<()> {
    let app = open_app(|n: Notification| eprintln!("\n» {}", n.message))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(drive(app))
}

async fn drive(mut app: Pomodoro) -> Result<()> {
    let mut renderer = TextRenderer;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = Ticker::new(app.session().countdown());

    println!("{HELP}");
    renderer.render(&app.view());

    loop {
        let armed = ticker.is_armed();
        tokio::select! {
            _ = ticker.tick(), if armed => {
                app.tick();
                app.check_daily_reset();
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Flow::Quit = handle(&mut app, line.trim()) {
                    break;
                }
            }
        }

        ticker.follow(app.session().countdown());
        renderer.render(&app.view());
    }

    println!();
    Ok(())
}

fn handle(app: &mut Pomodoro, line: &str) -> Flow {
    let (cmd, rest) = match line.split_once(' ') {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match cmd {
        "" => {}
        "s" => {
            app.toggle_timer();
        }
        "r" => {
            app.reset();
        }
        "b" => {
            app.toggle_break();
        }
        "c" => {
            app.complete_current_task();
        }
        // rejected names are already reported through the notifier
        "a" => {
            let _ = app.add_task(rest);
        }
        "n" => match rest.split_once(' ').map(|(id, name)| (id.parse::<i64>(), name)) {
            Some((Ok(id), name)) => {
                app.rename_task(id, name);
            }
            _ => eprintln!("\nusage: n <id> <name>"),
        },
        "d" => match rest.parse::<i64>() {
            Ok(id) => {
                app.delete_task(id);
            }
            Err(_) => eprintln!("\nusage: d <id>"),
        },
        "q" => return Flow::Quit,
        _ => eprintln!("\n{HELP}"),
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use flowdoro_core::{MemoryStore, Mode};

    use super::*;

    fn app() -> Pomodoro {
        Pomodoro::builder(Rc::new(MemoryStore::new())).build()
    }

    #[test]
    fn commands_map_to_operations() {
        let mut app = app();
        handle(&mut app, "a Write docs");
        assert_eq!(app.tasks().current_task().unwrap().name, "Write docs");

        handle(&mut app, "s");
        assert!(app.session().is_running());
        handle(&mut app, "s");
        assert!(!app.session().is_running());

        handle(&mut app, "b");
        assert_eq!(app.session().mode(), Mode::Break);

        handle(&mut app, "c");
        assert!(app.tasks().current_task().is_none());
        assert!(matches!(handle(&mut app, "q"), Flow::Quit));
    }

    #[test]
    fn rename_and_delete_take_ids() {
        let mut app = app();
        let task = app.add_task("draft").unwrap();
        handle(&mut app, &format!("n {} final copy", task.id));
        assert_eq!(app.tasks().get(task.id).unwrap().name, "final copy");
        handle(&mut app, &format!("d {}", task.id));
        assert!(app.tasks().tasks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_follows_countdown() {
        let mut app = app();
        let mut ticker = Ticker::new(app.session().countdown());
        assert!(!ticker.is_armed());

        app.start();
        assert!(ticker.follow(app.session().countdown()));
        assert!(ticker.is_armed());
        assert!(!ticker.follow(app.session().countdown()));

        ticker.tick().await;
        app.tick();
        assert_eq!(app.session().time_left(), 25 * 60 - 1);

        app.pause();
        assert!(ticker.follow(app.session().countdown()));
        assert!(!ticker.is_armed());

        app.start();
        assert!(ticker.follow(app.session().countdown()));
        assert!(ticker.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn restarted_countdown_waits_a_full_second() {
        let mut app = app();
        app.start();
        let mut ticker = Ticker::new(app.session().countdown());
        tokio::time::advance(Duration::from_millis(600)).await;

        app.pause();
        app.start();
        assert!(ticker.follow(app.session().countdown()));

        let restarted = Instant::now();
        ticker.tick().await;
        let waited = restarted.elapsed();
        assert!(waited >= Duration::from_secs(1), "{waited:?}");
        assert!(waited < Duration::from_millis(1100), "{waited:?}");
    }
}
