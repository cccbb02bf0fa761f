//! Task queue commands for CLI.

use clap::Subcommand;
use flowdoro_core::error::Result;

use super::{open_quiet, print_events};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the end of the queue
    Add {
        /// Task name
        name: String,
    },
    /// List the current task and the queue
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
    /// Complete a task (the current task when no ID is given)
    Complete {
        /// Task ID
        id: Option<i64>,
    },
    /// Rename a task
    Rename {
        /// Task ID
        id: i64,
        /// New name
        name: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },
}

pub fn run(action: TaskAction) -> Result<()> {
    let mut app = open_quiet()?;

    match action {
        TaskAction::Add { name } => {
            let task = app.add_task(&name)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { all } => {
            if all {
                println!("{}", serde_json::to_string_pretty(app.tasks().tasks())?);
            } else {
                let view = app.view();
                let listing = serde_json::json!({
                    "current": view.current_task,
                    "queued": view.queued_tasks,
                });
                println!("{}", serde_json::to_string_pretty(&listing)?);
            }
        }
        TaskAction::Complete { id } => {
            let events = match id {
                Some(id) => app.complete_task(id),
                None => app.complete_current_task(),
            };
            print_events(&events)?;
        }
        TaskAction::Rename { id, name } => {
            let events = app.rename_task(id, &name);
            print_events(&events)?;
        }
        TaskAction::Delete { id } => {
            let events = app.delete_task(id);
            print_events(&events)?;
        }
    }
    Ok(())
}
