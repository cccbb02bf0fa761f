use clap::Subcommand;
use flowdoro_core::error::Result;

use super::open_quiet;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current durations
    Show,
    /// Set focus and break durations in minutes
    Set {
        /// Focus minutes (1-60)
        #[arg(allow_hyphen_values = true)]
        focus_minutes: i64,
        /// Break minutes (1-30)
        #[arg(allow_hyphen_values = true)]
        break_minutes: i64,
    },
}

pub fn run(action: SettingsAction) -> Result<()> {
    let mut app = open_quiet()?;

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&app.settings())?);
        }
        SettingsAction::Set { focus_minutes, break_minutes } => {
            let settings = app.save_settings(focus_minutes, break_minutes)?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}
