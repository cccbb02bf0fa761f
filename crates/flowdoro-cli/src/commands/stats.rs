use flowdoro_core::error::Result;

use super::open_quiet;

/// Score counters as JSON.
pub fn run() -> Result<()> {
    let app = open_quiet()?;
    println!("{}", serde_json::to_string_pretty(app.scores().state())?);
    Ok(())
}

/// View of a fresh session. Session state is not persisted, so this is
/// always an idle focus countdown.
pub fn status() -> Result<()> {
    let app = open_quiet()?;
    println!("{}", serde_json::to_string_pretty(&app.view())?);
    Ok(())
}
