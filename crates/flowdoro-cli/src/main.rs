use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "flowdoro", version, about = "Flowdoro focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the timer interactively
    Run,
    /// Print the timer view as JSON
    Status,
    /// Task queue management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Focus and break durations
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Print focus score, best score and completed tasks
    Stats,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run => commands::run::run(),
        Commands::Status => commands::stats::status(),
        Commands::Task { action } => commands::task::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Stats => commands::stats::run(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "flowdoro", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
