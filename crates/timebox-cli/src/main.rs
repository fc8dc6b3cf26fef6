use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "timebox-cli", version, about = "Timebox scheduling CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a candidate activity against existing ones
    Check(commands::check::CheckArgs),
    /// Find free slots of a given duration on a day
    Slots(commands::slots::SlotsArgs),
    /// Report long work streaks
    Burnout(commands::burnout::BurnoutArgs),
    /// Check whether a day is over capacity
    Triage(commands::triage::TriageArgs),
    /// Validate a reasoning-service proposal against a day
    Validate(commands::validate::ValidateArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Check(args) => commands::check::run(args),
        Commands::Slots(args) => commands::slots::run(args),
        Commands::Burnout(args) => commands::burnout::run(args),
        Commands::Triage(args) => commands::triage::run(args),
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
