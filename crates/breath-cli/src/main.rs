use breath_core::{BreathType, Config, StopwatchKind};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "breath-cli", version, about = "Breath training CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Guided breathing exercise
    Exercise {
        #[command(subcommand)]
        action: commands::exercise::ExerciseAction,
    },
    /// Breath-hold sessions
    Hold {
        #[command(subcommand)]
        action: commands::stopwatch::StopwatchAction,
    },
    /// Long-exhale sessions
    Exhale {
        #[command(subcommand)]
        action: commands::stopwatch::StopwatchAction,
    },
    /// Records grouped by day, newest first
    History {
        /// Only show one type (hold, exhale, exercise)
        #[arg(long = "type")]
        breath_type: Option<BreathType>,
    },
    /// Practice statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Today's daily tasks
    Tasks,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Reminder schedule
    Reminders {
        #[command(subcommand)]
        action: commands::reminders::ReminderAction,
    },
    /// Delete all records and tasks
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    breath_core::logging::init(&Config::load_or_default().logging.level);

    let result = match cli.command {
        Commands::Exercise { action } => commands::exercise::run(action),
        Commands::Hold { action } => commands::stopwatch::run(StopwatchKind::Hold, action),
        Commands::Exhale { action } => commands::stopwatch::run(StopwatchKind::Exhale, action),
        Commands::History { breath_type } => commands::history::run(breath_type),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Tasks => commands::tasks::run(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Reminders { action } => commands::reminders::run(action),
        Commands::Reset { yes } => commands::reset::run(yes),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
