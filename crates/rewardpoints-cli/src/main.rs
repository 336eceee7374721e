use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "rewardpoints-cli", version, about = "Reward Points CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Award a catalog activity at its configured points
    Award {
        /// Activity id (see `activities`)
        activity: String,
    },
    /// Award one of the configured quick-add values
    Quick { points: u32 },
    /// Award a custom amount (1-100)
    Custom { points: u32 },
    /// Undo a recent award (0 is the newest)
    Undo { index: usize },
    /// Points, progress and streak overview
    Status,
    /// Recent awards, newest first
    History {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Points per day for the recent window
    Chart {
        /// Days to show (defaults to chart.window_days)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Badges with unlock state and progress
    Badges,
    /// List the activity catalog
    Activities,
    /// Reset total points and history
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Display name, starting points and daily limit
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("REWARDPOINTS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Award { activity } => commands::award::award(&activity),
        Commands::Quick { points } => commands::award::quick(points),
        Commands::Custom { points } => commands::award::custom(points),
        Commands::Undo { index } => commands::award::undo(index),
        Commands::Status => commands::report::status(),
        Commands::History { limit } => commands::report::history(limit),
        Commands::Chart { days } => commands::report::chart(days),
        Commands::Badges => commands::report::badges(),
        Commands::Activities => commands::report::activities(),
        Commands::Reset { yes } => commands::reset::run(yes),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
