use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use traveler::Config;

// Declare the command handlers
mod commands;

/// Traveler - trips, photo albums and places to visit nearby.
#[derive(Parser)]
#[command(name = "traveler")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "TRAVELER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Create, edit, search and delete trips
    #[command(subcommand)]
    Trip(commands::trip::TripCommand),

    /// Manage the albums of a trip
    #[command(subcommand)]
    Album(commands::album::AlbumCommand),

    /// Add, reorder and delete photos in an album
    #[command(subcommand)]
    Photo(commands::photo::PhotoCommand),

    /// Find tourist attractions near a location
    Discover(commands::discover::DiscoverArgs),

    /// Look for orphaned album documents and missing photo files
    Audit(commands::audit::AuditArgs),
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "traveler=debug" } else { "traveler=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Trip(cmd) => commands::trip::run(cmd, &config),
        Command::Album(cmd) => commands::album::run(cmd, &config),
        Command::Photo(cmd) => commands::photo::run(cmd, &config).await,
        Command::Discover(args) => commands::discover::run(args, &config).await,
        Command::Audit(args) => commands::audit::run(args, &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
