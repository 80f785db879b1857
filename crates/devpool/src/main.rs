mod commands;
mod pool;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "devpool")]
#[command(about = "Find and claim free Genymotion SaaS instances for test sessions", long_about = None)]
struct Cli {
    /// Config file (default: DEVPOOL_CONFIG_PATH, ./devpool.yaml, ~/.config/devpool/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the first free instance of a recipe without claiming it
    Find {
        /// Recipe UUID
        recipe: String,
    },
    /// Show an instance by UUID, whatever its state
    Get {
        /// Instance UUID
        id: String,
    },
    /// Claim the first free instance of a recipe
    Claim {
        /// Recipe UUID
        recipe: String,
    },
    /// Release a claimed instance
    Release {
        /// Instance UUID
        id: String,
    },
    /// List claimed devices
    Busy,
    /// Print a new instance name for this session
    Name,
    /// Show version information
    Version,
}

/// Exit code when the query ran but found nothing
const EXIT_NOT_FOUND: u8 = 1;
/// Exit code when the query could not run
const EXIT_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_NOT_FOUND),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Ok(false) means the command ran but had nothing to report
async fn run(cli: Cli) -> anyhow::Result<bool> {
    // Version does not need a config
    if matches!(cli.command, Commands::Version) {
        return Ok(print_version());
    }

    let config = devpool_config::PoolConfig::load(cli.config.as_deref())?;
    tracing::debug!("Using config: {:?}", config);
    let pool = pool::Pool::from_config(&config)?;

    match cli.command {
        Commands::Find { recipe } => commands::lookup::handle_find(&pool, &recipe, cli.json).await,
        Commands::Get { id } => commands::lookup::handle_get(&pool, &id, cli.json).await,
        Commands::Claim { recipe } => {
            commands::claim::handle_claim(&pool, &recipe, cli.json).await
        }
        Commands::Release { id } => commands::claim::handle_release(&pool, &id).await,
        Commands::Busy => commands::busy::handle(&pool, cli.json).await,
        Commands::Name => {
            println!("{}", pool.naming.generate_name());
            Ok(true)
        }
        Commands::Version => Ok(print_version()),
    }
}

fn print_version() -> bool {
    println!("devpool {}", env!("CARGO_PKG_VERSION"));
    true
}
