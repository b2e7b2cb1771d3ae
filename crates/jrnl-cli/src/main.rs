use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use jrnl_core::{resolve_db_path, Config, ConfigError};

mod commands;
mod timespec;

#[derive(Parser)]
#[command(name = "jrnl", version, about = "Append-only personal journal")]
struct Cli {
    /// Journal database file (overrides $JRNL_DB and the config file)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append standard input as a new entry
    Put,
    /// Print entries, optionally only those of one day
    Get(commands::get::GetArgs),
}

fn init_tracing(verbose: u8) {
    use std::io::IsTerminal;
    use tracing_subscriber::EnvFilter;

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("JRNL_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // An explicit --db must keep working without a home directory.
    let config = match Config::load() {
        Ok(config) => config,
        Err(ConfigError::NoHomeDir) => Config::default(),
        Err(e) => return Err(e.into()),
    };
    let db_path = resolve_db_path(cli.db.as_deref(), &config)?;

    match cli.command {
        Commands::Put => commands::put::run(&db_path),
        Commands::Get(args) => commands::get::run(&db_path, &config, args),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
