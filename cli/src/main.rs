mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use error::Result;
use std::io;
use tracing::{debug, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\nError: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();

    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("chembalance v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Balance(args) => commands::balance(args, io::stdin().lock(), &mut out),
        Commands::Parse(args) => commands::parse(args, &mut out),
        Commands::Mass(args) => commands::mass(args, &mut out),
        Commands::Yield(args) => commands::theoretical_yield(args, &mut out),
    }
}
