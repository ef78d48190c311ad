mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::config::PartialConfig;
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("🚀 atomprep v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let config = PartialConfig::load(cli.config.as_deref())?;

    let command_result = match cli.command {
        Commands::ConvertData(args) => {
            info!("Dispatching to 'convert-data' command.");
            commands::convert_data::run(args, config)
        }
        Commands::ConvertTraj(args) => {
            info!("Dispatching to 'convert-traj' command.");
            commands::convert_traj::run(args, config)
        }
        Commands::CreateSio2(args) => {
            info!("Dispatching to 'create-sio2' command.");
            commands::create_sio2::run(args, config)
        }
        Commands::Inspect(args) => {
            info!("Dispatching to 'inspect' command.");
            commands::inspect::run(args)
        }
    };

    match &command_result {
        Ok(()) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
