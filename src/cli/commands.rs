//! Command implementations for the Vitibrasil processor CLI

pub mod export;
pub mod ingest;
pub mod shared;

pub use shared::RunOutcome;

use crate::cli::args::{Args, Commands};
use crate::error::Result;
use tracing::{debug, info};

/// Main command runner
///
/// Sets up logging, layers configuration under the command's flags, and
/// dispatches to the selected command.
pub fn run(args: Args) -> Result<RunOutcome> {
    shared::setup_logging(&args)?;

    info!("Starting Vitibrasil processor");
    debug!("Command line arguments: {:?}", args);

    match &args.command {
        Commands::Ingest(ingest_args) => {
            let mut config = shared::load_configuration(&args, ingest_args.database.as_ref())?;
            if let Some(strategy) = ingest_args.dedup {
                config = config.with_dedup_strategy(strategy);
            }
            if ingest_args.fail_fast {
                config = config.with_fail_fast();
            }
            ingest::run_ingest(ingest_args, &config, args.show_progress())
        }
        Commands::Export(export_args) => {
            let mut config = shared::load_configuration(&args, export_args.database.as_ref())?;
            if let Some(years) = export_args.years {
                config = config.with_recent_years(years);
                config.validate()?;
            }
            export::run_export(export_args, &config)
        }
        Commands::Latest(latest_args) => {
            let config = shared::load_configuration(&args, latest_args.database.as_ref())?;
            export::run_latest(latest_args, &config)
        }
    }
}
