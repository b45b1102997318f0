//! db-report - Runs named SQL report queries against SQLite.

mod cli;

use cli::Cli;
use db_report::batch::BatchCoordinator;
use db_report::config::Config;
use db_report::error::Result;
use db_report::logging;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}: {}", e.category(), e.message());
            eprintln!("!! Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<ExitCode> {
    // Config precedence: CLI flags, then the config file, then built-in defaults.
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.merge(&cli.overrides());

    let mode = cli.output_mode(&config);
    let fail_on_error = config.fail_on_error;
    let coordinator = BatchCoordinator::new(config, mode);

    let mut stdout = std::io::stdout().lock();
    let result = coordinator.run(cli.sql_file.as_deref(), &mut stdout).await?;

    // Per-query failures only affect the exit status when asked to.
    if fail_on_error && !result.all_succeeded {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
