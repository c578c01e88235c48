//! Repowatch CLI entrypoint.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use repowatch::{ConfigError, OperationMode, RepowatchConfig, logging};

use cli::error::AppError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "repowatch stopped");
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let config = load_config()?;
    logging::init(config.log_format()?).map_err(|error| AppError::Logging {
        message: error.to_string(),
    })?;
    config.validate()?;

    match config.operation_mode() {
        OperationMode::MigrateDatabase => cli::migrations::run(&config),
        OperationMode::DryRun => cli::dry_run::run(&config).await,
        OperationMode::RunOnce => cli::run_once::run(&config).await,
        OperationMode::Scheduler => cli::run_forever::run(&config).await,
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ConfigError::Load`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<RepowatchConfig, ConfigError> {
    RepowatchConfig::load().map_err(|error| ConfigError::Load {
        message: error.to_string(),
    })
}
