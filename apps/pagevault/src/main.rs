//! # pagevault
//!
//! Operator tool for encrypted index stores: generates key pairs, inspects store headers and
//! moves data between plain files and stores.
//!
//! ```text
//! pagevault <config> keygen <out>
//! pagevault <config> inspect <store>
//! pagevault <config> import <plain> <store>
//! pagevault <config> export <store> <plain>
//! ```

use crate::commands::{Command, CommandError, USAGE};
use crate::config::{ConfigError, PagevaultConfig};
use std::env;
use std::error::Error as StdError;
use std::path::Path;
use std::process::ExitCode;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

mod commands;
mod config;

#[derive(Debug, Error)]
enum AppError {
    #[error("Usage: {}", USAGE)]
    Usage,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Cannot initialize logging: {0}")]
    Logging(Box<dyn StdError + Send + Sync>),
    #[error(transparent)]
    Command(#[from] CommandError),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pagevault: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some((config_path, command_args)) = args.split_first() else {
        return Err(AppError::Usage);
    };

    let config = PagevaultConfig::load_from_file(config_path)?;
    let command = Command::parse(command_args)?;
    let logging_guard = init_logging(&config.logging.logs_dir).map_err(AppError::Logging)?;

    tracing::info!(config = %config_path, ?command, "running command");
    let result = command.run(&config.store);
    if let Err(e) = &result {
        tracing::error!(error = %e, "command failed");
    }

    drop(logging_guard);
    result.map_err(AppError::Command)
}

pub fn init_logging(log_dir: &Path) -> Result<WorkerGuard, Box<dyn StdError + Send + Sync>> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "pagevault.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .json()
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
