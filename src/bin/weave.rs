//! Weave CLI Binary
//!
//! Command-line interface for the step-driven project builder.

use anyhow::Context;
use clap::Parser;
use std::process;
use weave::logging;
use weave::tooling::cli::{Cli, CliContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let context =
        CliContext::new(cli.config.clone()).context("failed to load configuration")?;

    let mut logging_config = context.config().logging.clone();
    if let Some(level) = &cli.log_level {
        logging_config.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        logging_config.format = format.clone();
    }
    if let Some(output) = &cli.log_output {
        logging_config.output = output.clone();
    }
    if let Some(file) = &cli.log_file {
        logging_config.file = Some(file.clone());
    }
    logging::init_logging(&logging_config).context("failed to initialize logging")?;

    match context.execute(&cli.command).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
