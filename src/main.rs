mod error;
mod models;
mod providers;
mod regions;
mod shell;
mod utils;
mod vacancies;

use std::io;

use clap::Parser;
use colored::Colorize;
use eyre::Result;
use log::info;

use crate::shell::Shell;
use crate::utils::cli::Args;
use crate::utils::config::{Config, config};
use crate::utils::log::Logger;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    Logger::init(args.verbosity);

    info!(
        "starting vacancy-scout {}",
        format!("v{}", env!("CARGO_PKG_VERSION")).magenta()
    );

    let config: Config = config(args.config)?;

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut shell = Shell::new(config, !args.all_at_once, stdin, stdout);

    let end = shell.run().await?;
    info!("finished: {:?}", end);

    Ok(())
}
