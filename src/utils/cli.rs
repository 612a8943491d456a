use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "vacancy-scout")]
#[command(about = "Browse hh.ru and superjob.ru vacancies from the terminal", long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    pub config: PathBuf,

    /// Print every listing at once instead of pausing after each one
    #[arg(short, long)]
    pub all_at_once: bool,

    /// Sets the logger's verbosity level
    #[arg(short, long, value_name = "VERBOSITY", default_value_t = LevelFilter::Warn)]
    pub verbosity: LevelFilter,
}
