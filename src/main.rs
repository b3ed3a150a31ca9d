//! fakedb - SQL binary-operator evaluator

use anyhow::Result;
use clap::Parser as ClapParser;
use fakedb::cli::{self, Args};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let report = cli::run(&args)?;
    print!("{}", report);
    Ok(())
}
