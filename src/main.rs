mod cli;
mod core;
mod ingest;
mod pivot;
mod prelude;
mod quantity;
mod report;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Analyze(args) => cli::analyze::run(&args)?,
        Command::Tariff(args) => cli::tariff::run(&args)?,
    }

    info!("done!");
    Ok(())
}
