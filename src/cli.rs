pub mod analyze;
pub mod tariff;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{core::tariff::Tariff, prelude::*};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a usage dataset and recommend the cheapest rate plan.
    Analyze(Box<AnalyzeArgs>),

    /// Print the configured rate schedules.
    Tariff(TariffArgs),
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Dataset identifier: the subdirectory of the data directory holding
    /// the per-day exports.
    pub identifier: String,

    #[clap(long, env = "RATEL_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    #[clap(long, env = "RATEL_OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Hourly billed costs (`datetime,cost` CSV) to validate the estimates
    /// against.
    #[clap(long, env = "RATEL_BILLING_FILE")]
    pub billing_file: Option<PathBuf>,

    #[clap(flatten)]
    pub tariff: TariffArgs,
}

#[derive(Parser)]
pub struct TariffArgs {
    /// Tariff schedule in TOML format overriding the built-in rates.
    #[clap(long = "tariff-file", env = "RATEL_TARIFF_FILE")]
    pub tariff_file: Option<PathBuf>,
}

impl TariffArgs {
    pub fn load(&self) -> Result<Tariff> {
        match &self.tariff_file {
            Some(path) => Tariff::from_file(path),
            None => Ok(Tariff::default()),
        }
    }
}
