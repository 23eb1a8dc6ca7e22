use std::fs;

use crate::{
    cli::AnalyzeArgs,
    core::analysis::Analysis,
    ingest,
    pivot::Pivot,
    prelude::*,
    report::Report,
    tables::{
        build_breakdown_table,
        build_comparison_table,
        build_hourly_profile_table,
        build_validation_table,
    },
};

pub fn run(args: &AnalyzeArgs) -> Result {
    let tariff = args.tariff.load()?;
    let readings = ingest::usage::load_dir(&args.data_dir, &args.identifier)?;
    info!(n_readings = readings.len(), "loaded the usage series");

    let data_dir = args.output_dir.join("data");
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create `{}`", data_dir.display()))?;
    let aggregated_path = data_dir.join(format!("{}_aggregated.csv", args.identifier));
    Pivot::from_readings(&readings).write_csv(&aggregated_path)?;
    info!(path = %aggregated_path.display(), "saved the aggregated series");

    let billed = match &args.billing_file {
        Some(path) => Some(ingest::billing::load_file(path)?),
        None => None,
    };

    let analysis = Analysis::try_new(&tariff, &readings, billed.as_deref())?;
    info!(
        total = %analysis.statistics.total_energy,
        days = analysis.statistics.day_count,
        monthly = %analysis.statistics.try_monthly_projection()?,
        "crunched the numbers",
    );

    println!("{}", build_comparison_table(&analysis.results, analysis.optimal));
    println!("{}", build_breakdown_table(&analysis.results));
    println!("{}", build_hourly_profile_table(&analysis.statistics));
    if let Some(validation) = &analysis.validation {
        println!("{}", build_validation_table(validation));
        info!(
            closest_plan = %validation.closest_plan,
            accuracy = validation.accuracy,
            "validated against billing data",
        );
    }
    info!(
        optimal = %analysis.optimal,
        monthly_cost = %analysis.results.total_cost(analysis.optimal),
        "recommendation",
    );

    let report_dir = args.output_dir.join("report");
    fs::create_dir_all(&report_dir)
        .with_context(|| format!("failed to create `{}`", report_dir.display()))?;
    let report_path = report_dir.join(format!("{}_report.html", args.identifier));
    Report::new(&args.identifier, &readings, &analysis).write_to(&report_path)?;
    info!(path = %report_path.display(), "report rendered");

    Ok(())
}
