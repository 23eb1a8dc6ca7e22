use std::{fs, path::Path};

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use crate::{core::reading::Reading, prelude::*, quantity::energy::KilowattHours};

/// One row of the hourly table in a per-day export.
#[derive(Debug, Deserialize)]
struct UsageRow {
    #[serde(rename = "Time")]
    time: String,

    #[serde(rename = "Units Consumed (kWh)")]
    kwh: f64,
}

/// Load every per-day export under `<data_dir>/<identifier>`, sorted
/// chronologically with duplicate timestamps dropped (first occurrence
/// wins). Unreadable files and rows are logged and skipped; gaps are fine.
pub fn load_dir(data_dir: &Path, identifier: &str) -> Result<Vec<Reading>> {
    let dir = data_dir.join(identifier);
    ensure!(dir.is_dir(), "data directory `{}` not found", dir.display());

    let mut paths: Vec<_> = fs::read_dir(&dir)
        .with_context(|| format!("failed to list `{}`", dir.display()))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|extension| extension == "csv"))
        .collect();
    paths.sort();

    let mut readings = Vec::new();
    for path in &paths {
        match load_file(path) {
            Ok(mut loaded) => {
                info!(path = %path.display(), n_readings = loaded.len(), "loaded");
                readings.append(&mut loaded);
            }
            Err(error) => warn!(path = %path.display(), "skipping file: {error:#}"),
        }
    }
    ensure!(!readings.is_empty(), "no usage data found under `{}`", dir.display());

    readings.sort_by_key(|reading| reading.timestamp);
    readings.dedup_by_key(|reading| reading.timestamp);
    Ok(readings)
}

/// Load one per-day export: metadata lines carrying the `Period:` day,
/// then a `Time,Units Consumed (kWh)` table with one row per hour.
pub fn load_file(path: &Path) -> Result<Vec<Reading>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    let date = extract_date(&contents)
        .with_context(|| format!("no `Period:` line in `{}`", path.display()))?;
    let header_index = contents
        .lines()
        .position(|line| line.trim_start().starts_with("Time,"))
        .with_context(|| format!("no hourly table in `{}`", path.display()))?;
    let table = contents.lines().skip(header_index).collect::<Vec<_>>().join("\n");

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(table.as_bytes());

    let mut readings = Vec::new();
    for row in csv_reader.deserialize() {
        let row: UsageRow = match row {
            Ok(row) => row,
            Err(error) => {
                warn!(%error, "skipping invalid row");
                continue;
            }
        };
        let Some(timestamp) = parse_hour(&row.time).and_then(|hour| date.and_hms_opt(hour, 0, 0))
        else {
            warn!(time = %row.time, "skipping row with an unparseable time");
            continue;
        };
        readings.push(Reading::new(timestamp, KilowattHours(row.kwh)));
    }
    Ok(readings)
}

/// The day the export covers, from a `Period: Feb 9,2026` metadata line.
fn extract_date(contents: &str) -> Option<NaiveDate> {
    contents.lines().take(5).find_map(|line| {
        let date = line.strip_prefix("Period:")?.trim();
        NaiveDate::parse_from_str(date, "%b %d,%Y").ok()
    })
}

fn parse_hour(time: &str) -> Option<u32> {
    time.split(':').next()?.trim().parse().ok()
}
