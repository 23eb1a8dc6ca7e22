use std::path::Path;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use crate::{core::validation::BilledHour, prelude::*, quantity::cost::Cost};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One row of a billing export: `datetime,cost`.
#[derive(Debug, Deserialize)]
struct BillingRow {
    datetime: String,
    cost: f64,
}

/// Load hourly billed costs, sorted with duplicate timestamps dropped.
pub fn load_file(path: &Path) -> Result<Vec<BilledHour>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open billing file `{}`", path.display()))?;

    let mut billed = Vec::new();
    for row in csv_reader.deserialize() {
        let row: BillingRow = match row {
            Ok(row) => row,
            Err(error) => {
                warn!(%error, "skipping invalid billing row");
                continue;
            }
        };
        match NaiveDateTime::parse_from_str(&row.datetime, TIMESTAMP_FORMAT) {
            Ok(timestamp) => billed.push(BilledHour::new(timestamp, Cost(row.cost))),
            Err(error) => {
                warn!(datetime = %row.datetime, %error, "skipping billing row");
            }
        }
    }
    ensure!(!billed.is_empty(), "no billing data in `{}`", path.display());

    billed.sort_by_key(|hour| hour.timestamp);
    billed.dedup_by_key(|hour| hour.timestamp);
    Ok(billed)
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::Write};

    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("billing.csv");
        File::create(&path)
            .unwrap()
            .write_all(b"datetime,cost\n2026-02-09 01:00,0.07\n2026-02-09 00:00,0.05\nbogus,1.0\n")
            .unwrap();

        let billed = load_file(&path).unwrap();

        assert_eq!(billed.len(), 2);
        assert_eq!(
            billed[0].timestamp,
            NaiveDate::from_ymd_opt(2026, 2, 9).unwrap().and_hms_opt(0, 0, 0).unwrap(),
        );
        assert_eq!(billed[0].cost, Cost(0.05));
    }

    #[test]
    fn test_empty_billing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("billing.csv");
        File::create(&path).unwrap().write_all(b"datetime,cost\n").unwrap();

        assert!(load_file(&path).is_err());
    }
}
