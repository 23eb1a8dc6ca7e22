use std::{collections::BTreeMap, path::Path};

use chrono::{NaiveDate, Timelike};

use crate::{core::reading::Reading, prelude::*, quantity::energy::KilowattHours};

/// Hour-by-day pivot of the usage series: 24 hour rows, one column per day.
#[derive(Debug)]
pub struct Pivot {
    columns: BTreeMap<NaiveDate, [Option<KilowattHours>; 24]>,
}

impl Pivot {
    #[must_use]
    pub fn from_readings(readings: &[Reading]) -> Self {
        let mut columns: BTreeMap<NaiveDate, [Option<KilowattHours>; 24]> = BTreeMap::new();
        for reading in readings {
            let column = columns.entry(reading.timestamp.date()).or_insert([None; 24]);
            column[reading.timestamp.hour() as usize] = Some(reading.energy);
        }
        Self { columns }
    }

    /// Write the pivot as CSV. Hours missing from a day stay empty cells.
    pub fn write_csv(&self, path: &Path) -> Result {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("failed to create `{}`", path.display()))?;

        let mut header = vec!["hour".to_owned()];
        header.extend(self.columns.keys().map(ToString::to_string));
        writer.write_record(&header)?;

        for hour in 0..24 {
            let mut record = vec![hour.to_string()];
            record.extend(self.columns.values().map(|column| {
                column[hour].map(|energy| energy.0.to_string()).unwrap_or_default()
            }));
            writer.write_record(&record)?;
        }
        writer.flush().context("failed to flush the aggregated series")?;
        Ok(())
    }
}
