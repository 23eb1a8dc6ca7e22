use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Timelike};
use itertools::Itertools;

use crate::{
    core::{
        error::AnalysisError,
        period::{TouPeriod, UloPeriod, is_weekend},
        reading::Reading,
    },
    quantity::energy::KilowattHours,
};

/// Aggregated view of an hourly usage series.
///
/// A value snapshot computed once per run; nothing mutates it afterwards.
#[derive(Clone, Debug)]
pub struct UsageStatistics {
    pub total_energy: KilowattHours,

    /// Distinct calendar days with at least one reading. At least 1 for
    /// aggregated statistics, since aggregation rejects an empty series.
    pub day_count: u32,

    pub weekday: DaySubset,
    pub weekend: DaySubset,

    /// Mean energy per hour of day over weekday rows; `None` where the
    /// subset has no readings for that hour.
    pub weekday_hourly: [Option<KilowattHours>; 24],
    pub weekend_hourly: [Option<KilowattHours>; 24],

    /// Consumption per time-of-use period. Periods the series never touched
    /// are absent; read through [`Self::tou_energy`], which coalesces to
    /// zero.
    pub tou_totals: BTreeMap<TouPeriod, KilowattHours>,
    pub ulo_totals: BTreeMap<UloPeriod, KilowattHours>,
}

/// Energy and distinct-day count of a day-of-week subset.
#[derive(Clone, Copy, Debug, Default)]
pub struct DaySubset {
    pub energy: KilowattHours,
    pub day_count: u32,
}

impl UsageStatistics {
    #[allow(clippy::cast_possible_truncation)]
    pub fn try_from_readings(readings: &[Reading]) -> Result<Self, AnalysisError> {
        if readings.is_empty() {
            return Err(AnalysisError::EmptyDataset);
        }

        let mut total_energy = KilowattHours::ZERO;
        let mut days = BTreeSet::new();
        let mut weekday = DaySubset::default();
        let mut weekend = DaySubset::default();
        let mut weekday_days = BTreeSet::new();
        let mut weekend_days = BTreeSet::new();
        let mut weekday_hours = HourlyAccumulator::default();
        let mut weekend_hours = HourlyAccumulator::default();
        let mut tou_totals: BTreeMap<TouPeriod, KilowattHours> = BTreeMap::new();
        let mut ulo_totals: BTreeMap<UloPeriod, KilowattHours> = BTreeMap::new();

        for reading in readings {
            let date = reading.timestamp.date();
            let hour = reading.timestamp.hour();
            let day_of_week = reading.timestamp.weekday();

            total_energy += reading.energy;
            days.insert(date);
            if is_weekend(day_of_week) {
                weekend.energy += reading.energy;
                weekend_days.insert(date);
                weekend_hours.add(hour, reading.energy);
            } else {
                weekday.energy += reading.energy;
                weekday_days.insert(date);
                weekday_hours.add(hour, reading.energy);
            }
            *tou_totals.entry(TouPeriod::classify(hour, day_of_week)).or_default() +=
                reading.energy;
            *ulo_totals.entry(UloPeriod::classify(hour, day_of_week)).or_default() +=
                reading.energy;
        }
        weekday.day_count = weekday_days.len() as u32;
        weekend.day_count = weekend_days.len() as u32;

        Ok(Self {
            total_energy,
            day_count: days.len() as u32,
            weekday,
            weekend,
            weekday_hourly: weekday_hours.means(),
            weekend_hourly: weekend_hours.means(),
            tou_totals,
            ulo_totals,
        })
    }

    /// Consumption in the given time-of-use period, zero when absent.
    #[must_use]
    pub fn tou_energy(&self, period: TouPeriod) -> KilowattHours {
        self.tou_totals.get(&period).copied().unwrap_or(KilowattHours::ZERO)
    }

    /// Consumption in the given ultra-low-overnight period, zero when absent.
    #[must_use]
    pub fn ulo_energy(&self, period: UloPeriod) -> KilowattHours {
        self.ulo_totals.get(&period).copied().unwrap_or(KilowattHours::ZERO)
    }

    #[must_use]
    pub fn average_daily(&self) -> KilowattHours {
        self.total_energy / f64::from(self.day_count)
    }

    /// Scale factor from the observed window onto a 30-day month.
    pub fn try_monthly_multiplier(&self) -> Result<f64, AnalysisError> {
        if self.day_count == 0 {
            return Err(AnalysisError::InvalidPeriod);
        }
        Ok(30.0 / f64::from(self.day_count))
    }

    /// Total consumption normalized to a 30-day month.
    pub fn try_monthly_projection(&self) -> Result<KilowattHours, AnalysisError> {
        Ok(self.total_energy * self.try_monthly_multiplier()?)
    }
}

#[derive(Clone, Copy)]
struct HourlyAccumulator {
    sums: [KilowattHours; 24],
    counts: [u32; 24],
}

impl Default for HourlyAccumulator {
    fn default() -> Self {
        Self { sums: [KilowattHours::ZERO; 24], counts: [0; 24] }
    }
}

impl HourlyAccumulator {
    fn add(&mut self, hour: u32, energy: KilowattHours) {
        self.sums[hour as usize] += energy;
        self.counts[hour as usize] += 1;
    }

    fn means(self) -> [Option<KilowattHours>; 24] {
        self.sums
            .into_iter()
            .zip(self.counts)
            .map(|(sum, count)| (count > 0).then(|| sum / f64::from(count)))
            .collect_array()
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;

    fn reading(date: (i32, u32, u32), hour: u32, energy: f64) -> Reading {
        let timestamp = NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        Reading::new(timestamp, KilowattHours(energy))
    }

    /// 2026-02-09 is a Monday.
    const MONDAY: (i32, u32, u32) = (2026, 2, 9);
    const SATURDAY: (i32, u32, u32) = (2026, 2, 14);

    #[test]
    fn test_empty_series_is_rejected() {
        assert_eq!(
            UsageStatistics::try_from_readings(&[]).unwrap_err(),
            AnalysisError::EmptyDataset,
        );
    }

    #[test]
    fn test_single_weekday() {
        let readings = [
            reading(MONDAY, 0, 1.0),
            reading(MONDAY, 8, 1.0),
            reading(MONDAY, 12, 1.0),
            reading(MONDAY, 18, 1.0),
            reading(MONDAY, 22, 1.0),
        ];
        let statistics = UsageStatistics::try_from_readings(&readings).unwrap();

        assert_abs_diff_eq!(statistics.total_energy.0, 5.0);
        assert_eq!(statistics.day_count, 1);
        assert_abs_diff_eq!(statistics.tou_energy(TouPeriod::OnPeak).0, 2.0);
        assert_abs_diff_eq!(statistics.tou_energy(TouPeriod::MidPeak).0, 1.0);
        assert_abs_diff_eq!(statistics.tou_energy(TouPeriod::OffPeak).0, 2.0);
        assert_abs_diff_eq!(statistics.try_monthly_projection().unwrap().0, 150.0);
    }

    #[test]
    fn test_period_sums_partition_total() {
        let readings: Vec<Reading> = (0..24)
            .map(|hour| reading(MONDAY, hour, 0.25 + f64::from(hour) * 0.1))
            .chain((0..24).map(|hour| reading(SATURDAY, hour, 0.5)))
            .collect();
        let statistics = UsageStatistics::try_from_readings(&readings).unwrap();

        let tou_sum: KilowattHours = statistics.tou_totals.values().copied().sum();
        let ulo_sum: KilowattHours = statistics.ulo_totals.values().copied().sum();
        assert_abs_diff_eq!(tou_sum.0, statistics.total_energy.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ulo_sum.0, statistics.total_energy.0, epsilon = 1e-9);
    }

    #[test]
    fn test_weekday_weekend_split() {
        let readings = [
            reading(MONDAY, 10, 2.0),
            reading(MONDAY, 11, 1.0),
            reading(SATURDAY, 10, 4.0),
        ];
        let statistics = UsageStatistics::try_from_readings(&readings).unwrap();

        assert_eq!(statistics.day_count, 2);
        assert_abs_diff_eq!(statistics.weekday.energy.0, 3.0);
        assert_eq!(statistics.weekday.day_count, 1);
        assert_abs_diff_eq!(statistics.weekend.energy.0, 4.0);
        assert_eq!(statistics.weekend.day_count, 1);
    }

    #[test]
    fn test_hourly_means_leave_missing_hours_absent() {
        let readings = [
            reading(MONDAY, 10, 2.0),
            reading((2026, 2, 10), 10, 4.0),
            reading(SATURDAY, 7, 1.0),
        ];
        let statistics = UsageStatistics::try_from_readings(&readings).unwrap();

        assert_eq!(statistics.weekday_hourly[10], Some(KilowattHours(3.0)));
        assert_eq!(statistics.weekday_hourly[9], None);
        assert_eq!(statistics.weekend_hourly[7], Some(KilowattHours(1.0)));
        assert_eq!(statistics.weekend_hourly[10], None);
    }

    #[test]
    fn test_zero_day_count_fails_projection() {
        let mut statistics =
            UsageStatistics::try_from_readings(&[reading(MONDAY, 0, 1.0)]).unwrap();
        statistics.day_count = 0;

        assert_eq!(statistics.try_monthly_multiplier().unwrap_err(), AnalysisError::InvalidPeriod);
        assert_eq!(statistics.try_monthly_projection().unwrap_err(), AnalysisError::InvalidPeriod);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let readings =
            [reading(MONDAY, 3, 0.7), reading(MONDAY, 14, 1.3), reading(SATURDAY, 20, 2.1)];
        let first = UsageStatistics::try_from_readings(&readings).unwrap();
        let second = UsageStatistics::try_from_readings(&readings).unwrap();

        assert_eq!(first.total_energy, second.total_energy);
        assert_eq!(first.tou_totals, second.tou_totals);
        assert_eq!(first.ulo_totals, second.ulo_totals);
    }
}
