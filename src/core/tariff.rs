use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    core::period::{TouPeriod, UloPeriod},
    prelude::*,
    quantity::{energy::KilowattHours, rate::KilowattHourRate},
};

/// Regulated price schedules for the three residential plans.
///
/// A tariff change is a configuration change: the calculators never embed
/// rate values.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Tariff {
    pub tiered: TieredRates,
    pub tou: TouRates,
    pub ulo: UloRates,
}

impl Tariff {
    /// Load a tariff override in TOML format.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read tariff file `{}`", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse tariff file `{}`", path.display()))
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TieredRates {
    /// Monthly consumption threshold between the two tiers.
    pub tier1_limit: KilowattHours,
    pub tier1_rate: KilowattHourRate,
    pub tier2_rate: KilowattHourRate,
}

impl Default for TieredRates {
    fn default() -> Self {
        Self {
            tier1_limit: KilowattHours(1000.0),
            tier1_rate: KilowattHourRate(0.120),
            tier2_rate: KilowattHourRate(0.142),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TouRates {
    pub off_peak: KilowattHourRate,
    pub mid_peak: KilowattHourRate,
    pub on_peak: KilowattHourRate,
}

impl Default for TouRates {
    fn default() -> Self {
        Self {
            off_peak: KilowattHourRate(0.098),
            mid_peak: KilowattHourRate(0.157),
            on_peak: KilowattHourRate(0.203),
        }
    }
}

impl TouRates {
    #[must_use]
    pub const fn rate(&self, period: TouPeriod) -> KilowattHourRate {
        match period {
            TouPeriod::OffPeak => self.off_peak,
            TouPeriod::MidPeak => self.mid_peak,
            TouPeriod::OnPeak => self.on_peak,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct UloRates {
    pub ultra_low: KilowattHourRate,
    pub off_peak: KilowattHourRate,
    pub mid_peak: KilowattHourRate,
    pub on_peak: KilowattHourRate,
}

impl Default for UloRates {
    fn default() -> Self {
        Self {
            ultra_low: KilowattHourRate(0.039),
            off_peak: KilowattHourRate(0.098),
            mid_peak: KilowattHourRate(0.157),
            on_peak: KilowattHourRate(0.391),
        }
    }
}

impl UloRates {
    #[must_use]
    pub const fn rate(&self, period: UloPeriod) -> KilowattHourRate {
        match period {
            UloPeriod::UltraLow => self.ultra_low,
            UloPeriod::OffPeak => self.off_peak,
            UloPeriod::MidPeak => self.mid_peak,
            UloPeriod::OnPeak => self.on_peak,
        }
    }
}
