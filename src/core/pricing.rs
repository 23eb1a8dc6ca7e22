use crate::{
    core::{
        error::AnalysisError,
        period::{TouPeriod, UloPeriod},
        statistics::UsageStatistics,
        tariff::{Tariff, TieredRates, TouRates, UloRates},
    },
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

/// The three competing rate plans.
#[derive(Clone, Copy, Debug, Eq, PartialEq, derive_more::Display)]
pub enum Plan {
    #[display("Tiered")]
    Tiered,

    #[display("TOU")]
    Tou,

    #[display("ULO")]
    Ulo,
}

impl Plan {
    /// Fixed evaluation order; doubles as the tie-break priority.
    pub const ALL: [Self; 3] = [Self::Tiered, Self::Tou, Self::Ulo];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Tiered => "tiered",
            Self::Tou => "tou",
            Self::Ulo => "ulo",
        }
    }
}

/// A value per plan, in the fixed evaluation order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerPlan<T> {
    pub tiered: T,
    pub tou: T,
    pub ulo: T,
}

impl<T> PerPlan<T> {
    pub const fn get(&self, plan: Plan) -> &T {
        match plan {
            Plan::Tiered => &self.tiered,
            Plan::Tou => &self.tou,
            Plan::Ulo => &self.ulo,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Plan, &T)> {
        [(Plan::Tiered, &self.tiered), (Plan::Tou, &self.tou), (Plan::Ulo, &self.ulo)].into_iter()
    }
}

/// Energy billed at one sub-rate, with its cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Charge {
    pub energy: KilowattHours,
    pub cost: Cost,
}

impl Charge {
    fn at_rate(energy: KilowattHours, rate: KilowattHourRate) -> Self {
        Self { energy, cost: energy * rate }
    }

    fn scale(self, multiplier: f64) -> Self {
        Self { energy: self.energy * multiplier, cost: self.cost * multiplier }
    }
}

/// Monthly cost under the tiered plan. Period-agnostic: the tier split
/// applies to the projected monthly total only.
#[derive(Clone, Copy, Debug)]
pub struct TieredResult {
    pub monthly_energy: KilowattHours,
    pub tier1: Charge,
    pub tier2: Charge,
    pub total_cost: Cost,
}

impl TieredResult {
    pub fn try_new(
        rates: &TieredRates,
        statistics: &UsageStatistics,
    ) -> Result<Self, AnalysisError> {
        let monthly_energy = statistics.try_monthly_projection()?;
        let tier1 = Charge::at_rate(monthly_energy.min(rates.tier1_limit), rates.tier1_rate);
        let tier2 = Charge::at_rate(
            (monthly_energy - rates.tier1_limit).max(KilowattHours::ZERO),
            rates.tier2_rate,
        );
        Ok(Self { monthly_energy, tier1, tier2, total_cost: tier1.cost + tier2.cost })
    }

    #[must_use]
    pub const fn components(&self) -> [(&'static str, Charge); 2] {
        [("Tier 1", self.tier1), ("Tier 2", self.tier2)]
    }
}

/// Monthly cost under the time-of-use plan. Charges are computed over the
/// observed window and every amount is scaled by the same 30-day multiplier.
#[derive(Clone, Copy, Debug)]
pub struct TouResult {
    pub monthly_energy: KilowattHours,
    pub off_peak: Charge,
    pub mid_peak: Charge,
    pub on_peak: Charge,
    pub total_cost: Cost,
}

impl TouResult {
    pub fn try_new(rates: &TouRates, statistics: &UsageStatistics) -> Result<Self, AnalysisError> {
        let multiplier = statistics.try_monthly_multiplier()?;
        let off_peak =
            Charge::at_rate(statistics.tou_energy(TouPeriod::OffPeak), rates.off_peak)
                .scale(multiplier);
        let mid_peak =
            Charge::at_rate(statistics.tou_energy(TouPeriod::MidPeak), rates.mid_peak)
                .scale(multiplier);
        let on_peak = Charge::at_rate(statistics.tou_energy(TouPeriod::OnPeak), rates.on_peak)
            .scale(multiplier);
        Ok(Self {
            monthly_energy: statistics.total_energy * multiplier,
            off_peak,
            mid_peak,
            on_peak,
            total_cost: off_peak.cost + mid_peak.cost + on_peak.cost,
        })
    }

    #[must_use]
    pub const fn components(&self) -> [(&'static str, Charge); 3] {
        [("Off-peak", self.off_peak), ("Mid-peak", self.mid_peak), ("On-peak", self.on_peak)]
    }
}

/// Monthly cost under the ultra-low-overnight plan.
#[derive(Clone, Copy, Debug)]
pub struct UloResult {
    pub monthly_energy: KilowattHours,
    pub ultra_low: Charge,
    pub off_peak: Charge,
    pub mid_peak: Charge,
    pub on_peak: Charge,
    pub total_cost: Cost,
}

impl UloResult {
    pub fn try_new(rates: &UloRates, statistics: &UsageStatistics) -> Result<Self, AnalysisError> {
        let multiplier = statistics.try_monthly_multiplier()?;
        let ultra_low =
            Charge::at_rate(statistics.ulo_energy(UloPeriod::UltraLow), rates.ultra_low)
                .scale(multiplier);
        let off_peak =
            Charge::at_rate(statistics.ulo_energy(UloPeriod::OffPeak), rates.off_peak)
                .scale(multiplier);
        let mid_peak =
            Charge::at_rate(statistics.ulo_energy(UloPeriod::MidPeak), rates.mid_peak)
                .scale(multiplier);
        let on_peak = Charge::at_rate(statistics.ulo_energy(UloPeriod::OnPeak), rates.on_peak)
            .scale(multiplier);
        Ok(Self {
            monthly_energy: statistics.total_energy * multiplier,
            ultra_low,
            off_peak,
            mid_peak,
            on_peak,
            total_cost: ultra_low.cost + off_peak.cost + mid_peak.cost + on_peak.cost,
        })
    }

    #[must_use]
    pub const fn components(&self) -> [(&'static str, Charge); 4] {
        [
            ("Ultra-low", self.ultra_low),
            ("Off-peak", self.off_peak),
            ("Mid-peak", self.mid_peak),
            ("On-peak", self.on_peak),
        ]
    }
}

/// Cost projections for all three plans over the same statistics.
#[derive(Clone, Copy, Debug)]
pub struct PlanResults {
    pub tiered: TieredResult,
    pub tou: TouResult,
    pub ulo: UloResult,
}

impl PlanResults {
    pub fn try_new(tariff: &Tariff, statistics: &UsageStatistics) -> Result<Self, AnalysisError> {
        Ok(Self {
            tiered: TieredResult::try_new(&tariff.tiered, statistics)?,
            tou: TouResult::try_new(&tariff.tou, statistics)?,
            ulo: UloResult::try_new(&tariff.ulo, statistics)?,
        })
    }

    #[must_use]
    pub const fn total_cost(&self, plan: Plan) -> Cost {
        match plan {
            Plan::Tiered => self.tiered.total_cost,
            Plan::Tou => self.tou.total_cost,
            Plan::Ulo => self.ulo.total_cost,
        }
    }

    #[must_use]
    pub const fn monthly_energy(&self, plan: Plan) -> KilowattHours {
        match plan {
            Plan::Tiered => self.tiered.monthly_energy,
            Plan::Tou => self.tou.monthly_energy,
            Plan::Ulo => self.ulo.monthly_energy,
        }
    }

    /// The cheapest plan. Equal totals keep the earliest plan in
    /// [`Plan::ALL`] order.
    #[must_use]
    pub fn optimal(&self) -> Plan {
        let mut optimal = Plan::Tiered;
        for plan in [Plan::Tou, Plan::Ulo] {
            if self.total_cost(plan) < self.total_cost(optimal) {
                optimal = plan;
            }
        }
        optimal
    }

    /// Gap between the most and the least expensive plan.
    #[must_use]
    pub fn monthly_savings(&self) -> Cost {
        let costs = Plan::ALL.map(|plan| self.total_cost(plan));
        let (min, max) = costs
            .into_iter()
            .fold((costs[0], costs[0]), |(min, max), cost| (min.min(cost), max.max(cost)));
        max - min
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;
    use crate::core::reading::Reading;

    fn statistics_for_monthly(monthly: f64) -> UsageStatistics {
        // 30 distinct days make the multiplier exactly 1.
        let readings: Vec<Reading> = (1..=30)
            .map(|day| {
                let timestamp = NaiveDate::from_ymd_opt(2026, 4, day)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap();
                Reading::new(timestamp, KilowattHours(monthly / 30.0))
            })
            .collect();
        UsageStatistics::try_from_readings(&readings).unwrap()
    }

    #[test]
    fn test_tiered_above_limit() {
        let result =
            TieredResult::try_new(&TieredRates::default(), &statistics_for_monthly(1200.0))
                .unwrap();

        assert_abs_diff_eq!(result.tier1.energy.0, 1000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.tier2.energy.0, 200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.tier1.cost.0, 120.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.tier2.cost.0, 28.4, epsilon = 1e-9);
        assert_abs_diff_eq!(result.total_cost.0, 148.4, epsilon = 1e-9);
    }

    #[test]
    fn test_tiered_below_limit_has_no_second_tier() {
        let result =
            TieredResult::try_new(&TieredRates::default(), &statistics_for_monthly(600.0))
                .unwrap();

        assert_abs_diff_eq!(result.tier1.energy.0, 600.0, epsilon = 1e-9);
        assert_eq!(result.tier2.energy, KilowattHours::ZERO);
        assert_eq!(result.tier2.cost, Cost::ZERO);
    }

    #[test]
    fn test_tou_scales_all_components_uniformly() {
        // A single Monday: hours 0 and 22 off-peak, 12 mid-peak, 8 and 18
        // on-peak, one kilowatt-hour each.
        let readings: Vec<Reading> = [0, 8, 12, 18, 22]
            .into_iter()
            .map(|hour| {
                let timestamp = NaiveDate::from_ymd_opt(2026, 2, 9)
                    .unwrap()
                    .and_hms_opt(hour, 0, 0)
                    .unwrap();
                Reading::new(timestamp, KilowattHours(1.0))
            })
            .collect();
        let statistics = UsageStatistics::try_from_readings(&readings).unwrap();
        let result = TouResult::try_new(&TouRates::default(), &statistics).unwrap();

        assert_abs_diff_eq!(result.off_peak.energy.0, 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.mid_peak.energy.0, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.on_peak.energy.0, 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.monthly_energy.0, 150.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            result.total_cost.0,
            (2.0 * 0.098 + 1.0 * 0.157 + 2.0 * 0.203) * 30.0,
            epsilon = 1e-9,
        );
    }

    #[test]
    fn test_total_is_the_sum_of_the_breakdown() {
        let statistics = statistics_for_monthly(950.0);
        let results = PlanResults::try_new(&Tariff::default(), &statistics).unwrap();

        let tou_sum = results.tou.off_peak.cost + results.tou.mid_peak.cost
            + results.tou.on_peak.cost;
        assert_abs_diff_eq!(results.tou.total_cost.0, tou_sum.0, epsilon = 1e-9);

        let ulo_sum = results.ulo.ultra_low.cost
            + results.ulo.off_peak.cost
            + results.ulo.mid_peak.cost
            + results.ulo.on_peak.cost;
        assert_abs_diff_eq!(results.ulo.total_cost.0, ulo_sum.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_day_count_is_rejected() {
        let mut statistics = statistics_for_monthly(100.0);
        statistics.day_count = 0;

        assert_eq!(
            TieredResult::try_new(&TieredRates::default(), &statistics).unwrap_err(),
            AnalysisError::InvalidPeriod,
        );
        assert_eq!(
            TouResult::try_new(&TouRates::default(), &statistics).unwrap_err(),
            AnalysisError::InvalidPeriod,
        );
        assert_eq!(
            UloResult::try_new(&UloRates::default(), &statistics).unwrap_err(),
            AnalysisError::InvalidPeriod,
        );
    }

    #[test]
    fn test_raising_a_rate_never_lowers_the_cost() {
        let statistics = statistics_for_monthly(800.0);
        let baseline = TouResult::try_new(&TouRates::default(), &statistics).unwrap();
        let raised = TouResult::try_new(
            &TouRates { mid_peak: KilowattHourRate(0.257), ..TouRates::default() },
            &statistics,
        )
        .unwrap();

        assert!(raised.total_cost >= baseline.total_cost);
    }

    #[test]
    fn test_optimal_prefers_the_earliest_plan_on_ties() {
        // Midday-only usage lands in mid-peak on weekdays and off-peak on
        // weekends for both period plans; pinning those rates and the tier-1
        // rate to the same binary-exact value ties all three totals exactly.
        let flat = KilowattHourRate(0.125);
        let tariff = Tariff {
            tiered: TieredRates { tier1_rate: flat, ..TieredRates::default() },
            tou: TouRates { off_peak: flat, mid_peak: flat, ..TouRates::default() },
            ulo: UloRates { off_peak: flat, mid_peak: flat, ..UloRates::default() },
        };
        let statistics = statistics_for_monthly(900.0);
        let results = PlanResults::try_new(&tariff, &statistics).unwrap();

        assert_eq!(results.total_cost(Plan::Tiered), results.total_cost(Plan::Tou));
        assert_eq!(results.total_cost(Plan::Tou), results.total_cost(Plan::Ulo));
        assert_eq!(results.optimal(), Plan::Tiered);
    }

    #[test]
    fn test_monthly_savings_spans_cheapest_to_priciest() {
        let statistics = statistics_for_monthly(1100.0);
        let results = PlanResults::try_new(&Tariff::default(), &statistics).unwrap();
        let costs = Plan::ALL.map(|plan| results.total_cost(plan));

        let expected = costs.into_iter().max().unwrap().0 - costs.into_iter().min().unwrap().0;
        assert_abs_diff_eq!(results.monthly_savings().0, expected, epsilon = 1e-9);
    }
}
