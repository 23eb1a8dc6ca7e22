use chrono::NaiveDateTime;
use itertools::Itertools;

use crate::{
    core::{
        error::AnalysisError,
        pricing::{PerPlan, Plan, PlanResults},
    },
    quantity::cost::Cost,
};

/// One hour of billed spend from the utility's billing export.
#[derive(Clone, Copy, Debug, PartialEq, derive_more::Constructor)]
pub struct BilledHour {
    pub timestamp: NaiveDateTime,
    pub cost: Cost,
}

/// Billed spend over the observation window, projected to a 30-day month.
#[derive(Clone, Copy, Debug)]
pub struct ActualCost {
    pub total: Cost,

    /// Days spanned by the billing window, inclusive of both endpoints.
    /// May exceed the distinct-day count when days in between have no
    /// readings.
    pub period_days: u32,

    pub monthly: Cost,
}

impl ActualCost {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn try_from_billed(billed: &[BilledHour]) -> Result<Self, AnalysisError> {
        let (first, last) = billed
            .iter()
            .map(|hour| hour.timestamp.date())
            .minmax()
            .into_option()
            .ok_or(AnalysisError::EmptyDataset)?;
        let total: Cost = billed.iter().map(|hour| hour.cost).sum();
        let period_days = ((last - first).num_days() + 1) as u32;
        Ok(Self { total, period_days, monthly: total / f64::from(period_days) * 30.0 })
    }
}

/// How far one plan's estimate landed from the billed cost.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlanComparison {
    /// Estimated monthly cost minus actual monthly cost.
    pub delta: Cost,

    /// `100 − |delta / actual| × 100`; 100 is a perfect match.
    pub accuracy: f64,
}

/// Outcome of checking the estimates against billed actuals.
#[derive(Clone, Copy, Debug)]
pub struct ValidationResult {
    pub actual: ActualCost,

    /// The plan whose accuracy is closest to 100.
    pub closest_plan: Plan,
    pub closest_plan_cost: Cost,
    pub accuracy: f64,

    pub comparisons: PerPlan<PlanComparison>,
}

impl ValidationResult {
    /// Ties in closeness keep the earliest plan in [`Plan::ALL`] order.
    pub fn try_new(actual: ActualCost, results: &PlanResults) -> Result<Self, AnalysisError> {
        if actual.monthly == Cost::ZERO {
            return Err(AnalysisError::InvalidPeriod);
        }

        let compare = |plan: Plan| {
            let delta = results.total_cost(plan) - actual.monthly;
            PlanComparison {
                delta,
                accuracy: 100.0 - (delta.0 / actual.monthly.0 * 100.0).abs(),
            }
        };
        let comparisons = PerPlan {
            tiered: compare(Plan::Tiered),
            tou: compare(Plan::Tou),
            ulo: compare(Plan::Ulo),
        };

        let mut closest = Plan::Tiered;
        for plan in [Plan::Tou, Plan::Ulo] {
            if (100.0 - comparisons.get(plan).accuracy).abs()
                < (100.0 - comparisons.get(closest).accuracy).abs()
            {
                closest = plan;
            }
        }

        Ok(Self {
            actual,
            closest_plan: closest,
            closest_plan_cost: results.total_cost(closest),
            accuracy: comparisons.get(closest).accuracy,
            comparisons,
        })
    }
}
