use crate::core::{
    error::AnalysisError,
    pricing::{Plan, PlanResults},
    reading::Reading,
    statistics::UsageStatistics,
    tariff::Tariff,
    validation::{ActualCost, BilledHour, ValidationResult},
};

/// Complete result bundle of one analysis run, consumed verbatim by the
/// tables and the report.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub statistics: UsageStatistics,
    pub results: PlanResults,
    pub optimal: Plan,
    pub validation: Option<ValidationResult>,
}

impl Analysis {
    pub fn try_new(
        tariff: &Tariff,
        readings: &[Reading],
        billed: Option<&[BilledHour]>,
    ) -> Result<Self, AnalysisError> {
        let statistics = UsageStatistics::try_from_readings(readings)?;
        let results = PlanResults::try_new(tariff, &statistics)?;
        let validation = match billed {
            Some(billed) => {
                let actual = ActualCost::try_from_billed(billed)?;
                Some(ValidationResult::try_new(actual, &results)?)
            }
            None => None,
        };
        Ok(Self { statistics, optimal: results.optimal(), results, validation })
    }
}
