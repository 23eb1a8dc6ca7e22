use std::{fs, path::Path};

use askama::Template;
use bon::Builder;
use chrono::Local;
use itertools::Itertools;

use crate::{
    core::{
        analysis::Analysis,
        period::{TouPeriod, UloPeriod},
        pricing::{Charge, Plan, PlanResults},
        reading::Reading,
        validation::ValidationResult,
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
};

/// The rendered HTML report.
#[derive(Builder, Debug, Template)]
#[template(path = "report.html")]
pub struct Report {
    identifier: String,
    generated_at: String,
    start_date: String,
    end_date: String,
    total_energy: String,
    day_count: u32,
    average_daily: String,
    monthly_projection: String,
    optimal_plan: String,
    monthly_savings: String,
    plans: Vec<PlanSection>,
    insights: Vec<String>,
    validation: Option<ValidationSection>,
}

#[derive(Debug)]
pub struct PlanSection {
    key: &'static str,
    name: String,
    monthly_cost: String,
    optimal: bool,
    components: Vec<ComponentRow>,
}

#[derive(Debug)]
pub struct ComponentRow {
    label: &'static str,
    energy: String,
    cost: String,
}

#[derive(Debug)]
pub struct ValidationSection {
    actual_monthly: String,
    actual_total: String,
    period_days: u32,
    closest_plan: String,
    accuracy: String,
    rows: Vec<ValidationRow>,
}

#[derive(Debug)]
pub struct ValidationRow {
    plan: String,
    estimated: String,
    delta: String,
    accuracy: String,
}

impl Report {
    #[must_use]
    pub fn new(identifier: &str, readings: &[Reading], analysis: &Analysis) -> Self {
        let statistics = &analysis.statistics;
        let (start, end) = match readings.iter().map(|reading| reading.timestamp).minmax() {
            itertools::MinMaxResult::NoElements => (None, None),
            itertools::MinMaxResult::OneElement(only) => (Some(only), Some(only)),
            itertools::MinMaxResult::MinMax(start, end) => (Some(start), Some(end)),
        };
        let format_date =
            |timestamp: Option<chrono::NaiveDateTime>| match timestamp {
                Some(timestamp) => timestamp.format("%B %d, %Y").to_string(),
                None => "n/a".to_owned(),
            };

        Self::builder()
            .identifier(identifier.to_owned())
            .generated_at(Local::now().format("%B %d, %Y at %H:%M").to_string())
            .start_date(format_date(start))
            .end_date(format_date(end))
            .total_energy(statistics.total_energy.to_string())
            .day_count(statistics.day_count)
            .average_daily(statistics.average_daily().to_string())
            .monthly_projection(
                statistics
                    .try_monthly_projection()
                    .unwrap_or(KilowattHours::ZERO)
                    .to_string(),
            )
            .optimal_plan(analysis.optimal.to_string())
            .monthly_savings(analysis.results.monthly_savings().to_string())
            .plans(plan_sections(&analysis.results, analysis.optimal))
            .insights(insights(analysis))
            .maybe_validation(analysis.validation.as_ref().map(validation_section))
            .build()
    }

    pub fn write_to(&self, path: &Path) -> Result {
        let html = self.render().context("failed to render the report")?;
        fs::write(path, html)
            .with_context(|| format!("failed to write the report to `{}`", path.display()))
    }
}

fn plan_sections(results: &PlanResults, optimal: Plan) -> Vec<PlanSection> {
    let section = |plan: Plan, components: &[(&'static str, Charge)]| PlanSection {
        key: plan.key(),
        name: plan.to_string(),
        monthly_cost: results.total_cost(plan).to_string(),
        optimal: plan == optimal,
        components: components
            .iter()
            .map(|(label, charge)| ComponentRow {
                label,
                energy: charge.energy.to_string(),
                cost: charge.cost.to_string(),
            })
            .collect(),
    };
    vec![
        section(Plan::Tiered, &results.tiered.components()),
        section(Plan::Tou, &results.tou.components()),
        section(Plan::Ulo, &results.ulo.components()),
    ]
}

fn validation_section(validation: &ValidationResult) -> ValidationSection {
    ValidationSection {
        actual_monthly: validation.actual.monthly.to_string(),
        actual_total: validation.actual.total.to_string(),
        period_days: validation.actual.period_days,
        closest_plan: validation.closest_plan.to_string(),
        accuracy: format!("{:.1}%", validation.accuracy),
        rows: validation
            .comparisons
            .iter()
            .map(|(plan, comparison)| ValidationRow {
                plan: plan.to_string(),
                estimated: (validation.actual.monthly + comparison.delta).to_string(),
                delta: comparison.delta.to_string(),
                accuracy: format!("{:.1}%", comparison.accuracy),
            })
            .collect(),
    }
}

/// Reading of the usage pattern in plain sentences.
fn insights(analysis: &Analysis) -> Vec<String> {
    let statistics = &analysis.statistics;
    let results = &analysis.results;
    let mut insights = Vec::new();

    if statistics.total_energy > KilowattHours::ZERO {
        let ultra_low_share =
            statistics.ulo_energy(UloPeriod::UltraLow).0 / statistics.total_energy.0 * 100.0;
        if ultra_low_share > 25.0 {
            insights.push(format!(
                "Overnight usage (11PM-7AM) represents {ultra_low_share:.1}% of total \
                 consumption, making the ULO plan particularly beneficial.",
            ));
        } else if ultra_low_share < 10.0 {
            insights.push(format!(
                "Overnight usage (11PM-7AM) is relatively low at {ultra_low_share:.1}% of total \
                 consumption.",
            ));
        }

        let on_peak_share =
            statistics.tou_energy(TouPeriod::OnPeak).0 / statistics.total_energy.0 * 100.0;
        if on_peak_share > 30.0 {
            insights.push(format!(
                "High on-peak usage ({on_peak_share:.1}% during 7-11AM and 5-7PM weekdays) \
                 increases costs on time-based plans.",
            ));
        } else {
            insights.push(format!(
                "On-peak usage is well-managed at {on_peak_share:.1}% of total consumption.",
            ));
        }
    }

    let weekday_average = statistics.weekday.energy / f64::from(statistics.weekday.day_count.max(1));
    let weekend_average = statistics.weekend.energy / f64::from(statistics.weekend.day_count.max(1));
    if weekend_average > weekday_average * 1.2 {
        insights.push(format!(
            "Weekend consumption is {:.1}% higher than weekdays, benefiting from weekend \
             off-peak rates.",
            (weekend_average.0 / weekday_average.0 - 1.0) * 100.0,
        ));
    } else if weekday_average > weekend_average * 1.2 {
        insights.push(format!(
            "Weekday consumption is {:.1}% higher than weekends.",
            (weekday_average.0 / weekend_average.0 - 1.0) * 100.0,
        ));
    }

    let tiered = &results.tiered;
    if tiered.tier2.energy > KilowattHours::ZERO {
        insights.push(format!(
            "Projected monthly usage of {:.0} kWh exceeds the {:.0} kWh tier threshold, \
             resulting in {:.0} kWh at the higher tier rate.",
            tiered.monthly_energy.0, tiered.tier1.energy.0, tiered.tier2.energy.0,
        ));
    } else {
        insights.push(format!(
            "Projected monthly usage of {:.0} kWh stays within the lower tier threshold.",
            tiered.monthly_energy.0,
        ));
    }

    let mut costs: Vec<(Plan, Cost)> =
        Plan::ALL.into_iter().map(|plan| (plan, results.total_cost(plan))).collect();
    costs.sort_by_key(|(_, cost)| *cost);
    let runner_up_gap = costs[1].1 - costs[0].1;
    if runner_up_gap < Cost(5.0) {
        insights.push(format!(
            "The cost difference between {} and {} is minimal ({}/month).",
            costs[0].0, costs[1].0, runner_up_gap,
        ));
    } else {
        insights.push(format!(
            "Switching to {} provides clear cost savings of {}/month compared to the most \
             expensive option.",
            analysis.optimal,
            results.monthly_savings(),
        ));
    }

    if let Some(validation) = &analysis.validation {
        let accuracy = validation.accuracy;
        if accuracy >= 95.0 {
            insights.push(format!(
                "Cost estimates are highly accurate ({accuracy:.1}% match with actual billing \
                 data).",
            ));
        } else if accuracy >= 90.0 {
            insights.push(format!(
                "Cost estimates show good accuracy ({accuracy:.1}% match with actual billing \
                 data).",
            ));
        } else {
            insights.push(format!(
                "Cost estimates show some deviation from actual billing data ({accuracy:.1}% \
                 match). This may be due to additional fees or rate changes.",
            ));
        }
    }

    insights
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::core::{tariff::Tariff, validation::BilledHour};

    fn sample_analysis(billed: Option<&[BilledHour]>) -> (Vec<Reading>, Analysis) {
        let readings: Vec<Reading> = (0..24)
            .map(|hour| {
                let timestamp = NaiveDate::from_ymd_opt(2026, 2, 9)
                    .unwrap()
                    .and_hms_opt(hour, 0, 0)
                    .unwrap();
                Reading::new(timestamp, KilowattHours(1.0))
            })
            .collect();
        let analysis = Analysis::try_new(&Tariff::default(), &readings, billed).unwrap();
        (readings, analysis)
    }

    #[test]
    fn test_report_renders() {
        let (readings, analysis) = sample_analysis(None);
        let html = Report::new("home", &readings, &analysis).render().unwrap();

        assert!(html.contains("home"));
        assert!(html.contains("February 09, 2026"));
        assert!(html.contains("Tiered"));
        assert!(html.contains("ULO"));
        assert!(!html.contains("Validation"));
    }

    #[test]
    fn test_report_includes_validation_when_billed() {
        let billed = [BilledHour::new(
            NaiveDate::from_ymd_opt(2026, 2, 9).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            Cost(2.4),
        )];
        let (readings, analysis) = sample_analysis(Some(&billed));
        let html = Report::new("home", &readings, &analysis).render().unwrap();

        assert!(html.contains("Validation"));
        assert!(html.contains("$72.00"));
    }

    #[test]
    fn test_insights_flag_the_tier_threshold() {
        let (_, analysis) = sample_analysis(None);
        // 24 kWh per day projects to 720 kWh, under the 1000 kWh limit.
        assert!(
            insights(&analysis)
                .iter()
                .any(|insight| insight.contains("stays within the lower tier threshold")),
        );
    }
}
