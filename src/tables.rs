use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        period::{TouPeriod, UloPeriod},
        pricing::{Charge, Plan, PlanResults},
        statistics::UsageStatistics,
        tariff::Tariff,
        validation::ValidationResult,
    },
    quantity::{cost::Cost, energy::KilowattHours},
};

#[must_use]
pub fn build_comparison_table(results: &PlanResults, optimal: Plan) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Plan", "Monthly energy", "Monthly cost"]);
    for plan in Plan::ALL {
        let color = if plan == optimal { Color::Green } else { Color::Reset };
        let mut plan_cell = Cell::new(plan).fg(color);
        if plan == optimal {
            plan_cell = plan_cell.add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            plan_cell,
            Cell::new(results.monthly_energy(plan)).set_alignment(CellAlignment::Right),
            Cell::new(results.total_cost(plan)).set_alignment(CellAlignment::Right).fg(color),
        ]);
    }
    table
}

#[must_use]
pub fn build_breakdown_table(results: &PlanResults) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Plan", "Component", "Energy", "Cost"]);
    let mut add_rows = |plan: Plan, components: &[(&'static str, Charge)]| {
        for (label, charge) in components {
            table.add_row(vec![
                Cell::new(plan),
                Cell::new(label),
                Cell::new(charge.energy).set_alignment(CellAlignment::Right),
                Cell::new(charge.cost).set_alignment(CellAlignment::Right),
            ]);
        }
    };
    add_rows(Plan::Tiered, &results.tiered.components());
    add_rows(Plan::Tou, &results.tou.components());
    add_rows(Plan::Ulo, &results.ulo.components());
    table
}

/// Mean hourly consumption, weekdays next to weekends. Hours above the
/// subset's own mean show red, below it green.
#[must_use]
pub fn build_hourly_profile_table(statistics: &UsageStatistics) -> Table {
    let weekday_mean = subset_mean(&statistics.weekday_hourly);
    let weekend_mean = subset_mean(&statistics.weekend_hourly);

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Hour", "Weekday", "Weekend"]);
    for hour in 0..24 {
        table.add_row(vec![
            Cell::new(hour),
            hourly_cell(statistics.weekday_hourly[hour], weekday_mean),
            hourly_cell(statistics.weekend_hourly[hour], weekend_mean),
        ]);
    }
    table
}

fn subset_mean(hourly: &[Option<KilowattHours>; 24]) -> Option<KilowattHours> {
    let present: Vec<KilowattHours> = hourly.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    Some(present.iter().copied().sum::<KilowattHours>() / present.len() as f64)
}

fn hourly_cell(energy: Option<KilowattHours>, mean: Option<KilowattHours>) -> Cell {
    energy
        .map(Cell::new)
        .unwrap_or_else(|| Cell::new("n/a"))
        .set_alignment(CellAlignment::Right)
        .fg(match (energy, mean) {
            (Some(energy), Some(mean)) if energy > mean => Color::Red,
            (Some(energy), Some(mean)) if energy < mean => Color::Green,
            _ => Color::Reset,
        })
}

#[must_use]
pub fn build_tariff_table(tariff: &Tariff) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Plan", "Period", "Rate"]);
    table.add_row(vec![
        Cell::new(Plan::Tiered),
        Cell::new(format!("Tier 1 (first {})", tariff.tiered.tier1_limit)),
        Cell::new(tariff.tiered.tier1_rate).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new(Plan::Tiered),
        Cell::new("Tier 2"),
        Cell::new(tariff.tiered.tier2_rate).set_alignment(CellAlignment::Right),
    ]);
    for period in TouPeriod::ALL {
        table.add_row(vec![
            Cell::new(Plan::Tou),
            Cell::new(period),
            Cell::new(tariff.tou.rate(period)).set_alignment(CellAlignment::Right),
        ]);
    }
    for period in UloPeriod::ALL {
        table.add_row(vec![
            Cell::new(Plan::Ulo),
            Cell::new(period),
            Cell::new(tariff.ulo.rate(period)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[must_use]
pub fn build_validation_table(validation: &ValidationResult) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Plan", "Estimated", "Delta", "Accuracy"]);
    for (plan, comparison) in validation.comparisons.iter() {
        let color = if plan == validation.closest_plan { Color::Green } else { Color::Reset };
        table.add_row(vec![
            Cell::new(plan).fg(color),
            Cell::new(validation.actual.monthly + comparison.delta)
                .set_alignment(CellAlignment::Right),
            Cell::new(comparison.delta).set_alignment(CellAlignment::Right).fg(
                if comparison.delta.abs() < Cost::ONE_CENT { Color::Green } else { Color::Reset },
            ),
            Cell::new(format!("{:.1}%", comparison.accuracy))
                .set_alignment(CellAlignment::Right)
                .fg(color),
        ]);
    }
    table
}
