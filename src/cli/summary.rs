use super::ui;
use crate::core::analytics::{CostTotals, Insights, SubscriptionCost};
use crate::core::currency::{Currency, format_currency};
use crate::core::rates::ExchangeRateProvider;
use crate::core::state::Tracker;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

/// Per-subscription costs in the display currency.
pub fn display_costs_table(costs: &[SubscriptionCost], display: Currency) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Subscription"),
        ui::header_cell("Price"),
        ui::header_cell(&format!("Monthly ({display})")),
        ui::header_cell(&format!("Yearly ({display})")),
        ui::header_cell("Share (%)"),
    ]);

    for cost in costs {
        table.add_row(vec![
            Cell::new(&cost.name),
            ui::money_cell(cost.price, cost.currency),
            ui::money_cell(cost.monthly_cost, display),
            ui::money_cell(cost.yearly_cost, display),
            ui::format_optional_cell(cost.share, |s| format!("{s:.2}%")),
        ]);
    }
    table.to_string()
}

pub fn display_totals(totals: &CostTotals, display: Currency) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Period"), ui::header_cell("Total")]);
    let years = totals.years;
    let year_label = if years == 1 { "year" } else { "years" };
    for (label, amount) in [
        ("Monthly".to_string(), totals.monthly),
        ("Yearly".to_string(), totals.yearly),
        (format!("{years} {year_label}"), totals.projection),
    ] {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format_currency(amount, display)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

/// The reality check: what the subscriptions add up to in everyday terms.
pub fn display_insights(insights: &Insights, display: Currency) -> String {
    format!(
        "{}\n\n  {} per day\n  A vacation every {} year(s)\n  {} coffee(s) every day",
        ui::style_text("Reality check", ui::StyleType::Title),
        ui::style_text(
            &format_currency(insights.daily_cost, display),
            ui::StyleType::TotalValue
        ),
        insights.vacation_equivalent_years,
        insights.coffee_per_day,
    )
}

pub async fn run(
    tracker: &mut Tracker,
    provider: &(dyn ExchangeRateProvider + Send + Sync),
    currency: Option<Currency>,
    years: Option<u32>,
) -> Result<()> {
    if let Some(currency) = currency {
        tracker.set_display_currency(currency);
    }
    if let Some(years) = years {
        tracker.set_projection_years(years);
    }
    super::fetch_rates(tracker, provider).await;

    let display = tracker.display_currency();
    if tracker.subscriptions().is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No subscriptions yet. Add one with `subs add` or `subs add-popular`.",
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    }

    println!(
        "{}\n",
        ui::style_text("Subscriptions", ui::StyleType::Title)
    );
    println!("{}", display_costs_table(&tracker.cost_breakdown(), display));
    println!("\n{}", display_totals(&tracker.totals(), display));
    ui::print_separator();
    println!("{}", display_insights(&tracker.insights(), display));
    Ok(())
}
