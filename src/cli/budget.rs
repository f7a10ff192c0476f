use super::ui;
use crate::core::analytics::{MonthlyUsage, budget_usage, convert_budget};
use crate::core::config::BudgetConfig;
use crate::core::currency::{Currency, format_currency};
use crate::core::rates::ExchangeRateProvider;
use crate::core::state::Tracker;
use anyhow::Result;
use comfy_table::Cell;

pub fn display_usage(usage: &[MonthlyUsage], display: Currency) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell("Added"),
        ui::header_cell("Cumulative"),
        ui::header_cell("Budget used"),
    ]);
    for month in usage {
        table.add_row(vec![
            Cell::new(month.month),
            ui::money_cell(month.total, display),
            ui::money_cell(month.cumulative, display),
            ui::usage_cell(month.percent),
        ]);
    }
    table.to_string()
}

pub async fn run(
    tracker: &mut Tracker,
    provider: &(dyn ExchangeRateProvider + Send + Sync),
    budget: &BudgetConfig,
    year: i32,
) -> Result<()> {
    super::fetch_rates(tracker, provider).await;

    let display = tracker.display_currency();
    let table = tracker.rate_table();
    let monthly_budget = convert_budget(budget.amount, budget.currency, display, &table);
    let usage = budget_usage(tracker.subscriptions(), display, &table, monthly_budget, year);

    println!(
        "{} {}\n",
        ui::style_text(&format!("Budget usage {year}"), ui::StyleType::Title),
        ui::style_text(
            &format!("(monthly budget {})", format_currency(monthly_budget, display)),
            ui::StyleType::Subtle
        )
    );
    println!("{}", display_usage(&usage, display));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::RateTable;
    use crate::core::period::BillingPeriod;
    use crate::core::subscription::Subscription;

    #[test]
    fn test_display_usage_lists_all_months() {
        let subs = vec![Subscription::new(
            "Gym",
            50.0,
            Currency::Usd,
            BillingPeriod::Monthly,
        )];
        let usage = budget_usage(&subs, Currency::Usd, &RateTable::fallback(), 500.0, 2025);
        let output = display_usage(&usage, Currency::Usd);

        assert!(output.contains("Jan"));
        assert!(output.contains("Dec"));
        assert!(output.contains("10.00%"));
        assert!(output.contains("$50.00"));
    }
}
