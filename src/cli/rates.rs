use super::ui;
use crate::core::currency::{Currency, QuoteRow, Quotes, RateTable, format_currency, quote_board};
use crate::core::rates::ExchangeRateProvider;
use crate::core::state::Tracker;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

/// Quotes implied by a rate table, used when no fetch has succeeded.
fn quotes_from_table(table: &RateTable) -> Quotes {
    Currency::ALL
        .iter()
        .map(|c| (c.code().to_string(), 1.0 / table.rate(*c)))
        .collect()
}

pub fn display_quote_board(rows: &[QuoteRow], display: Currency, amount: f64) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Value of {}", format_currency(amount, display))),
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.code),
            Cell::new(format!("{:.4}", row.value)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

pub async fn run(
    tracker: &mut Tracker,
    provider: &(dyn ExchangeRateProvider + Send + Sync),
    currency: Option<Currency>,
    amount: Option<f64>,
    filter: Option<String>,
) -> Result<()> {
    if let Some(currency) = currency {
        tracker.set_display_currency(currency);
    }
    super::fetch_rates(tracker, provider).await;

    let table = tracker.rate_table();
    let fetched = tracker.rates().quotes();
    let quotes = if fetched.is_empty() {
        quotes_from_table(&table)
    } else {
        (*fetched).clone()
    };

    let display = tracker.display_currency();
    let amount = amount.filter(|a| a.is_finite() && *a > 0.0).unwrap_or(1.0);
    let rows = quote_board(&table, &quotes, display, amount, filter.as_deref().unwrap_or(""));

    let updated = table
        .fetched_at()
        .map_or("built-in fallback rates".to_string(), |at| {
            format!("updated {}", at.format("%Y-%m-%d %H:%M UTC"))
        });
    println!(
        "{} {}\n",
        ui::style_text("Exchange rates", ui::StyleType::Title),
        ui::style_text(&format!("({updated})"), ui::StyleType::Subtle)
    );
    if rows.is_empty() {
        println!(
            "{}",
            ui::style_text("No currencies match the filter.", ui::StyleType::Subtle)
        );
    } else {
        println!("{}", display_quote_board(&rows, display, amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_from_fallback_table() {
        let quotes = quotes_from_table(&RateTable::fallback());
        assert_eq!(quotes.get("USD"), Some(&1.0));
        assert!((quotes["UAH"] - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_quote_board() {
        let table = RateTable::fallback();
        let quotes = quotes_from_table(&table);
        let rows = quote_board(&table, &quotes, Currency::Usd, 10.0, "");
        let output = display_quote_board(&rows, Currency::Usd, 10.0);

        assert!(output.contains("Value of $10.00"));
        assert!(output.contains("UAH"));
        assert!(output.contains("400.0000"));
        assert!(!output.contains("USD"));
    }
}
