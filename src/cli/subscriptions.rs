use super::ui;
use crate::core::analytics;
use crate::core::currency::{Currency, RateTable};
use crate::core::period::BillingPeriod;
use crate::core::rates::ExchangeRateProvider;
use crate::core::state::Tracker;
use crate::core::subscription::{
    Subscription, SubscriptionPatch, find_popular_service, popular_services,
};
use anyhow::Result;
use comfy_table::Cell;

#[derive(Debug, Clone, PartialEq)]
pub enum SubsCommand {
    List,
    Popular,
    Add {
        name: String,
        price: f64,
        currency: Currency,
        period: BillingPeriod,
    },
    AddPopular {
        name: String,
    },
    Edit {
        name: String,
        patch: SubscriptionPatch,
    },
    Remove {
        name: String,
    },
}

pub fn display_subscriptions(
    subs: &[Subscription],
    display: Currency,
    table: &RateTable,
) -> String {
    let mut output = ui::new_styled_table();
    output.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("Price"),
        ui::header_cell("Billing"),
        ui::header_cell(&format!("Yearly ({display})")),
        ui::header_cell("Added"),
    ]);
    for sub in subs {
        output.add_row(vec![
            Cell::new(&sub.name),
            ui::money_cell(sub.price, sub.currency),
            Cell::new(sub.period),
            ui::money_cell(analytics::yearly_cost(sub, display, table), display),
            ui::format_optional_cell(sub.created_at, |at| at.format("%Y-%m-%d").to_string()),
        ]);
    }
    output.to_string()
}

pub fn display_popular() -> String {
    let mut output = ui::new_styled_table();
    output.set_header(vec![
        ui::header_cell("Service"),
        ui::header_cell("Price"),
        ui::header_cell("Billing"),
    ]);
    for sub in popular_services() {
        output.add_row(vec![
            Cell::new(&sub.name),
            ui::money_cell(sub.price, sub.currency),
            Cell::new(sub.period),
        ]);
    }
    output.to_string()
}

pub async fn run(
    tracker: &mut Tracker,
    provider: &(dyn ExchangeRateProvider + Send + Sync),
    command: SubsCommand,
) -> Result<()> {
    match command {
        SubsCommand::List => {
            if tracker.subscriptions().is_empty() {
                println!(
                    "{}",
                    ui::style_text("No subscriptions yet.", ui::StyleType::Subtle)
                );
                return Ok(());
            }
            super::fetch_rates(tracker, provider).await;
            println!(
                "{}",
                display_subscriptions(
                    tracker.subscriptions(),
                    tracker.display_currency(),
                    &tracker.rate_table()
                )
            );
        }
        SubsCommand::Popular => println!("{}", display_popular()),
        SubsCommand::Add {
            name,
            price,
            currency,
            period,
        } => {
            tracker
                .add_subscription(Subscription::new(&name, price, currency, period))
                .await;
        }
        SubsCommand::AddPopular { name } => match find_popular_service(&name) {
            Some(sub) => {
                tracker.add_subscription(sub).await;
            }
            None => anyhow::bail!(
                "Unknown service: {}. Run `subs popular` to see the list.",
                name
            ),
        },
        SubsCommand::Edit { name, patch } => {
            if patch.is_empty() {
                anyhow::bail!("Nothing to change for {}", name);
            }
            if tracker.update_subscription(&name, patch).await {
                println!("Updated {name}");
            }
        }
        SubsCommand::Remove { name } => {
            tracker.remove_subscription(&name).await;
        }
    }
    Ok(())
}
