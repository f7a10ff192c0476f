pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::domains::DomainsCommand;
use crate::cli::subscriptions::SubsCommand;
use crate::core::config::{AppConfig, BudgetConfig};
use crate::core::currency::Currency;
use crate::core::rates::ExchangeRateProvider;
use crate::core::state::Tracker;
use crate::providers::ExchangeRateApiProvider;
use crate::store::RecordStores;
use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Summary {
        currency: Option<Currency>,
        years: Option<u32>,
    },
    Subs(SubsCommand),
    Domains(DomainsCommand),
    Rates {
        currency: Option<Currency>,
        amount: Option<f64>,
        filter: Option<String>,
    },
    Budget {
        amount: Option<f64>,
        currency: Option<Currency>,
        year: Option<i32>,
    },
}

/// Rates are fetched fresh for every command and kept in memory only.
fn rate_provider(config: &AppConfig) -> Result<Box<dyn ExchangeRateProvider + Send + Sync>> {
    let api = ExchangeRateApiProvider::new(&config.providers.exchange_rate.base_url)
        .context("Failed to create exchange rate client")?;
    Ok(Box::new(api))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("subcost starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let data_path = config.default_data_path()?;
    let stores = RecordStores::open(&data_path)?;
    let provider = rate_provider(&config)?;

    let mut tracker = Tracker::new(stores, config.currency, config.projection_years);
    tracker.load().await;

    let today = Local::now().date_naive();
    let result = match command {
        AppCommand::Summary { currency, years } => {
            cli::summary::run(&mut tracker, provider.as_ref(), currency, years).await
        }
        AppCommand::Subs(cmd) => cli::subscriptions::run(&mut tracker, provider.as_ref(), cmd).await,
        AppCommand::Domains(cmd) => cli::domains::run(&mut tracker, cmd, today).await,
        AppCommand::Rates {
            currency,
            amount,
            filter,
        } => cli::rates::run(&mut tracker, provider.as_ref(), currency, amount, filter).await,
        AppCommand::Budget {
            amount,
            currency,
            year,
        } => {
            let budget = BudgetConfig {
                amount: amount.unwrap_or(config.budget.amount),
                currency: currency.unwrap_or(config.budget.currency),
            };
            let year = year.unwrap_or_else(|| today.year());
            cli::budget::run(&mut tracker, provider.as_ref(), &budget, year).await
        }
    };

    cli::ui::print_notices(&tracker.take_notices());
    result
}
