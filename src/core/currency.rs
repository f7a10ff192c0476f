//! Supported currencies and the base-pivoted rate table.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, warn};

/// Currencies the cost engine can convert between.
///
/// Adding a currency means adding a variant here; `code`, `symbol` and
/// `fallback_rate` are exhaustive matches, so the compiler points at every
/// place that needs a value for it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "UAH")]
    Uah,
}

impl Currency {
    /// All rates are quoted relative to this currency.
    pub const BASE: Currency = Currency::Usd;

    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Uah];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Uah => "UAH",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Uah => "₴",
        }
    }

    /// Approximate base-currency value of one unit, used until a fetch succeeds.
    pub fn fallback_rate(&self) -> f64 {
        match self {
            Currency::Usd => 1.0,
            Currency::Eur => 1.08,
            Currency::Uah => 0.025,
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "UAH" => Ok(Currency::Uah),
            _ => Err(anyhow!("Unsupported currency: {}", s)),
        }
    }
}

/// Provider quotes: units of `code` per one unit of the base currency.
pub type Quotes = HashMap<String, f64>;

/// Immutable snapshot of conversion rates.
///
/// `rate(code)` is the base-currency value of one unit of `code`, so the base
/// itself is always 1. Conversions pivot through the base.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: HashMap<Currency, f64>,
    fetched_at: Option<DateTime<Utc>>,
}

impl RateTable {
    pub fn fallback() -> Self {
        let rates = Currency::ALL
            .iter()
            .map(|c| (*c, c.fallback_rate()))
            .collect();
        Self {
            rates,
            fetched_at: None,
        }
    }

    /// Builds a table from explicit rates. Missing currencies convert at 1.
    pub fn from_rates(rates: impl IntoIterator<Item = (Currency, f64)>) -> Self {
        let mut rates: HashMap<Currency, f64> = rates.into_iter().collect();
        rates.insert(Currency::BASE, 1.0);
        Self {
            rates,
            fetched_at: None,
        }
    }

    /// Returns a new table with every usable provider quote inverted into a
    /// rate. Currencies without a usable quote keep their current rate.
    pub fn with_quotes(&self, quotes: &Quotes) -> Self {
        let mut rates = self.rates.clone();
        for currency in Currency::ALL {
            match quotes.get(currency.code()) {
                Some(quote) if quote.is_finite() && *quote > 0.0 => {
                    rates.insert(currency, 1.0 / quote);
                }
                Some(quote) => {
                    warn!("Ignoring unusable quote {} for {}", quote, currency);
                }
                None => {
                    debug!("No quote for {}, keeping previous rate", currency);
                }
            }
        }
        rates.insert(Currency::BASE, 1.0);
        Self {
            rates,
            fetched_at: Some(Utc::now()),
        }
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn rate(&self, currency: Currency) -> f64 {
        match self.rates.get(&currency) {
            Some(rate) => *rate,
            None => {
                debug!("No rate for {}, converting at 1", currency);
                1.0
            }
        }
    }

    pub fn to_base(&self, amount: f64, from: Currency) -> f64 {
        amount * self.rate(from)
    }

    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        if from == to {
            return amount;
        }
        self.to_base(amount, from) / self.rate(to)
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::fallback()
    }
}

pub fn format_currency(amount: f64, currency: Currency) -> String {
    format!("{}{:.2}", currency.symbol(), amount)
}

/// Lenient amount parsing for user input. Anything that is not a finite,
/// non-negative number becomes 0.
pub fn parse_amount(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        Ok(value) => {
            debug!("Amount {} out of range, using 0", value);
            0.0
        }
        Err(_) => {
            debug!("Amount {:?} is not a number, using 0", text);
            0.0
        }
    }
}

/// Reads a subscription price without clamping it. Text that is not a number
/// becomes NaN, so `Tracker` stores it as 0 and warns about it.
pub fn parse_price(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// One row of the rates view.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRow {
    pub code: String,
    pub value: f64,
}

/// Values `amount` units of `display` in every quoted currency.
///
/// Quotes are relative to the base, so the amount is first expressed in the
/// base and then multiplied by each quote.
pub fn quote_board(
    table: &RateTable,
    quotes: &Quotes,
    display: Currency,
    amount: f64,
    filter: &str,
) -> Vec<QuoteRow> {
    let amount = if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        1.0
    };
    let filter = filter.trim().to_lowercase();
    let in_base = table.to_base(amount, display);

    let mut rows: Vec<QuoteRow> = quotes
        .iter()
        .filter(|(code, _)| code.as_str() != display.code())
        .filter(|(code, _)| filter.is_empty() || code.to_lowercase().contains(&filter))
        .filter(|(_, quote)| quote.is_finite() && **quote > 0.0)
        .map(|(code, quote)| QuoteRow {
            code: code.clone(),
            value: in_base * quote,
        })
        .collect();
    rows.sort_by(|a, b| a.code.cmp(&b.code));
    rows
}
