//! Cost calculations over a list of subscriptions.
//!
//! Everything here is a pure function of the subscriptions, the display
//! currency and a rate table snapshot. Values are rendered straight to users,
//! so every derived figure falls back to 0 instead of NaN or infinity.
use crate::core::currency::{Currency, RateTable};
use crate::core::subscription::Subscription;
use chrono::Datelike;

/// Reference price of a vacation, in the base currency.
pub const VACATION_COST_BASE: f64 = 3000.0;
/// Reference price of a cup of coffee, in the base currency.
pub const COFFEE_PRICE_BASE: f64 = 3.0;

pub const MIN_PROJECTION_YEARS: u32 = 1;
pub const MAX_PROJECTION_YEARS: u32 = 50;

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn clamp_projection_years(years: u32) -> u32 {
    years.clamp(MIN_PROJECTION_YEARS, MAX_PROJECTION_YEARS)
}

/// Yearly cost of one subscription expressed in `display`.
pub fn yearly_cost(sub: &Subscription, display: Currency, table: &RateTable) -> f64 {
    let price = table.convert(sub.price, sub.currency, display);
    finite_or_zero(price * sub.period.multiplier())
}

pub fn total_yearly(subs: &[Subscription], display: Currency, table: &RateTable) -> f64 {
    subs.iter().map(|s| yearly_cost(s, display, table)).sum()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostTotals {
    pub yearly: f64,
    pub monthly: f64,
    pub projection: f64,
    pub years: u32,
}

/// Yearly and monthly totals plus the total over `years` (clamped to 1..=50).
pub fn total_costs(
    subs: &[Subscription],
    display: Currency,
    table: &RateTable,
    years: u32,
) -> CostTotals {
    let years = clamp_projection_years(years);
    let yearly = total_yearly(subs, display, table);
    CostTotals {
        yearly,
        monthly: yearly / 12.0,
        projection: yearly * f64::from(years),
        years,
    }
}

/// The "reality check" figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insights {
    pub daily_cost: f64,
    /// Every how many years the subscriptions add up to a vacation.
    pub vacation_equivalent_years: u32,
    pub coffee_per_day: u32,
}

pub fn insights(subs: &[Subscription], display: Currency, table: &RateTable) -> Insights {
    let yearly = total_yearly(subs, display, table);
    if yearly <= 0.0 || !yearly.is_finite() {
        return Insights {
            daily_cost: 0.0,
            vacation_equivalent_years: 0,
            coffee_per_day: 0,
        };
    }

    let vacation = table.convert(VACATION_COST_BASE, Currency::BASE, display);
    let coffee = table.convert(COFFEE_PRICE_BASE, Currency::BASE, display);

    Insights {
        daily_cost: yearly / 365.0,
        vacation_equivalent_years: finite_or_zero((vacation / yearly).ceil()) as u32,
        coffee_per_day: finite_or_zero((yearly / (coffee * 365.0)).floor()) as u32,
    }
}

/// One row of the per-subscription breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionCost {
    pub name: String,
    pub price: f64,
    pub currency: Currency,
    pub yearly_cost: f64,
    pub monthly_cost: f64,
    /// Share of the yearly total in percent; `None` when the total is 0.
    pub share: Option<f64>,
}

pub fn cost_breakdown(
    subs: &[Subscription],
    display: Currency,
    table: &RateTable,
) -> Vec<SubscriptionCost> {
    let total = total_yearly(subs, display, table);
    subs.iter()
        .map(|sub| {
            let yearly = yearly_cost(sub, display, table);
            SubscriptionCost {
                name: sub.name.clone(),
                price: sub.price,
                currency: sub.currency,
                yearly_cost: yearly,
                monthly_cost: yearly / 12.0,
                share: (total > 0.0).then(|| (yearly / total) * 100.0),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyUsage {
    pub month: &'static str,
    /// Monthly cost of the subscriptions added in this month.
    pub total: f64,
    /// Running sum of `total` since January.
    pub cumulative: f64,
    /// `cumulative` as a percentage of the monthly budget, 2 decimals.
    pub percent: f64,
}

/// Share of a monthly budget consumed by subscriptions, month by month.
///
/// A subscription counts from the month it was created in `year`; ones
/// without a creation date count from January and ones created in another
/// year are left out.
pub fn budget_usage(
    subs: &[Subscription],
    display: Currency,
    table: &RateTable,
    budget: f64,
    year: i32,
) -> Vec<MonthlyUsage> {
    let mut totals = [0.0_f64; 12];
    for sub in subs {
        let month = match sub.created_at {
            Some(created) if created.year() == year => created.month0() as usize,
            Some(_) => continue,
            None => 0,
        };
        totals[month] += yearly_cost(sub, display, table) / 12.0;
    }

    let mut cumulative = 0.0;
    MONTHS
        .into_iter()
        .zip(totals)
        .map(|(month, total)| {
            cumulative += total;
            let percent = if budget > 0.0 && budget.is_finite() {
                round2(cumulative / budget * 100.0)
            } else {
                0.0
            };
            MonthlyUsage {
                month,
                total,
                cumulative,
                percent,
            }
        })
        .collect()
}

/// Re-expresses a budget in another currency, rounded to cents.
pub fn convert_budget(amount: f64, from: Currency, to: Currency, table: &RateTable) -> f64 {
    finite_or_zero(round2(table.convert(amount, from, to)))
}
