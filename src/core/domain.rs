//! Domain renewals and expiry classification.

use crate::core::currency::parse_amount;
use crate::core::store::Record;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub const DEFAULT_PROVIDER: &str = "Cloudflare";

/// Days ahead within which a domain is flagged for renewal.
pub const EXPIRING_SOON_DAYS: i64 = 30;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub expiry_date: NaiveDate,
    pub renewal_cost: String,
    #[serde(default)]
    pub auto_renewal: bool,
}

impl Domain {
    /// Creates a domain with a fresh id. Blank provider and renewal cost fall
    /// back to `Cloudflare` and `"0"`.
    pub fn new(
        name: &str,
        provider: &str,
        expiry_date: NaiveDate,
        renewal_cost: &str,
        auto_renewal: bool,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            provider: provider_or_default(provider),
            expiry_date,
            renewal_cost: renewal_cost_or_zero(renewal_cost),
            auto_renewal,
        }
    }

    pub fn renewal_cost_value(&self) -> f64 {
        parse_amount(&self.renewal_cost)
    }

    pub fn days_left(&self, today: NaiveDate) -> i64 {
        days_until_expiry(self.expiry_date, today)
    }

    pub fn status(&self, today: NaiveDate) -> ExpiryStatus {
        ExpiryStatus::from_days(self.days_left(today))
    }
}

fn provider_or_default(provider: &str) -> String {
    match provider.trim() {
        "" => DEFAULT_PROVIDER.to_string(),
        p => p.to_string(),
    }
}

fn renewal_cost_or_zero(renewal_cost: &str) -> String {
    match renewal_cost.trim() {
        "" => "0".to_string(),
        c => c.to_string(),
    }
}

/// Fields to replace on an existing domain. Blank provider and renewal cost
/// get the same defaults as `Domain::new`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainPatch {
    pub name: Option<String>,
    pub provider: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub renewal_cost: Option<String>,
    pub auto_renewal: Option<bool>,
}

impl Record for Domain {
    type Patch = DomainPatch;

    fn key(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &DomainPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(provider) = &patch.provider {
            self.provider = provider_or_default(provider);
        }
        if let Some(expiry_date) = patch.expiry_date {
            self.expiry_date = expiry_date;
        }
        if let Some(renewal_cost) = &patch.renewal_cost {
            self.renewal_cost = renewal_cost_or_zero(renewal_cost);
        }
        if let Some(auto_renewal) = patch.auto_renewal {
            self.auto_renewal = auto_renewal;
        }
    }
}

/// Whole days from `now` until the start of `expiry`, rounded up.
/// Negative once the date has passed.
pub fn days_until_expiry_at(expiry: NaiveDate, now: NaiveDateTime) -> i64 {
    let diff_ms = (expiry.and_time(NaiveTime::default()) - now).num_milliseconds();
    let days = diff_ms.div_euclid(DAY_MS);
    if diff_ms.rem_euclid(DAY_MS) != 0 {
        days + 1
    } else {
        days
    }
}

/// Calendar days between `today` and `expiry`.
pub fn days_until_expiry(expiry: NaiveDate, today: NaiveDate) -> i64 {
    days_until_expiry_at(expiry, today.and_time(NaiveTime::default()))
}

pub fn is_expiring_soon(days_left: i64) -> bool {
    (0..=EXPIRING_SOON_DAYS).contains(&days_left)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    Expired,
    Critical,
    Warning,
    Attention,
    Safe,
}

impl ExpiryStatus {
    pub fn from_days(days_left: i64) -> Self {
        match days_left {
            d if d < 0 => ExpiryStatus::Expired,
            d if d <= 1 => ExpiryStatus::Critical,
            d if d <= 7 => ExpiryStatus::Warning,
            d if d <= EXPIRING_SOON_DAYS => ExpiryStatus::Attention,
            _ => ExpiryStatus::Safe,
        }
    }
}

impl Display for ExpiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ExpiryStatus::Expired => "Expired",
                ExpiryStatus::Critical => "Critical",
                ExpiryStatus::Warning => "Warning",
                ExpiryStatus::Attention => "Attention",
                ExpiryStatus::Safe => "Safe",
            }
        )
    }
}

/// Domains expiring within the next 30 days, soonest first.
pub fn expiring_domains(domains: &[Domain], today: NaiveDate) -> Vec<&Domain> {
    let mut expiring: Vec<&Domain> = domains
        .iter()
        .filter(|d| is_expiring_soon(d.days_left(today)))
        .collect();
    expiring.sort_by_key(|d| d.days_left(today));
    expiring
}
