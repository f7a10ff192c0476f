use crate::core::currency::Currency;
use crate::core::period::BillingPeriod;
use crate::core::store::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// A recurring charge. `name` is unique within a user's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub name: String,
    pub price: f64,
    #[serde(deserialize_with = "currency_or_base")]
    pub currency: Currency,
    pub period: BillingPeriod,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Stored records may carry a code this build does not know. They are read
/// as the base currency, i.e. at rate 1, so totals stay computable.
fn currency_or_base<'de, D>(deserializer: D) -> Result<Currency, D::Error>
where
    D: Deserializer<'de>,
{
    let code = String::deserialize(deserializer)?;
    Ok(code.parse().unwrap_or_else(|_| {
        warn!("Unknown currency {} on stored record, converting at 1", code);
        Currency::BASE
    }))
}

impl Subscription {
    pub fn new(name: &str, price: f64, currency: Currency, period: BillingPeriod) -> Self {
        Self {
            name: name.trim().to_string(),
            price,
            currency,
            period,
            created_at: None,
        }
    }
}

/// Fields to replace on an existing subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<Currency>,
    pub period: Option<BillingPeriod>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.currency.is_none() && self.period.is_none()
    }
}

impl Record for Subscription {
    type Patch = SubscriptionPatch;

    fn key(&self) -> &str {
        &self.name
    }

    fn apply(&mut self, patch: &SubscriptionPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(period) = patch.period {
            self.period = period;
        }
    }
}

const POPULAR_SERVICES: [(&str, f64, BillingPeriod); 10] = [
    ("Netflix", 15.49, BillingPeriod::Monthly),
    ("Spotify", 10.99, BillingPeriod::Monthly),
    ("Disney+", 7.99, BillingPeriod::Monthly),
    ("Amazon Prime", 139.0, BillingPeriod::Yearly),
    ("Apple Music", 10.99, BillingPeriod::Monthly),
    ("YouTube Premium", 13.99, BillingPeriod::Monthly),
    ("Adobe Creative Cloud", 52.99, BillingPeriod::Monthly),
    ("Microsoft 365", 69.99, BillingPeriod::Yearly),
    ("Dropbox", 9.99, BillingPeriod::Monthly),
    ("Canva Pro", 119.99, BillingPeriod::Yearly),
];

/// Ready-made subscriptions users can pick instead of typing one in.
pub fn popular_services() -> Vec<Subscription> {
    POPULAR_SERVICES
        .iter()
        .map(|(name, price, period)| Subscription::new(name, *price, Currency::Usd, *period))
        .collect()
}

pub fn find_popular_service(name: &str) -> Option<Subscription> {
    let wanted = name.trim().to_lowercase();
    popular_services()
        .into_iter()
        .find(|s| s.name.to_lowercase() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_patch_replaces_present_fields() {
        let mut sub = Subscription::new("Netflix", 15.49, Currency::Usd, BillingPeriod::Monthly);
        sub.apply(&SubscriptionPatch {
            price: Some(17.99),
            currency: Some(Currency::Eur),
            ..Default::default()
        });

        assert_eq!(sub.name, "Netflix");
        assert_eq!(sub.price, 17.99);
        assert_eq!(sub.currency, Currency::Eur);
        assert_eq!(sub.period, BillingPeriod::Monthly);

        sub.apply(&SubscriptionPatch {
            name: Some(" Netflix Premium ".to_string()),
            period: Some(BillingPeriod::Yearly),
            ..Default::default()
        });
        assert_eq!(sub.key(), "Netflix Premium");
        assert_eq!(sub.period, BillingPeriod::Yearly);
    }

    #[test]
    fn test_empty_patch() {
        assert!(SubscriptionPatch::default().is_empty());
        let patch = SubscriptionPatch {
            price: Some(1.0),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_popular_services() {
        let services = popular_services();
        assert_eq!(services.len(), 10);
        assert!(services.iter().all(|s| s.currency == Currency::Usd));

        let prime = find_popular_service("amazon prime").unwrap();
        assert_eq!(prime.price, 139.0);
        assert_eq!(prime.period, BillingPeriod::Yearly);
        assert!(find_popular_service("Hulu").is_none());
    }

    #[test]
    fn test_deserialize_without_created_at() {
        let json = r#"{"name":"Dropbox","price":9.99,"currency":"USD","period":"monthly"}"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub.name, "Dropbox");
        assert!(sub.created_at.is_none());
    }

    #[test]
    fn test_unknown_stored_currency_converts_at_one() {
        let json = r#"{"name":"BBC","price":12.0,"currency":"GBP","period":"monthly"}"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub.currency, Currency::BASE);
        assert_eq!(sub.price, 12.0);
    }
}
