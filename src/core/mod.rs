//! Core business logic: currencies, records, the cost engine and app state

pub mod analytics;
pub mod config;
pub mod currency;
pub mod domain;
pub mod log;
pub mod notice;
pub mod period;
pub mod rates;
pub mod state;
pub mod store;
pub mod subscription;

// Re-export main types for cleaner imports
pub use currency::{Currency, Quotes, RateTable};
pub use domain::{Domain, DomainPatch, ExpiryStatus};
pub use notice::{Notice, NoticeKind};
pub use period::BillingPeriod;
pub use rates::{ExchangeRateProvider, RateBook, RateError, RefreshOutcome};
pub use state::Tracker;
pub use subscription::{Subscription, SubscriptionPatch};
