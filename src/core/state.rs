//! Application state: the record lists, display preferences, the rate book
//! and pending notices. All mutation goes through `Tracker`.

use crate::core::analytics::{self, CostTotals, Insights, SubscriptionCost};
use crate::core::currency::{Currency, RateTable};
use crate::core::domain::{Domain, DomainPatch};
use crate::core::notice::Notice;
use crate::core::rates::{ExchangeRateProvider, RateBook, RefreshOutcome};
use crate::core::subscription::{Subscription, SubscriptionPatch};
use crate::store::RecordStores;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct Tracker {
    stores: RecordStores,
    subscriptions: Vec<Subscription>,
    domains: Vec<Domain>,
    display_currency: Currency,
    projection_years: u32,
    rates: RateBook,
    notices: Vec<Notice>,
}

impl Tracker {
    pub fn new(stores: RecordStores, display_currency: Currency, projection_years: u32) -> Self {
        Self {
            stores,
            subscriptions: Vec::new(),
            domains: Vec::new(),
            display_currency,
            projection_years: analytics::clamp_projection_years(projection_years),
            rates: RateBook::default(),
            notices: Vec::new(),
        }
    }

    /// Reads both lists from the stores. A store that cannot be read leaves
    /// its list empty and queues an error notice.
    pub async fn load(&mut self) {
        let (subs, domains) = futures::join!(
            self.stores.subscriptions.list(),
            self.stores.domains.list()
        );
        match subs {
            Ok(subs) => {
                debug!("Loaded {} subscriptions", subs.len());
                self.subscriptions = subs;
            }
            Err(e) => self.store_failed("Failed to load subscriptions", &e),
        }
        match domains {
            Ok(domains) => {
                debug!("Loaded {} domains", domains.len());
                self.domains = domains;
            }
            Err(e) => self.store_failed("Failed to load domains", &e),
        }
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn display_currency(&self) -> Currency {
        self.display_currency
    }

    pub fn projection_years(&self) -> u32 {
        self.projection_years
    }

    pub fn rates(&self) -> &RateBook {
        &self.rates
    }

    pub fn rate_table(&self) -> Arc<RateTable> {
        self.rates.snapshot()
    }

    /// Stored subscription currencies are left as they are.
    pub fn set_display_currency(&mut self, currency: Currency) {
        debug!("Display currency set to {}", currency);
        self.display_currency = currency;
    }

    pub fn set_projection_years(&mut self, years: u32) {
        self.projection_years = analytics::clamp_projection_years(years);
    }

    pub fn totals(&self) -> CostTotals {
        analytics::total_costs(
            &self.subscriptions,
            self.display_currency,
            &self.rate_table(),
            self.projection_years,
        )
    }

    pub fn insights(&self) -> Insights {
        analytics::insights(&self.subscriptions, self.display_currency, &self.rate_table())
    }

    pub fn cost_breakdown(&self) -> Vec<SubscriptionCost> {
        analytics::cost_breakdown(&self.subscriptions, self.display_currency, &self.rate_table())
    }

    /// Adds a subscription unless one with the same name exists. Returns
    /// whether the list changed.
    pub async fn add_subscription(&mut self, mut sub: Subscription) -> bool {
        sub.name = sub.name.trim().to_string();
        if sub.name.is_empty() {
            self.notices
                .push(Notice::warning("Subscription name cannot be empty"));
            return false;
        }
        if !sub.price.is_finite() || sub.price < 0.0 {
            self.notices.push(Notice::warning(format!(
                "Invalid price for {}, using 0",
                sub.name
            )));
            sub.price = 0.0;
        }
        if self.has_subscription(&sub.name, None) {
            self.notices.push(Notice::warning(format!(
                "Subscription {} already exists",
                sub.name
            )));
            return false;
        }
        if sub.created_at.is_none() {
            sub.created_at = Some(Utc::now());
        }

        match self.stores.subscriptions.create(sub).await {
            Ok(created) => {
                self.notices
                    .push(Notice::success(format!("Added {}", created.name)));
                self.subscriptions.push(created);
                true
            }
            Err(e) => {
                self.store_failed("Failed to save subscription", &e);
                false
            }
        }
    }

    /// Names are matched case-insensitively, like the duplicate check.
    pub async fn update_subscription(&mut self, name: &str, mut patch: SubscriptionPatch) -> bool {
        let Some(index) = self.find_subscription(name, None) else {
            self.notices
                .push(Notice::warning(format!("Subscription {name} not found")));
            return false;
        };
        let name = self.subscriptions[index].name.clone();
        if let Some(new_name) = patch.name.as_deref().map(str::trim) {
            if new_name.is_empty() {
                self.notices
                    .push(Notice::warning("Subscription name cannot be empty"));
                return false;
            }
            if self.has_subscription(new_name, Some(index)) {
                self.notices.push(Notice::warning(format!(
                    "Subscription {new_name} already exists"
                )));
                return false;
            }
        }
        if patch.price.is_some_and(|p| !p.is_finite() || p < 0.0) {
            self.notices
                .push(Notice::warning(format!("Invalid price for {name}, using 0")));
            patch.price = Some(0.0);
        }

        match self.stores.subscriptions.update(&name, &patch).await {
            Ok(updated) => {
                self.subscriptions[index] = updated;
                true
            }
            Err(e) => {
                self.store_failed("Failed to update subscription", &e);
                false
            }
        }
    }

    pub async fn remove_subscription(&mut self, name: &str) -> bool {
        let Some(index) = self.find_subscription(name, None) else {
            self.notices
                .push(Notice::warning(format!("Subscription {name} not found")));
            return false;
        };
        let name = self.subscriptions[index].name.clone();
        match self.stores.subscriptions.delete(&name).await {
            Ok(()) => {
                self.subscriptions.remove(index);
                self.notices.push(Notice::success(format!("Removed {name}")));
                true
            }
            Err(e) => {
                self.store_failed("Failed to delete subscription", &e);
                false
            }
        }
    }

    pub async fn add_domain(&mut self, domain: Domain) -> bool {
        if domain.name.trim().is_empty() {
            self.notices.push(Notice::warning("Domain name cannot be empty"));
            return false;
        }
        match self.stores.domains.create(domain).await {
            Ok(created) => {
                self.notices
                    .push(Notice::success(format!("Added {}", created.name)));
                self.domains.push(created);
                true
            }
            Err(e) => {
                self.store_failed("Failed to save domain", &e);
                false
            }
        }
    }

    pub async fn update_domain(&mut self, id: &str, patch: DomainPatch) -> bool {
        let Some(index) = self.domains.iter().position(|d| d.id == id) else {
            self.notices
                .push(Notice::warning(format!("Domain {id} not found")));
            return false;
        };
        match self.stores.domains.update(id, &patch).await {
            Ok(updated) => {
                self.domains[index] = updated;
                true
            }
            Err(e) => {
                self.store_failed("Failed to update domain", &e);
                false
            }
        }
    }

    pub async fn remove_domain(&mut self, id: &str) -> bool {
        let Some(name) = self
            .domains
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.name.clone())
        else {
            self.notices
                .push(Notice::warning(format!("Domain {id} not found")));
            return false;
        };
        match self.stores.domains.delete(id).await {
            Ok(()) => {
                self.domains.retain(|d| d.id != id);
                self.notices.push(Notice::success(format!("Removed {name}")));
                true
            }
            Err(e) => {
                self.store_failed("Failed to delete domain", &e);
                false
            }
        }
    }

    /// Fetches fresh rates for the current display currency. On failure the
    /// last known table stays in use and a warning is queued.
    pub async fn refresh_rates(
        &mut self,
        provider: &(dyn ExchangeRateProvider + Send + Sync),
    ) -> RefreshOutcome {
        let outcome = self.rates.refresh(provider, self.display_currency).await;
        match &outcome {
            RefreshOutcome::Updated(_) => {}
            RefreshOutcome::Superseded { requested } => {
                debug!("Rates for {} were superseded", requested);
            }
            RefreshOutcome::Failed(e) => {
                warn!("Keeping last known exchange rates: {}", e);
                self.notices.push(Notice::warning(format!(
                    "Using last known exchange rates: {e}"
                )));
            }
        }
        outcome
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn find_subscription(&self, name: &str, except: Option<usize>) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.subscriptions
            .iter()
            .enumerate()
            .find(|(i, s)| Some(*i) != except && s.name.to_lowercase() == wanted)
            .map(|(i, _)| i)
    }

    fn has_subscription(&self, name: &str, except: Option<usize>) -> bool {
        self.find_subscription(name, except).is_some()
    }

    fn store_failed(&mut self, what: &str, e: &anyhow::Error) {
        error!("{}: {:#}", what, e);
        self.notices.push(Notice::error(format!("{what}: {e}")));
    }
}
